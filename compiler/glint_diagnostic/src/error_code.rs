//! Error codes for all front-end diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first
//! digit indicating the compiler phase. Used for `--explain` lookups and
//! documentation.
//!
//! All error codes are declared in a single [`define_error_codes!`]
//! invocation. The macro generates: the `ErrorCode` enum, `ALL`, `COUNT`,
//! `as_str()`, `description()`, `Display`, and `FromStr`.

use std::fmt;

/// Declare all error codes in a single location.
///
/// Each entry is `$variant, $description` where:
/// - `$variant` is the enum variant name (e.g., `E1001`)
/// - `$description` is a one-line summary string
///
/// Generates:
/// - `ErrorCode` enum with doc comments from descriptions
/// - `ALL: &[ErrorCode]` — all variants for iteration
/// - `COUNT: usize` — variant count
/// - `as_str()` — variant name as `&'static str` (e.g., `"E1001"`)
/// - `description()` — one-line summary
macro_rules! define_error_codes {
    ($( $variant:ident, $desc:literal );+ $(;)?) => {
        /// Error codes for all front-end diagnostics.
        ///
        /// Format: E#### where first digit indicates phase:
        /// - E0xxx: Lexer errors
        /// - E1xxx: Parser errors
        /// - E9xxx: Internal errors
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $(
                #[doc = $desc]
                $variant,
            )+
        }

        impl ErrorCode {
            /// All error code variants, for exhaustive iteration and testing.
            pub const ALL: &[ErrorCode] = &[ $( ErrorCode::$variant, )+ ];

            /// Number of error code variants.
            pub const COUNT: usize = [ $( ErrorCode::$variant, )+ ].len();

            /// Get the code as a string (e.g., `"E1001"`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( ErrorCode::$variant => stringify!($variant), )+
                }
            }

            /// Get the one-line description of this error code.
            pub fn description(&self) -> &'static str {
                match self {
                    $( ErrorCode::$variant => $desc, )+
                }
            }
        }
    };
}

define_error_codes! {
    // Lexer Errors (E0xxx)
    E0001, "Unrecognized character in source";

    // Parser Errors (E1xxx)
    E1001, "Unexpected token";
    E1002, "Expected element missing after committed sequence point";
    E1003, "Unresolved rule reference";
    E1004, "Input not fully consumed";

    // Internal Errors (E9xxx)
    E9001, "Internal parser error";
    E9002, "Too many errors";
}

// ---------------------------------------------------------------------------
// Phase classification (derived from naming convention)
// ---------------------------------------------------------------------------

impl ErrorCode {
    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser/syntax error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

// ---------------------------------------------------------------------------
// Display and FromStr
// ---------------------------------------------------------------------------

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E1001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and
/// [`ErrorCode::as_str()`], so it is automatically exhaustive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
