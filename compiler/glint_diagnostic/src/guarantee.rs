use std::fmt;

/// Proof that at least one error was emitted.
///
/// This type cannot be constructed except by emitting an error via
/// `DiagnosticQueue::emit_error`. Functions that return
/// `Result<T, ErrorGuaranteed>` are therefore guaranteed to have reported
/// something useful instead of failing silently.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// Private constructor - only `DiagnosticQueue::emit_error` can create
    /// this.
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Create an `ErrorGuaranteed` from an error count.
    ///
    /// Returns `Some(ErrorGuaranteed)` if the count is greater than zero,
    /// `None` otherwise. For callers that track errors through their own
    /// collections but still want the proof type.
    #[inline]
    pub fn from_error_count(count: usize) -> Option<Self> {
        if count > 0 {
            Some(ErrorGuaranteed(()))
        } else {
            None
        }
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
