//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of same-position errors
//! - Soft error suppression after hard errors
//! - `ErrorGuaranteed` proof that errors were emitted
//!
//! The queue is the append-only sink threaded by mutable reference through
//! every parse; it is single-writer for the duration of a parse.

use glint_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Severity level for queue handling.
///
/// This is orthogonal to [`crate::Severity`]: a diagnostic may be an error
/// either way; `Soft` only marks it suppressible once a hard error exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Hard error - always reported, not suppressed by other errors.
    Hard,
    /// Soft error - can be suppressed after a hard error to reduce noise.
    Soft,
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Deduplicate diagnostics at the same offset with the same code.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queued diagnostic with metadata for sorting and deduplication.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    /// Byte offset of the primary label, for sorting.
    offset: u32,
    /// Whether this is a soft error.
    soft: bool,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Last (offset, code) of an error, for dedup.
    last_error: Option<(u32, ErrorCode)>,
    /// Whether we've seen a hard error.
    has_hard_error: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_error: None,
            has_hard_error: false,
            config,
        }
    }

    /// Add a diagnostic to the queue with severity level.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was
    /// filtered.
    pub fn add_with_severity(&mut self, diag: Diagnostic, severity: DiagnosticSeverity) -> bool {
        self.add_internal(diag, matches!(severity, DiagnosticSeverity::Soft))
    }

    /// Add a hard diagnostic.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        self.add_internal(diag, false)
    }

    fn add_internal(&mut self, diag: Diagnostic, soft: bool) -> bool {
        if self.config.error_limit > 0 && self.error_count >= self.config.error_limit {
            return false;
        }

        let is_error = diag.is_error();
        let offset = diag.primary_span().map_or(0, |span| span.start);

        // Suppress soft errors after hard errors
        if soft && self.has_hard_error {
            return false;
        }

        // Deduplicate
        if self.config.deduplicate
            && is_error
            && self.last_error == Some((offset, diag.code))
        {
            return false;
        }

        if is_error && !soft {
            self.has_hard_error = true;
        }
        if is_error {
            self.last_error = Some((offset, diag.code));
            self.error_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            offset,
            soft,
        });

        true
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Check if any hard errors have been recorded.
    pub fn has_hard_error(&self) -> bool {
        self.has_hard_error
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// This is the preferred method for reporting errors when the caller
    /// needs evidence that an error was actually emitted. The returned
    /// `ErrorGuaranteed` can only be obtained by calling this method.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.add_internal(diag, false);
        ErrorGuaranteed::new()
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them.
    ///
    /// Clears the queue after flushing. Skips sorting if already in order
    /// (common case for a single left-to-right parse).
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| w[0].offset <= w[1].offset);

        if !already_sorted {
            self.diagnostics.sort_by_key(|d| d.offset);
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.last_error = None;
        self.has_hard_error = false;

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting due to {limit} previous errors"))
        .with_label(span, "error limit reached here")
}
