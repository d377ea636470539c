//! Error recovery for grammars.
//!
//! Provides synchronization kind-sets and canned error handlers for
//! continuing a parse after a committed failure. A handler installed via
//! [`crate::Parser::catch`] typically advances the cursor to a known-good
//! token (a statement terminator, a closing bracket) and downgrades the
//! failure to its recovered counterpart.

use glint_diagnostic::DiagnosticQueue;
use glint_ir::TokenKind;

use crate::cursor::Cursor;
use crate::outcome::Outcome;

/// A set of token kinds used as synchronization points.
///
/// Kind ids are an open `u32` namespace, so membership is a binary search
/// over a sorted list rather than a bitset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KindSet {
    kinds: Vec<TokenKind>,
}

impl KindSet {
    pub fn new(kinds: &[TokenKind]) -> Self {
        let mut kinds = kinds.to_vec();
        kinds.sort_unstable();
        kinds.dedup();
        KindSet { kinds }
    }

    /// Check if this set contains a token kind.
    #[inline]
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.kinds.binary_search(&kind).is_ok()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}

/// Advance the cursor until reaching a token in the recovery set or end
/// of input.
///
/// Returns `true` if a recovery token was found, `false` if the end was
/// reached.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: &KindSet) -> bool {
    while let Some(kind) = cursor.current_kind() {
        if recovery.contains(kind) {
            return true;
        }
        cursor.advance();
    }
    false
}

/// Error handler that skips to the next token in `set`, leaving the
/// cursor *on* it.
///
/// Recovers the failure if a synchronization token was found; declines
/// (returns the failure unchanged, cursor at end) otherwise.
pub fn skip_to(
    set: KindSet,
) -> impl Fn(&mut Cursor<'_>, usize, Outcome, &mut DiagnosticQueue) -> Outcome {
    move |cursor, _origin, failure, _diags| {
        if synchronize(cursor, &set) {
            failure.recover()
        } else {
            failure
        }
    }
}

/// Error handler that skips to the next token in `set` and consumes it.
pub fn skip_past(
    set: KindSet,
) -> impl Fn(&mut Cursor<'_>, usize, Outcome, &mut DiagnosticQueue) -> Outcome {
    move |cursor, _origin, failure, _diags| {
        if synchronize(cursor, &set) {
            cursor.advance();
            failure.recover()
        } else {
            failure
        }
    }
}
