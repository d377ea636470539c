//! Five-way parse outcome and its ordering algebra.
//!
//! A parse result is one of five tags, totally ordered from worst to best:
//!
//! | Tag | Meaning | Continuable? |
//! |-----|---------|--------------|
//! | `ExpectedFailed` | Committed-point mismatch; aborts the enclosing sequence | no |
//! | `Failed` | Ordinary mismatch; alternatives may still be tried | no |
//! | `RecoveredExpectedFailed` | Committed failure skipped over by a handler | yes |
//! | `Recovered` | Ordinary failure skipped over by a handler | yes |
//! | `Succeed` | Matched; cursor advanced, attribute produced | yes |
//!
//! The ordering drives two decisions: a concatenation reports the *worst*
//! of its children, and an alternation reports the *best* failure across
//! its branches. `recover` maps the two failure tags to their recovered
//! counterparts; it is the only way a non-continuable result becomes
//! continuable, and only error handlers invoke it.

use glint_ir::Attr;

/// Parse result tag, declared worst → best so the derived `Ord` is the
/// defined "goodness" ordering and nothing more.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Outcome {
    /// A committed-point mismatch; must propagate and abort the enclosing
    /// sequence.
    ExpectedFailed,
    /// Ordinary mismatch; the enclosing combinator may backtrack or try
    /// alternatives.
    Failed,
    /// Failed in an expected context, but a handler advanced the cursor
    /// past the trouble.
    RecoveredExpectedFailed,
    /// Failed, but a handler advanced the cursor past the trouble.
    Recovered,
    /// Matched; cursor advanced, attribute produced.
    Succeed,
}

impl Outcome {
    /// The lower-ranked of two outcomes.
    #[inline]
    pub fn worse(l: Outcome, r: Outcome) -> Outcome {
        l.min(r)
    }

    /// The higher-ranked of two outcomes.
    #[inline]
    pub fn better(l: Outcome, r: Outcome) -> Outcome {
        l.max(r)
    }

    #[inline]
    pub fn worse_than(self, other: Outcome) -> bool {
        self < other
    }

    #[inline]
    pub fn better_than(self, other: Outcome) -> bool {
        self > other
    }

    /// Map failures to their recovered counterparts.
    ///
    /// `Failed` → `Recovered`, `ExpectedFailed` → `RecoveredExpectedFailed`;
    /// everything else is unchanged. Idempotent on recovered variants.
    #[inline]
    #[must_use]
    pub fn recover(self) -> Outcome {
        match self {
            Outcome::Failed => Outcome::Recovered,
            Outcome::ExpectedFailed => Outcome::RecoveredExpectedFailed,
            other => other,
        }
    }

    #[inline]
    pub fn is_succeed(self) -> bool {
        self == Outcome::Succeed
    }

    #[inline]
    pub fn is_failed(self) -> bool {
        self == Outcome::Failed
    }

    #[inline]
    pub fn is_expected_failed(self) -> bool {
        self == Outcome::ExpectedFailed
    }

    #[inline]
    pub fn is_recovered(self) -> bool {
        matches!(
            self,
            Outcome::Recovered | Outcome::RecoveredExpectedFailed
        )
    }

    /// Did this result originate at a committed point?
    #[inline]
    pub fn is_expected_failed_or_recovered(self) -> bool {
        matches!(
            self,
            Outcome::ExpectedFailed | Outcome::RecoveredExpectedFailed
        )
    }

    /// Is parsing after this result meaningful?
    #[inline]
    pub fn is_continuable(self) -> bool {
        matches!(
            self,
            Outcome::Succeed | Outcome::Recovered | Outcome::RecoveredExpectedFailed
        )
    }
}

/// The result of one `parse` call: an outcome plus the attribute produced.
///
/// The attribute is present exactly when the outcome is continuable.
#[derive(Clone, Debug)]
pub struct Parsed {
    pub outcome: Outcome,
    pub attr: Option<Attr>,
}

impl Parsed {
    /// Successful match with its attribute.
    #[inline]
    pub fn succeed(attr: Attr) -> Self {
        Parsed {
            outcome: Outcome::Succeed,
            attr: Some(attr),
        }
    }

    /// Ordinary backtrackable failure.
    #[inline]
    pub fn failed() -> Self {
        Parsed {
            outcome: Outcome::Failed,
            attr: None,
        }
    }

    /// Committed failure.
    #[inline]
    pub fn expected_failed() -> Self {
        Parsed {
            outcome: Outcome::ExpectedFailed,
            attr: None,
        }
    }

    /// A non-continuable result with the given tag.
    #[inline]
    pub fn fail_with(outcome: Outcome) -> Self {
        debug_assert!(!outcome.is_continuable());
        Parsed {
            outcome,
            attr: None,
        }
    }

    /// A continuable result carrying its attribute.
    #[inline]
    pub fn continue_with(outcome: Outcome, attr: Attr) -> Self {
        debug_assert!(outcome.is_continuable());
        Parsed {
            outcome,
            attr: Some(attr),
        }
    }

    #[inline]
    pub fn is_continuable(&self) -> bool {
        self.outcome.is_continuable()
    }

    /// Take the attribute, discarding the outcome.
    #[inline]
    pub fn into_attr(self) -> Option<Attr> {
        self.attr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Outcome; 5] = [
        Outcome::ExpectedFailed,
        Outcome::Failed,
        Outcome::RecoveredExpectedFailed,
        Outcome::Recovered,
        Outcome::Succeed,
    ];

    fn any_outcome() -> impl Strategy<Value = Outcome> {
        proptest::sample::select(ALL.to_vec())
    }

    #[test]
    fn test_defined_ordering() {
        assert!(Outcome::ExpectedFailed < Outcome::Failed);
        assert!(Outcome::Failed < Outcome::RecoveredExpectedFailed);
        assert!(Outcome::RecoveredExpectedFailed < Outcome::Recovered);
        assert!(Outcome::Recovered < Outcome::Succeed);
    }

    #[test]
    fn test_continuable_partition() {
        assert!(Outcome::Succeed.is_continuable());
        assert!(Outcome::Recovered.is_continuable());
        assert!(Outcome::RecoveredExpectedFailed.is_continuable());
        assert!(!Outcome::Failed.is_continuable());
        assert!(!Outcome::ExpectedFailed.is_continuable());
    }

    #[test]
    fn test_recover_mapping() {
        assert_eq!(Outcome::Failed.recover(), Outcome::Recovered);
        assert_eq!(
            Outcome::ExpectedFailed.recover(),
            Outcome::RecoveredExpectedFailed
        );
        assert_eq!(Outcome::Succeed.recover(), Outcome::Succeed);
    }

    #[test]
    fn test_expectation_tracking() {
        assert!(Outcome::ExpectedFailed.is_expected_failed_or_recovered());
        assert!(Outcome::RecoveredExpectedFailed.is_expected_failed_or_recovered());
        assert!(!Outcome::Recovered.is_expected_failed_or_recovered());
    }

    #[test]
    fn test_parsed_constructors() {
        let parsed = Parsed::failed();
        assert!(!parsed.is_continuable());
        assert!(parsed.attr.is_none());

        let parsed = Parsed::succeed(Attr::empty());
        assert!(parsed.is_continuable());
        assert!(parsed.attr.is_some());
    }

    proptest! {
        #[test]
        fn prop_worse_better_duality(a in any_outcome(), b in any_outcome()) {
            // better(a,b) = b  <=>  worse(a,b) = a
            prop_assert_eq!(Outcome::better(a, b) == b, Outcome::worse(a, b) == a);
        }

        #[test]
        fn prop_worse_better_commutative(a in any_outcome(), b in any_outcome()) {
            prop_assert_eq!(Outcome::worse(a, b), Outcome::worse(b, a));
            prop_assert_eq!(Outcome::better(a, b), Outcome::better(b, a));
        }

        #[test]
        fn prop_worse_better_associative(
            a in any_outcome(),
            b in any_outcome(),
            c in any_outcome(),
        ) {
            prop_assert_eq!(
                Outcome::worse(Outcome::worse(a, b), c),
                Outcome::worse(a, Outcome::worse(b, c))
            );
            prop_assert_eq!(
                Outcome::better(Outcome::better(a, b), c),
                Outcome::better(a, Outcome::better(b, c))
            );
        }

        #[test]
        fn prop_recover_idempotent(a in any_outcome()) {
            prop_assert_eq!(a.recover(), a.recover().recover());
        }

        #[test]
        fn prop_recover_is_continuable_or_unchanged(a in any_outcome()) {
            let recovered = a.recover();
            prop_assert!(recovered.is_continuable() || recovered == a);
        }
    }
}
