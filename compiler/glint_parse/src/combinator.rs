//! Parser nodes and the combinator evaluation model.
//!
//! A grammar is a tree of [`Parser`] nodes built from primitive
//! combinators: terminal match, repetition, alternation, concatenation,
//! negative lookahead, end anchor, named-rule reference, and error catch.
//! Composition operators share sub-parsers behind `Rc`; named rules are
//! referenced through `Weak` handles so recursive grammars do not leak.
//!
//! Evaluation is a single `match` over the node kinds. Every node's
//! `parse` takes the cursor and the diagnostic sink and returns a
//! [`Parsed`]: the outcome tag plus the attribute produced on continuable
//! results. Backtracking is done by saving the cursor position at each
//! combinator boundary and writing it back on failure.

use std::fmt;
use std::ops::{BitOr, Neg, Not, Shr};
use std::rc::{Rc, Weak};

use glint_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use glint_ir::{Attr, TokenCapture, TokenIdx, TokenKind};
use tracing::debug;

use crate::cursor::Cursor;
use crate::outcome::{Outcome, Parsed};
use crate::rule::RuleCell;

/// Handler invoked when the parser wrapped by [`Parser::catch`] fails
/// non-continuably.
///
/// Receives the cursor (mutable, so it can advance to a synchronization
/// point), the cursor position at catcher entry, the failure it is asked
/// to handle, and the diagnostic sink. Returning `failure.recover()` after
/// advancing accepts the recovery; returning `failure` unchanged declines.
pub type ErrorHandler =
    Rc<dyn Fn(&mut Cursor<'_>, usize, Outcome, &mut DiagnosticQueue) -> Outcome>;

/// One node of a parser graph.
#[derive(Clone)]
pub struct Parser {
    /// Set on the right operand of `then_expect`: a mismatch here is a
    /// committed failure, not a backtrackable one.
    pub(crate) expected: bool,
    pub(crate) kind: ParserKind,
}

#[derive(Clone)]
pub(crate) enum ParserKind {
    /// Match a single token by kind.
    Terminal { kind: TokenKind, desc: Rc<str> },
    /// Match the inner parser `lower..=upper` times (greedy).
    Repeater {
        lower: usize,
        upper: Option<usize>,
        inner: Rc<Parser>,
    },
    /// Ordered alternation.
    Selector { branches: Vec<Rc<Parser>> },
    /// Ordered concatenation.
    Queuer { exprs: Vec<Rc<Parser>> },
    /// Negative lookahead.
    Negative { inner: Rc<Parser> },
    /// End of input.
    End,
    /// Non-owning reference to a named rule.
    RuleRef { rule: Weak<RuleCell> },
    /// Inner parser with an error handler.
    Catcher {
        inner: Rc<Parser>,
        handler: ErrorHandler,
    },
}

/// Terminal parser matching tokens of the given kind.
///
/// The description is used in diagnostics ("expected {desc}, found ...").
pub fn terminal(kind: TokenKind, desc: &str) -> Parser {
    Parser::new(ParserKind::Terminal {
        kind,
        desc: Rc::from(desc),
    })
}

/// End-of-input anchor: succeeds only when all tokens are consumed.
pub fn eoi() -> Parser {
    Parser::new(ParserKind::End)
}

impl Parser {
    pub(crate) fn new(kind: ParserKind) -> Self {
        Parser {
            expected: false,
            kind,
        }
    }

    fn into_rc(self) -> Rc<Parser> {
        Rc::new(self)
    }

    // --- Composition surface ---

    /// Repeat zero or more times.
    pub fn many0(self) -> Parser {
        self.repeat(0, None)
    }

    /// Repeat one or more times.
    pub fn many1(self) -> Parser {
        self.repeat(1, None)
    }

    /// Zero or one occurrence.
    pub fn opt(self) -> Parser {
        self.repeat(0, Some(1))
    }

    /// Repeat between `lower` and `upper` times; `None` means unbounded.
    pub fn repeat(self, lower: usize, upper: Option<usize>) -> Parser {
        Parser::new(ParserKind::Repeater {
            lower,
            upper,
            inner: self.into_rc(),
        })
    }

    /// Sequence with expectation: `rhs` must follow, or the whole
    /// enclosing sequence fails with a committed failure.
    pub fn then_expect(self, mut rhs: Parser) -> Parser {
        rhs.expected = true;
        let mut exprs = self.into_queue();
        exprs.push(rhs.into_rc());
        Parser::new(ParserKind::Queuer { exprs })
    }

    /// Wrap with an error handler; the only way a committed failure can
    /// be downgraded back to a continuable result.
    pub fn catch<H>(self, handler: H) -> Parser
    where
        H: Fn(&mut Cursor<'_>, usize, Outcome, &mut DiagnosticQueue) -> Outcome + 'static,
    {
        Parser::new(ParserKind::Catcher {
            inner: self.into_rc(),
            handler: Rc::new(handler),
        })
    }

    /// Reuse this node's queue when it can be extended in place.
    ///
    /// An expectation-flagged composite keeps its flag by becoming a
    /// nested child instead.
    fn into_queue(self) -> Vec<Rc<Parser>> {
        match self {
            Parser {
                expected: false,
                kind: ParserKind::Queuer { exprs },
            } => exprs,
            other => vec![other.into_rc()],
        }
    }

    fn into_branches(self) -> Vec<Rc<Parser>> {
        match self {
            Parser {
                expected: false,
                kind: ParserKind::Selector { branches },
            } => branches,
            other => vec![other.into_rc()],
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match &self.kind {
            ParserKind::Terminal { desc, .. } => desc.to_string(),
            ParserKind::Repeater { inner, .. } | ParserKind::Catcher { inner, .. } => {
                inner.describe()
            }
            ParserKind::Selector { branches } => {
                let mut out = String::new();
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" or ");
                    }
                    out.push_str(&branch.describe());
                }
                out
            }
            ParserKind::Queuer { exprs } => exprs
                .first()
                .map_or_else(|| "sequence".to_string(), |expr| expr.describe()),
            ParserKind::Negative { .. } => "lookahead".to_string(),
            ParserKind::End => "end of input".to_string(),
            ParserKind::RuleRef { rule } => match rule.upgrade() {
                Some(cell) => cell.name().to_string(),
                None => "<unresolved rule>".to_string(),
            },
        }
    }

    // --- Evaluation ---

    /// Run this parser at the cursor.
    ///
    /// On continuable outcomes the cursor is advanced past the match and
    /// the attribute is produced; on `Failed` the cursor is restored to
    /// the entry position; on `ExpectedFailed` it is left at the failure
    /// point so an enclosing handler can synchronize from there.
    pub fn parse(&self, cursor: &mut Cursor<'_>, diags: &mut DiagnosticQueue) -> Parsed {
        let parsed = self.eval(cursor, diags);
        if self.expected
            && !parsed.outcome.is_continuable()
            && parsed.outcome != Outcome::ExpectedFailed
        {
            // Committed point: promote the mismatch and record it.
            let what = self.describe();
            let found = cursor.found_description();
            debug!(
                expected = %what,
                found = %found,
                pos = cursor.position(),
                "expectation failure"
            );
            diags.add(
                Diagnostic::error(ErrorCode::E1002)
                    .with_message(format!("expected {what}, found {found}"))
                    .with_label(cursor.current_span(), format!("expected {what} here")),
            );
            return Parsed::expected_failed();
        }
        parsed
    }

    fn eval(&self, cursor: &mut Cursor<'_>, diags: &mut DiagnosticQueue) -> Parsed {
        match &self.kind {
            ParserKind::Terminal { kind, .. } => match cursor.current() {
                Some(token) if token.kind == *kind => {
                    let start = cursor.start_capture();
                    cursor.advance();
                    Parsed::succeed(Attr::terminal(
                        TokenIdx(start),
                        cursor.complete_capture(start),
                    ))
                }
                _ => Parsed::failed(),
            },

            ParserKind::Repeater {
                lower,
                upper,
                inner,
            } => {
                let entry = cursor.position();
                let start = cursor.start_capture();
                let mut children = Vec::new();
                loop {
                    if upper.is_some_and(|upper| children.len() >= upper) {
                        break;
                    }
                    let save = cursor.position();
                    let child = inner.parse(cursor, diags);
                    if child.outcome == Outcome::ExpectedFailed {
                        // Repetition does not mask committed failures.
                        return Parsed::expected_failed();
                    }
                    if child.outcome.is_continuable() {
                        children.push(child.attr.unwrap_or_else(Attr::empty));
                        if cursor.position() == save {
                            // A zero-width match would repeat forever.
                            break;
                        }
                    } else {
                        cursor.set_position(save);
                        break;
                    }
                }
                if children.len() >= *lower {
                    Parsed::succeed(Attr::sequence(children, cursor.complete_capture(start)))
                } else {
                    cursor.set_position(entry);
                    Parsed::failed()
                }
            }

            ParserKind::Selector { branches } => {
                let entry = cursor.position();
                let start = cursor.start_capture();
                let mut best = Outcome::ExpectedFailed;
                for (idx, branch) in branches.iter().enumerate() {
                    cursor.set_position(entry);
                    let child = branch.parse(cursor, diags);
                    if child.outcome.is_continuable() {
                        let attr = Attr::selector(
                            idx,
                            child.attr.unwrap_or_else(Attr::empty),
                            cursor.complete_capture(start),
                        );
                        return Parsed::continue_with(child.outcome, attr);
                    }
                    best = Outcome::better(best, child.outcome);
                }
                cursor.set_position(entry);
                Parsed::fail_with(best)
            }

            ParserKind::Queuer { exprs } => {
                let entry = cursor.position();
                let start = cursor.start_capture();
                let mut children = Vec::with_capacity(exprs.len());
                let mut verdict = Outcome::Succeed;
                for expr in exprs {
                    let child = expr.parse(cursor, diags);
                    if child.outcome.is_continuable() {
                        verdict = Outcome::worse(verdict, child.outcome);
                        children.push(child.attr.unwrap_or_else(Attr::empty));
                    } else if child.outcome == Outcome::ExpectedFailed {
                        // Cursor stays at the failure point to aid recovery.
                        return Parsed::expected_failed();
                    } else {
                        cursor.set_position(entry);
                        return Parsed::failed();
                    }
                }
                Parsed::continue_with(
                    verdict,
                    Attr::queuer(children, cursor.complete_capture(start)),
                )
            }

            ParserKind::Negative { inner } => {
                let entry = cursor.position();
                let inner_parsed = inner.parse(cursor, diags);
                cursor.set_position(entry);
                if inner_parsed.outcome.is_succeed() {
                    Parsed::failed()
                } else {
                    Parsed::succeed(Attr::empty())
                }
            }

            ParserKind::End => {
                if cursor.is_at_end() {
                    Parsed::succeed(Attr::empty())
                } else {
                    Parsed::failed()
                }
            }

            ParserKind::RuleRef { rule } => match rule.upgrade() {
                Some(cell) => cell.parse(cursor, diags),
                None => {
                    debug!(pos = cursor.position(), "dangling rule reference");
                    diags.add(
                        Diagnostic::error(ErrorCode::E1003)
                            .with_message("reference to a rule that no longer exists")
                            .with_label(cursor.current_span(), "while parsing here"),
                    );
                    Parsed::failed()
                }
            },

            ParserKind::Catcher { inner, handler } => {
                let origin = cursor.position();
                let parsed = inner.parse(cursor, diags);
                if parsed.outcome.is_continuable() {
                    return parsed;
                }
                let verdict = handler(cursor, origin, parsed.outcome, diags);
                if verdict.is_continuable() {
                    debug!(
                        origin,
                        resume = cursor.position(),
                        ?verdict,
                        "error handler recovered"
                    );
                    let mut attr = Attr::empty();
                    attr.capture =
                        TokenCapture::new(origin as u32, cursor.position() as u32);
                    Parsed::continue_with(verdict, attr)
                } else {
                    Parsed::fail_with(verdict)
                }
            }
        }
    }
}

// --- Operator overloads ---
//
// `p | q` alternation, `p >> q` sequence, `!p` negative lookahead,
// `-p` optional. Sequence-with-expectation and repetition have no
// operator in Rust; use `then_expect` and `many0`/`many1`/`repeat`.

impl BitOr for Parser {
    type Output = Parser;

    fn bitor(self, rhs: Parser) -> Parser {
        let mut branches = self.into_branches();
        branches.extend(rhs.into_branches());
        Parser::new(ParserKind::Selector { branches })
    }
}

impl Shr for Parser {
    type Output = Parser;

    fn shr(self, rhs: Parser) -> Parser {
        let mut exprs = self.into_queue();
        exprs.extend(rhs.into_queue());
        Parser::new(ParserKind::Queuer { exprs })
    }
}

impl Not for Parser {
    type Output = Parser;

    fn not(self) -> Parser {
        Parser::new(ParserKind::Negative {
            inner: self.into_rc(),
        })
    }
}

impl Neg for Parser {
    type Output = Parser;

    fn neg(self) -> Parser {
        self.opt()
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected {
            write!(f, "expect ")?;
        }
        match &self.kind {
            ParserKind::Terminal { kind, desc } => write!(f, "terminal({desc}, {kind:?})"),
            ParserKind::Repeater {
                lower,
                upper,
                inner,
            } => match upper {
                Some(upper) => write!(f, "repeat[{lower}..={upper}]({inner:?})"),
                None => write!(f, "repeat[{lower}..]({inner:?})"),
            },
            ParserKind::Selector { branches } => {
                write!(f, "selector(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{branch:?}")?;
                }
                write!(f, ")")
            }
            ParserKind::Queuer { exprs } => {
                write!(f, "queue(")?;
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " >> ")?;
                    }
                    write!(f, "{expr:?}")?;
                }
                write!(f, ")")
            }
            ParserKind::Negative { inner } => write!(f, "not({inner:?})"),
            ParserKind::End => write!(f, "eoi"),
            ParserKind::RuleRef { rule } => match rule.upgrade() {
                Some(cell) => write!(f, "rule<{}>", cell.name()),
                None => write!(f, "rule<dangling>"),
            },
            ParserKind::Catcher { inner, .. } => write!(f, "catch({inner:?})"),
        }
    }
}
