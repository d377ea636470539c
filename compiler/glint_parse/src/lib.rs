//! Parser-combinator engine for the Glint front-end.
//!
//! Consumes a pre-lexed [`TokenStream`](glint_ir::TokenStream) and
//! produces an attribute tree mirroring the matched grammar structure,
//! plus an [`Outcome`] describing success, failure, or error-recovered
//! status. Grammars are composed declaratively from primitive
//! combinators:
//!
//! | Surface | Meaning |
//! |---------|---------|
//! | `terminal(kind, desc)` | match one token by kind |
//! | `p >> q` | sequence |
//! | `p.then_expect(q)` | sequence; `q` must follow or the failure commits |
//! | `p \| q` | ordered alternation |
//! | `p.many0()` / `p.many1()` / `p.repeat(n, m)` | repetition |
//! | `p.opt()` / `-p` | zero or one |
//! | `!p` | negative lookahead |
//! | `eoi()` | end of input |
//! | `p.catch(handler)` | run `handler` when `p` fails non-continuably |
//!
//! Named rules give grammars recursion: declare a [`Rule`] (usually via a
//! [`RuleSet`]), embed `rule.parser()` in expressions, and define the body
//! afterwards — forward references and self references both work.
//!
//! Parsing is single-threaded and synchronous. The diagnostic sink is
//! threaded by mutable reference through every parse call; parser graphs
//! are immutable once grammar setup is done.
//!
//! ```
//! use glint_diagnostic::DiagnosticQueue;
//! use glint_ir::{Span, Token, TokenKind, TokenStream};
//! use glint_parse::{eoi, terminal, RuleSet};
//!
//! const NUM: TokenKind = TokenKind::new(1);
//! const PLUS: TokenKind = TokenKind::new(2);
//!
//! let mut rules = RuleSet::new();
//! let sum = rules.declare("sum");
//! let num = || terminal(NUM, "number");
//! let plus = || terminal(PLUS, "`+`");
//! sum.define(num() >> (plus() >> num()).many0() >> eoi());
//!
//! let tokens: TokenStream = [
//!     Token::new(NUM, "1", Span::new(0, 1)),
//!     Token::new(PLUS, "+", Span::new(1, 2)),
//!     Token::new(NUM, "2", Span::new(2, 3)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut diags = DiagnosticQueue::new();
//! let parsed = glint_parse::parse(&sum, &tokens, &mut diags);
//! assert!(parsed.outcome.is_succeed());
//! ```

mod combinator;
mod cursor;
mod outcome;
mod recovery;
mod rule;

#[cfg(test)]
mod tests;

pub use combinator::{eoi, terminal, ErrorHandler, Parser};
pub use cursor::Cursor;
pub use outcome::{Outcome, Parsed};
pub use recovery::{skip_past, skip_to, synchronize, KindSet};
pub use rule::{Rule, RuleSet};

use glint_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use glint_ir::TokenStream;

/// Parse a token stream with the given top rule.
///
/// Creates a fresh cursor at the start of the stream. A grammar whose top
/// rule is anchored with [`eoi`] consumes all input on success; if the
/// rule succeeds with tokens left over, a warning is recorded.
pub fn parse(rule: &Rule, tokens: &TokenStream, diags: &mut DiagnosticQueue) -> Parsed {
    let mut cursor = Cursor::new(tokens);
    let parsed = rule.parse(&mut cursor, diags);
    if parsed.outcome.is_succeed() && !cursor.is_at_end() {
        diags.add(
            Diagnostic::warning(ErrorCode::E1004)
                .with_message("parse succeeded without consuming all input")
                .with_label(cursor.current_span(), "first unconsumed token"),
        );
    }
    parsed
}
