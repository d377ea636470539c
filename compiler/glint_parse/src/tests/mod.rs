//! Engine tests.
//!
//! Tests are organized into modules by category:
//! - `combinators`: per-combinator contracts and algebraic laws
//! - `scenarios`: end-to-end grammars exercising expectation, recovery,
//!   and recursion together
//!
//! The lexer is an external collaborator, so tests build token vectors
//! directly with a small symbolic kind space.

#![allow(clippy::unwrap_used, reason = "test assertions use unwrap for clarity")]

mod scenarios;

use glint_diagnostic::DiagnosticQueue;
use glint_ir::{Span, Token, TokenKind, TokenStream};

use crate::{terminal, Cursor, Parsed, Parser};

pub(crate) const ID: TokenKind = TokenKind::new(1);
pub(crate) const NUM: TokenKind = TokenKind::new(2);
pub(crate) const PLUS: TokenKind = TokenKind::new(3);
pub(crate) const LP: TokenKind = TokenKind::new(4);
pub(crate) const RP: TokenKind = TokenKind::new(5);
pub(crate) const SEMI: TokenKind = TokenKind::new(6);

pub(crate) fn id() -> Parser {
    terminal(ID, "identifier")
}

pub(crate) fn num() -> Parser {
    terminal(NUM, "number")
}

pub(crate) fn plus() -> Parser {
    terminal(PLUS, "`+`")
}

pub(crate) fn lp() -> Parser {
    terminal(LP, "`(`")
}

pub(crate) fn rp() -> Parser {
    terminal(RP, "`)`")
}

/// Build a stream from (kind, lexeme) pairs with consecutive spans.
pub(crate) fn stream(tokens: &[(TokenKind, &str)]) -> TokenStream {
    let mut offset = 0u32;
    tokens
        .iter()
        .map(|&(kind, text)| {
            let span = Span::new(offset, offset + text.len() as u32);
            offset = span.end;
            Token::new(kind, text, span)
        })
        .collect()
}

/// Run a parser from the start of the stream, returning the result, the
/// final cursor position, and the diagnostics it recorded.
pub(crate) fn run(parser: &Parser, tokens: &TokenStream) -> (Parsed, usize, DiagnosticQueue) {
    let mut diags = DiagnosticQueue::new();
    let mut cursor = Cursor::new(tokens);
    let parsed = parser.parse(&mut cursor, &mut diags);
    (parsed, cursor.position(), diags)
}
