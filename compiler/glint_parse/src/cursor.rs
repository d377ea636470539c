//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.
//! Combinators backtrack by saving the position and writing it back, so
//! `position`/`set_position` are the primitive save/restore pair.

use glint_ir::{Span, Token, TokenCapture, TokenKind, TokenStream};

/// Cursor for navigating tokens.
///
/// Tracks the current position in the token stream. The position advances
/// monotonically during a match and is restored at combinator boundaries
/// on backtracking.
pub struct Cursor<'a> {
    tokens: &'a TokenStream,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenStream) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Get the underlying token stream.
    #[inline]
    pub fn tokens(&self) -> &'a TokenStream {
        self.tokens
    }

    /// Get the current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// Used by combinators to roll back after a failed attempt. The
    /// position must be within bounds (one past the last token is valid,
    /// meaning end of input).
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos <= self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos;
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get the current token, or `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Get the current token's kind, or `None` at end of input.
    #[inline]
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|token| token.kind)
    }

    /// Span of the current token, or a point span just past the last
    /// token at end of input.
    pub fn current_span(&self) -> Span {
        match self.current() {
            Some(token) => token.span,
            None => match self.tokens.len().checked_sub(1).and_then(|i| self.tokens.get(i)) {
                Some(last) => Span::point(last.span.end),
                None => Span::DUMMY,
            },
        }
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Advance to the next token and return the consumed token.
    ///
    /// Returns `None` (without moving) at end of input.
    #[inline]
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Mark the current position for starting a token capture.
    #[inline]
    pub fn start_capture(&self) -> u32 {
        self.pos as u32
    }

    /// Complete a token capture from a start position.
    ///
    /// Returns `TokenCapture::None` if no tokens were consumed.
    #[inline]
    pub fn complete_capture(&self, start: u32) -> TokenCapture {
        TokenCapture::new(start, self.pos as u32)
    }

    /// Describe the current token for error messages: "`lexeme`" or
    /// "end of input".
    pub fn found_description(&self) -> String {
        match self.current() {
            Some(token) => format!("`{}`", token.text),
            None => "end of input".to_string(),
        }
    }
}
