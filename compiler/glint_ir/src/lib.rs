//! Glint IR - core data types for the compiler front-end.
//!
//! This crate contains the data structures shared between the lexer, the
//! parser engine, and AST construction:
//! - Spans for source locations
//! - Tokens and `TokenStream` for lexer output
//! - The attribute tree produced by a parse
//!
//! # Design Philosophy
//!
//! - **Index, don't clone**: attributes refer to tokens by `TokenIdx` and
//!   `TokenCapture` ranges into the `TokenStream` that produced them.
//! - **Closed sums**: the attribute shapes are a small fixed set, modeled
//!   as a tagged enum rather than an open trait hierarchy.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod attr;
mod span;
mod token;

pub use attr::{Attr, AttrKind, RuleId};
pub use span::Span;
pub use token::{Token, TokenCapture, TokenIdx, TokenKind, TokenStream};
