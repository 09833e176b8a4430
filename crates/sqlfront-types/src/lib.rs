//! Core types shared across the sqlfront workspace.
//!
//! A [`Token`] is an atomic lexical unit: a [`TokenKind`] discriminant plus a
//! byte-offset [`Span`] and line/column position into the original source
//! text. Tokens are produced by the lexer, rewritten by the token filter,
//! and consumed by whatever grammar engine sits on top.

mod span;
mod token;

pub use span::Span;
pub use token::{Token, TokenKind};
