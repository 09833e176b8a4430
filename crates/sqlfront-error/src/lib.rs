//! Error types for the sqlfront parse pipeline.
//!
//! Three failure modes exist: the lexer cannot tokenize the input, the
//! grammar engine raises a syntax error mid-parse, or the engine returns a
//! plain reject status. At the `raw_parser` boundary all three collapse into
//! the same observable result (an empty parse-tree list); the error value
//! itself is kept on the driver as a diagnostic side channel.

use thiserror::Error;

/// Primary error type for sqlfront operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// The scanner could not tokenize the input at the given position.
    #[error("lexical error at {line}:{col}: {detail}")]
    Lexical {
        detail: String,
        line: u32,
        col: u32,
    },

    /// The grammar engine rejected the token sequence at the given position.
    #[error("syntax error at {line}:{col}: near \"{near}\"")]
    Syntax { near: String, line: u32, col: u32 },

    /// The grammar engine returned a reject status without raising.
    #[error("grammar engine rejected input")]
    EngineReject,
}

impl ParserError {
    /// Build a lexical error at a token position.
    #[must_use]
    pub fn lexical(detail: impl Into<String>, line: u32, col: u32) -> Self {
        Self::Lexical {
            detail: detail.into(),
            line,
            col,
        }
    }

    /// Build a syntax error near the given source text.
    #[must_use]
    pub fn syntax(near: impl Into<String>, line: u32, col: u32) -> Self {
        Self::Syntax {
            near: near.into(),
            line,
            col,
        }
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, ParserError>;
