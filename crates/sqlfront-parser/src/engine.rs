//! Grammar-engine seam and the bundled reference engine.
//!
//! The real grammar is table-driven generated code that lives outside this
//! crate; the driver only needs a single entry point that pulls tokens
//! through the filter, fills the shared result, and says accept or reject.
//! [`StatementSplitter`] is the bundled minimal engine: it groups the
//! filtered stream into raw statements at semicolons, which is all a query
//! router needs and exercises the full session plumbing.

use sqlfront_error::Result;
use sqlfront_types::{Span, Token, TokenKind};

use crate::filter::TokenFilter;
use crate::lexer::Scanner;
use crate::pool::ParsePool;

/// Outcome of one grammar-engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// The token stream was accepted; the result list is valid.
    Accept,
    /// The token stream was rejected without raising an error.
    Reject,
}

/// One parse attempt's grammar engine.
///
/// `run` pulls tokens from the filter until accept or error, allocating
/// scratch from the pool and appending parse-tree roots to `out`. A syntax
/// error may also be raised through the `Result` instead of returning
/// [`EngineStatus::Reject`]; the driver collapses both into the same
/// observable failure.
pub trait GrammarEngine {
    /// Parse-tree root node type. Opaque to the driver.
    type Tree;

    fn run<S: Scanner>(
        &mut self,
        tokens: &mut TokenFilter<S>,
        pool: &mut ParsePool,
        out: &mut Vec<Self::Tree>,
    ) -> Result<EngineStatus>;
}

/// A raw statement: the filtered tokens between statement separators,
/// with the covering source span.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStmt {
    /// Filtered tokens of the statement, separators excluded.
    pub tokens: Vec<Token>,
    /// Source span covering the whole statement.
    pub span: Span,
}

/// Reference engine: splits the filtered token stream into [`RawStmt`]s at
/// semicolons. Never rejects; empty input accepts with an empty list.
#[derive(Debug, Default)]
pub struct StatementSplitter;

impl StatementSplitter {
    fn flush(pool: &mut ParsePool, out: &mut Vec<RawStmt>) {
        let buf = pool.scratch();
        if buf.is_empty() {
            return;
        }
        let span = buf
            .iter()
            .map(|tok| tok.span)
            .reduce(Span::merge)
            .unwrap_or(Span::ZERO);
        out.push(RawStmt {
            tokens: buf.drain(..).collect(),
            span,
        });
    }
}

impl GrammarEngine for StatementSplitter {
    type Tree = RawStmt;

    fn run<S: Scanner>(
        &mut self,
        tokens: &mut TokenFilter<S>,
        pool: &mut ParsePool,
        out: &mut Vec<RawStmt>,
    ) -> Result<EngineStatus> {
        loop {
            let tok = tokens.next_token()?;
            match tok.kind {
                TokenKind::Eof => {
                    Self::flush(pool, out);
                    return Ok(EngineStatus::Accept);
                }
                TokenKind::Semicolon => Self::flush(pool, out),
                _ => pool.scratch().push(tok),
            }
        }
    }
}
