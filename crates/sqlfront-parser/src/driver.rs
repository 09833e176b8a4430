//! Parse driver: owns one parse attempt end-to-end.
//!
//! `raw_parser` is the top-level entry point: set up the session (pool,
//! scanner, fresh token filter), run the grammar engine, finalize the
//! scanner on every exit path, and return either the parse-tree list or an
//! empty list on failure. No partial tree ever escapes. The error value, if
//! any, stays readable on the driver as a diagnostic side channel; the
//! return value does not distinguish failure modes.

use sqlfront_error::{ParserError, Result};
use tracing::debug;

use crate::engine::{EngineStatus, GrammarEngine};
use crate::filter::TokenFilter;
use crate::lexer::{Lexer, Scanner};
use crate::pool::ParsePool;

/// A family of parse sessions sharing one engine and one scratch pool.
///
/// Not re-entrant: one parse at a time per driver. Independent drivers are
/// fully independent, so concurrent parsing is one driver per thread.
pub struct RawParser<E: GrammarEngine> {
    engine: E,
    pool: Option<ParsePool>,
    result: Vec<E::Tree>,
    last_error: Option<ParserError>,
}

impl<E: GrammarEngine> RawParser<E> {
    /// Create a driver around a grammar engine. No pool is allocated until
    /// the first parse.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            pool: None,
            result: Vec::new(),
            last_error: None,
        }
    }

    /// Do lexical and grammatical analysis of one query string.
    ///
    /// Returns the list of raw parse trees, or an empty list on any failure
    /// (lexical error, syntax error, or engine reject). [`Self::last_error`]
    /// tells the failure modes apart.
    pub fn raw_parser(&mut self, input: &str) -> Vec<E::Tree> {
        self.run_with_scanner(Lexer::new(input))
    }

    /// Run one parse session over an externally constructed scanner.
    pub fn run_with_scanner<S: Scanner>(&mut self, scanner: S) -> Vec<E::Tree> {
        match self.session(scanner) {
            Ok(trees) => {
                debug!(trees = trees.len(), "parse accepted");
                trees
            }
            Err(err) => {
                debug!(%err, "parse attempt failed");
                self.result.clear();
                self.last_error = Some(err);
                Vec::new()
            }
        }
    }

    /// One parse attempt. The scanner is finalized on every exit path.
    fn session<S: Scanner>(&mut self, scanner: S) -> Result<Vec<E::Tree>> {
        let pool = self.pool.get_or_insert_with(ParsePool::new);
        pool.reset();
        self.result.clear();
        self.last_error = None;

        let mut filter = TokenFilter::new(scanner);
        let run = self.engine.run(&mut filter, pool, &mut self.result);
        filter.into_scanner().finish();

        match run? {
            EngineStatus::Accept => Ok(std::mem::take(&mut self.result)),
            EngineStatus::Reject => Err(ParserError::EngineReject),
        }
    }

    /// Release all pool memory. The next parse recreates the pool, so the
    /// driver stays usable after teardown.
    pub fn free_parser(&mut self) {
        if let Some(pool) = self.pool.take() {
            debug!(
                sessions = pool.sessions(),
                retained = pool.retained_capacity(),
                "parse pool released"
            );
        }
    }

    /// The error behind the most recent empty result, if the most recent
    /// parse failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&ParserError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use sqlfront_types::{Token, TokenKind};

    use crate::engine::StatementSplitter;

    use super::*;

    /// Engine that always rejects without raising.
    struct RejectingEngine;
    impl GrammarEngine for RejectingEngine {
        type Tree = ();
        fn run<S: Scanner>(
            &mut self,
            tokens: &mut TokenFilter<S>,
            _pool: &mut ParsePool,
            out: &mut Vec<()>,
        ) -> Result<EngineStatus> {
            // Leave a partial result behind to prove it never escapes.
            out.push(());
            let _ = tokens.next_token()?;
            Ok(EngineStatus::Reject)
        }
    }

    /// Engine that raises a syntax error on the first token.
    struct RaisingEngine;
    impl GrammarEngine for RaisingEngine {
        type Tree = ();
        fn run<S: Scanner>(
            &mut self,
            tokens: &mut TokenFilter<S>,
            _pool: &mut ParsePool,
            _out: &mut Vec<()>,
        ) -> Result<EngineStatus> {
            let tok = tokens.next_token()?;
            Err(ParserError::syntax(format!("{:?}", tok.kind), tok.line, tok.col))
        }
    }

    #[test]
    fn test_accept_returns_trees_and_clears_error() {
        let mut parser = RawParser::new(StatementSplitter);
        let trees = parser.raw_parser("SELECT 1; SELECT 2");
        assert_eq!(trees.len(), 2);
        assert!(parser.last_error().is_none());
    }

    #[test]
    fn test_lexical_error_returns_empty() {
        let mut parser = RawParser::new(StatementSplitter);
        let trees = parser.raw_parser("SELECT 'unterminated");
        assert!(trees.is_empty());
        assert!(matches!(
            parser.last_error(),
            Some(ParserError::Lexical { .. })
        ));
    }

    #[test]
    fn test_reject_discards_partial_result() {
        let mut parser = RawParser::new(RejectingEngine);
        let trees = parser.raw_parser("SELECT 1");
        assert!(trees.is_empty());
        assert_eq!(parser.last_error(), Some(&ParserError::EngineReject));
    }

    #[test]
    fn test_raised_syntax_error_returns_empty() {
        let mut parser = RawParser::new(RaisingEngine);
        assert!(parser.raw_parser("SELECT").is_empty());
        assert!(matches!(
            parser.last_error(),
            Some(ParserError::Syntax { .. })
        ));
    }

    #[test]
    fn test_error_then_success_resets_side_channel() {
        let mut parser = RawParser::new(StatementSplitter);
        assert!(parser.raw_parser("'open").is_empty());
        assert!(parser.last_error().is_some());

        let trees = parser.raw_parser("SELECT 1");
        assert_eq!(trees.len(), 1);
        assert!(parser.last_error().is_none());
    }

    #[test]
    fn test_pool_is_created_once_and_freed_on_teardown() {
        let mut parser = RawParser::new(StatementSplitter);
        assert!(parser.pool.is_none());

        parser.raw_parser("SELECT 1");
        parser.raw_parser("SELECT 2");
        assert_eq!(parser.pool.as_ref().map(ParsePool::sessions), Some(2));

        parser.free_parser();
        assert!(parser.pool.is_none());

        // Usable again after teardown; the pool is recreated.
        assert_eq!(parser.raw_parser("SELECT 3").len(), 1);
        assert_eq!(parser.pool.as_ref().map(ParsePool::sessions), Some(1));
    }

    #[test]
    fn test_scanner_finalized_on_error_path() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct TrackedScanner {
            inner: Vec<Token>,
            next: usize,
            finished: Rc<Cell<bool>>,
        }
        impl Scanner for TrackedScanner {
            fn next_token(&mut self) -> Result<Token> {
                let tok = self.inner.get(self.next).cloned().ok_or_else(|| {
                    ParserError::lexical("unterminated string literal", 1, 9)
                })?;
                self.next += 1;
                Ok(tok)
            }
            fn finish(&mut self) {
                self.finished.set(true);
            }
        }

        let finished = Rc::new(Cell::new(false));
        let scanner = TrackedScanner {
            inner: vec![Token::new(
                TokenKind::KwSelect,
                sqlfront_types::Span::new(0, 6),
                1,
                1,
            )],
            next: 0,
            finished: Rc::clone(&finished),
        };

        let mut parser = RawParser::new(StatementSplitter);
        assert!(parser.run_with_scanner(scanner).is_empty());
        assert!(finished.get(), "scanner must be finalized on the error path");
        assert!(matches!(
            parser.last_error(),
            Some(ParserError::Lexical { .. })
        ));
    }
}
