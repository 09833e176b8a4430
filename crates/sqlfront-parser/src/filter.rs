//! One-token-lookahead filter between the scanner and the grammar engine.
//!
//! Some constructs in the grammar would need two tokens of lookahead to
//! disambiguate (`NULLS FIRST` vs. `NULLS` as a bare keyword, `WITH CHECK
//! OPTION` vs. `WITH` introducing a CTE list). The filter fuses those
//! keyword pairs into single synthetic tokens so the grammar stays LALR(1),
//! without scanner backtracking and without pushing multi-word recognition
//! down into the lexer (where comments between the words would get in the
//! way).
//!
//! The rule set is a static table: adding a new multi-word token is one new
//! table entry, not new control flow.

use sqlfront_error::Result;
use sqlfront_types::{Token, TokenKind};
use tracing::trace;

use crate::lexer::Scanner;

/// Merge rules for one trigger kind: the continuations that may follow it
/// and the synthetic kind each pair fuses into.
#[derive(Debug)]
pub struct MergeRule {
    /// The token kind that may begin a multi-word token.
    pub trigger: TokenKind,
    /// (continuation kind, merged kind) pairs registered for the trigger.
    pub continuations: &'static [(TokenKind, TokenKind)],
}

impl MergeRule {
    /// The merged kind for a continuation, if the pair is registered.
    #[must_use]
    pub fn merged(&self, continuation: &TokenKind) -> Option<TokenKind> {
        self.continuations
            .iter()
            .find(|(cont, _)| cont == continuation)
            .map(|(_, merged)| merged.clone())
    }
}

/// The complete multi-word token table.
pub const MERGE_RULES: &[MergeRule] = &[
    MergeRule {
        trigger: TokenKind::KwNulls,
        continuations: &[
            (TokenKind::KwFirst, TokenKind::NullsFirst),
            (TokenKind::KwLast, TokenKind::NullsLast),
        ],
    },
    MergeRule {
        trigger: TokenKind::KwWith,
        continuations: &[
            (TokenKind::KwCascaded, TokenKind::WithCascaded),
            (TokenKind::KwLocal, TokenKind::WithLocal),
            (TokenKind::KwCheck, TokenKind::WithCheck),
        ],
    },
];

/// The merged kind for a (trigger, continuation) pair, if registered.
/// Exposed so the rule table can be audited and tested in isolation.
#[must_use]
pub fn merged_kind(trigger: &TokenKind, continuation: &TokenKind) -> Option<TokenKind> {
    rule_for(trigger).and_then(|rule| rule.merged(continuation))
}

fn rule_for(kind: &TokenKind) -> Option<&'static MergeRule> {
    MERGE_RULES.iter().find(|rule| rule.trigger == *kind)
}

/// Wraps a [`Scanner`] and presents an equivalent token stream in which the
/// registered two-token sequences are replaced by single synthetic tokens.
///
/// Holds at most one buffered token at any time; the scanner is never more
/// than one token ahead of what the consumer has seen. One filter instance
/// belongs to exactly one parse session.
pub struct TokenFilter<S: Scanner> {
    scanner: S,
    lookahead: Option<Token>,
}

impl<S: Scanner> TokenFilter<S> {
    /// Wrap a scanner with an empty lookahead slot.
    #[must_use]
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            lookahead: None,
        }
    }

    /// Produce the next token for the grammar engine.
    ///
    /// A buffered lookahead token is consumed first and is itself checked
    /// as a potential merge trigger, so back-to-back triggers (`WITH WITH
    /// CHECK`) are each handled afresh. When a trigger is followed by a
    /// registered continuation, the merged token carries the trigger's span
    /// and position; otherwise the second token is buffered verbatim and
    /// the trigger is returned unmerged.
    pub fn next_token(&mut self) -> Result<Token> {
        let cur = match self.lookahead.take() {
            Some(tok) => tok,
            None => self.scanner.next_token()?,
        };

        let Some(rule) = rule_for(&cur.kind) else {
            return Ok(cur);
        };

        let next = self.scanner.next_token()?;
        if let Some(merged) = rule.merged(&next.kind) {
            trace!(?cur.kind, ?next.kind, ?merged, "fused multi-word token");
            return Ok(Token::new(merged, cur.span, cur.line, cur.col));
        }

        // Not a registered pair: save the lookahead token for next time and
        // emit the trigger unchanged.
        self.lookahead = Some(next);
        Ok(cur)
    }

    /// The wrapped scanner.
    #[must_use]
    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Tear down the filter and hand the scanner back for finalization.
    #[must_use]
    pub fn into_scanner(self) -> S {
        self.scanner
    }
}

#[cfg(test)]
mod tests {
    use sqlfront_error::ParserError;
    use sqlfront_types::Span;

    use super::*;

    /// Scripted scanner over a fixed token list. Counts calls, keeps
    /// returning `Eof` once the script is exhausted.
    struct ScriptScanner {
        script: Vec<Token>,
        next: usize,
        calls: usize,
    }

    impl ScriptScanner {
        fn new(kinds: Vec<TokenKind>) -> Self {
            // Give each token a distinct span so location preservation is
            // observable.
            let script = kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| {
                    let start = (i * 10) as u32;
                    Token::new(kind, Span::new(start, start + 5), 1, start + 1)
                })
                .collect();
            Self {
                script,
                next: 0,
                calls: 0,
            }
        }
    }

    impl Scanner for ScriptScanner {
        fn next_token(&mut self) -> Result<Token> {
            self.calls += 1;
            let tok = self.script.get(self.next).cloned().unwrap_or_else(|| {
                Token::new(TokenKind::Eof, Span::ZERO, 1, 1)
            });
            self.next = (self.next + 1).min(self.script.len());
            Ok(tok)
        }
    }

    fn drain(filter: &mut TokenFilter<ScriptScanner>) -> Vec<TokenKind> {
        let mut kinds = Vec::new();
        loop {
            let tok = filter.next_token().expect("script never errors");
            let at_end = tok.kind.is_eof();
            kinds.push(tok.kind);
            if at_end {
                return kinds;
            }
        }
    }

    #[test]
    fn test_merge_table_pairs() {
        use TokenKind::{
            KwCascaded, KwCheck, KwFirst, KwLast, KwLocal, KwNulls, KwSelect, KwWith, NullsFirst,
            NullsLast, WithCascaded, WithCheck, WithLocal,
        };
        assert_eq!(merged_kind(&KwNulls, &KwFirst), Some(NullsFirst));
        assert_eq!(merged_kind(&KwNulls, &KwLast), Some(NullsLast));
        assert_eq!(merged_kind(&KwWith, &KwCascaded), Some(WithCascaded));
        assert_eq!(merged_kind(&KwWith, &KwLocal), Some(WithLocal));
        assert_eq!(merged_kind(&KwWith, &KwCheck), Some(WithCheck));
        // Unregistered pairs do not merge.
        assert_eq!(merged_kind(&KwNulls, &KwCheck), None);
        assert_eq!(merged_kind(&KwWith, &KwFirst), None);
        assert_eq!(merged_kind(&KwSelect, &KwFirst), None);
    }

    #[test]
    fn test_nulls_first_fuses_and_consumes_two() {
        let mut filter = TokenFilter::new(ScriptScanner::new(vec![
            TokenKind::KwNulls,
            TokenKind::KwFirst,
            TokenKind::Eof,
        ]));
        let tok = filter.next_token().expect("ok");
        assert_eq!(tok.kind, TokenKind::NullsFirst);
        // Exactly two scanner tokens consumed for the one merged token.
        assert_eq!(filter.scanner.calls, 2);
        // Merged token carries the trigger's location.
        assert_eq!(tok.span, Span::new(0, 5));
        assert_eq!((tok.line, tok.col), (1, 1));
        assert!(filter.next_token().expect("ok").kind.is_eof());
    }

    #[test]
    fn test_nulls_unmerged_preserves_lookahead_verbatim() {
        let mut filter = TokenFilter::new(ScriptScanner::new(vec![
            TokenKind::KwNulls,
            TokenKind::Comma,
            TokenKind::Eof,
        ]));
        let first = filter.next_token().expect("ok");
        assert_eq!(first.kind, TokenKind::KwNulls);
        assert_eq!(first.span, Span::new(0, 5));
        assert_eq!(filter.scanner.calls, 2);

        // Second call emits the buffered token bit-for-bit, no scanner pull.
        let second = filter.next_token().expect("ok");
        assert_eq!(second.kind, TokenKind::Comma);
        assert_eq!(second.span, Span::new(10, 15));
        assert_eq!((second.line, second.col), (1, 11));
        assert_eq!(filter.scanner.calls, 2);
    }

    #[test]
    fn test_with_check_scenario() {
        let mut filter = TokenFilter::new(ScriptScanner::new(vec![
            TokenKind::KwWith,
            TokenKind::KwCheck,
            TokenKind::Eof,
        ]));
        assert_eq!(drain(&mut filter), vec![TokenKind::WithCheck, TokenKind::Eof]);
    }

    #[test]
    fn test_with_select_passes_through_in_order() {
        let mut filter = TokenFilter::new(ScriptScanner::new(vec![
            TokenKind::KwWith,
            TokenKind::KwSelect,
            TokenKind::Eof,
        ]));
        assert_eq!(
            drain(&mut filter),
            vec![TokenKind::KwWith, TokenKind::KwSelect, TokenKind::Eof]
        );
    }

    #[test]
    fn test_back_to_back_triggers_with_with_check() {
        // The buffered second WITH must act as a fresh trigger and fuse with
        // CHECK; no token is lost.
        let mut filter = TokenFilter::new(ScriptScanner::new(vec![
            TokenKind::KwWith,
            TokenKind::KwWith,
            TokenKind::KwCheck,
            TokenKind::Eof,
        ]));
        assert_eq!(
            drain(&mut filter),
            vec![TokenKind::KwWith, TokenKind::WithCheck, TokenKind::Eof]
        );
    }

    #[test]
    fn test_trigger_at_end_of_stream() {
        let mut filter =
            TokenFilter::new(ScriptScanner::new(vec![TokenKind::KwNulls, TokenKind::Eof]));
        assert_eq!(drain(&mut filter), vec![TokenKind::KwNulls, TokenKind::Eof]);
    }

    #[test]
    fn test_scanner_never_more_than_one_ahead() {
        let mut filter = TokenFilter::new(ScriptScanner::new(vec![
            TokenKind::KwNulls,
            TokenKind::Comma,
            TokenKind::KwWith,
            TokenKind::KwLocal,
            TokenKind::Eof,
        ]));
        let mut emitted = 0usize;
        loop {
            let tok = filter.next_token().expect("ok");
            emitted += 1;
            // Tokens handed to the scanner side never exceed emitted + 1.
            assert!(filter.scanner.next <= emitted + 1);
            // The slot never holds more than one token by construction; it
            // must also be empty whenever no merge candidate is pending.
            assert!(filter.lookahead.is_none() || filter.scanner.next >= emitted);
            if tok.kind.is_eof() {
                break;
            }
        }
    }

    #[test]
    fn test_scanner_error_propagates() {
        struct FailingScanner;
        impl Scanner for FailingScanner {
            fn next_token(&mut self) -> Result<Token> {
                Err(ParserError::lexical("unterminated string literal", 1, 1))
            }
        }
        let mut filter = TokenFilter::new(FailingScanner);
        assert!(matches!(
            filter.next_token(),
            Err(ParserError::Lexical { .. })
        ));
    }
}
