//! Lexer, one-token-lookahead token filter, and parse driver.
//!
//! This crate is the front half of a SQL parse pipeline. The lexer turns
//! source text into tokens; the token filter fuses designated keyword pairs
//! (`NULLS FIRST`, `NULLS LAST`, `WITH CASCADED/LOCAL/CHECK`) into single
//! synthetic tokens so an LALR(1) grammar can consume the stream without
//! extra lookahead; the driver runs one grammar engine over the filtered
//! stream per [`RawParser::raw_parser`] call and owns the session's
//! error/reset contract.

pub mod driver;
pub mod engine;
pub mod filter;
pub mod lexer;
pub mod pool;

pub use driver::RawParser;
pub use engine::{EngineStatus, GrammarEngine, RawStmt, StatementSplitter};
pub use filter::{MERGE_RULES, MergeRule, TokenFilter, merged_kind};
pub use lexer::{Lexer, Scanner};
pub use pool::ParsePool;
pub use sqlfront_error::{ParserError, Result};
pub use sqlfront_types::{Span, Token, TokenKind};
