//! Scratch memory for parse sessions.
//!
//! The pool is created lazily by the driver on the first parse, reset
//! (capacity retained) at the start of every session, and released only by
//! an explicit `free_parser` call. Capacity therefore accumulates across
//! calls until teardown; callers that are done parsing should tear down.

use sqlfront_types::Token;
use tracing::debug;

/// Retained-capacity scratch storage owned by one parse driver.
#[derive(Debug)]
pub struct ParsePool {
    scratch: Vec<Token>,
    sessions: u64,
}

impl ParsePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        debug!("parse pool created");
        Self {
            scratch: Vec::new(),
            sessions: 0,
        }
    }

    /// The token scratch buffer. Engines drain it into parse-tree nodes;
    /// its capacity stays with the pool.
    pub fn scratch(&mut self) -> &mut Vec<Token> {
        &mut self.scratch
    }

    /// Per-session reset: discard residual contents, keep capacity.
    pub fn reset(&mut self) {
        self.scratch.clear();
        self.sessions += 1;
    }

    /// Number of sessions served since creation.
    #[must_use]
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// Tokens of scratch capacity currently retained.
    #[must_use]
    pub fn retained_capacity(&self) -> usize {
        self.scratch.capacity()
    }
}

impl Default for ParsePool {
    fn default() -> Self {
        Self::new()
    }
}
