//! Raw lexical scanner for the SQL-like language.
//!
//! [`Lexer`] converts source text into a stream of [`Token`]s, one call at a
//! time. Uses memchr for accelerated quote scanning. Tracks line/column for
//! error reporting. The lexer knows nothing about multi-word tokens; those
//! are fused one layer up by the token filter.
//!
//! The [`Scanner`] trait is the seam the filter and driver consume, so a
//! parse session can run over any token source (the real lexer, or a
//! scripted stream in tests).

use memchr::memchr;
use sqlfront_error::{ParserError, Result};
use sqlfront_types::{Span, Token, TokenKind};
use tracing::debug;

/// A pull-based token source for one parse session.
///
/// Lexical errors are reported through the `Result` return rather than as
/// in-band error tokens. After end of input, `next_token` keeps returning
/// `Eof` tokens, so a consumer may safely look one token ahead of the end.
pub trait Scanner {
    /// Produce the next token, or a lexical error.
    fn next_token(&mut self) -> Result<Token>;

    /// Finalize the scanner at the end of a session.
    ///
    /// Called on every session exit path, success or failure. Must be
    /// idempotent.
    fn finish(&mut self) {}
}

/// SQL lexer over a borrowed source string.
pub struct Lexer<'a> {
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// Current byte offset into src.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Tokens produced so far, for the session-end log line.
    emitted: u64,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given source text.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            emitted: 0,
        }
    }

    /// Tokenize the entire input, stopping at the first lexical error.
    /// The final token is `Eof` on success.
    pub fn tokenize(source: &'a str) -> Result<Vec<Token>> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let at_end = tok.kind.is_eof();
            tokens.push(tok);
            if at_end {
                return Ok(tokens);
            }
        }
    }

    fn scan(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        if self.pos >= self.src.len() {
            let end = self.pos as u32;
            return Ok(Token::new(TokenKind::Eof, Span::new(end, end), self.line, self.col));
        }

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let ch = self.src[self.pos];

        let kind = match ch {
            b'\'' => self.lex_string(start_line, start_col)?,
            b'"' => self.lex_quoted_ident(start_line, start_col)?,

            b'0'..=b'9' => self.lex_number(start_line, start_col)?,
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number(start_line, start_col)?
            }

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_ident(),

            b'$' => self.lex_param(start_line, start_col)?,

            b'+' => {
                self.advance();
                TokenKind::Plus
            }
            b'-' => {
                self.advance();
                TokenKind::Minus
            }
            b'*' => {
                self.advance();
                TokenKind::Star
            }
            b'/' => {
                self.advance();
                TokenKind::Slash
            }
            b'%' => {
                self.advance();
                TokenKind::Percent
            }
            b'^' => {
                self.advance();
                TokenKind::Caret
            }
            b'.' => {
                self.advance();
                TokenKind::Dot
            }
            b',' => {
                self.advance();
                TokenKind::Comma
            }
            b';' => {
                self.advance();
                TokenKind::Semicolon
            }
            b'(' => {
                self.advance();
                TokenKind::LeftParen
            }
            b')' => {
                self.advance();
                TokenKind::RightParen
            }
            b'[' => {
                self.advance();
                TokenKind::LeftBracket
            }
            b']' => {
                self.advance();
                TokenKind::RightBracket
            }

            b':' => {
                self.advance();
                if self.peek() == Some(b':') {
                    self.advance();
                    TokenKind::Typecast
                } else {
                    TokenKind::Colon
                }
            }
            b'=' => {
                self.advance();
                TokenKind::Eq
            }
            b'<' => {
                self.advance();
                match self.peek() {
                    Some(b'=') => {
                        self.advance();
                        TokenKind::Le
                    }
                    Some(b'>') => {
                        self.advance();
                        TokenKind::Ne
                    }
                    _ => TokenKind::Lt,
                }
            }
            b'>' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Ne
                } else {
                    return Err(ParserError::lexical(
                        "unexpected '!', did you mean '!='?",
                        start_line,
                        start_col,
                    ));
                }
            }

            _ => {
                self.advance();
                let text = String::from_utf8_lossy(&self.src[start..self.pos]);
                return Err(ParserError::lexical(
                    format!("unrecognized character: {text}"),
                    start_line,
                    start_col,
                ));
            }
        };

        Ok(Token::new(
            kind,
            Span::new(start as u32, self.pos as u32),
            start_line,
            start_col,
        ))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn advance(&mut self) -> u8 {
        let ch = self.src[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Skip whitespace, line comments (`--`), and nesting block comments
    /// (`/* */`). An unterminated block comment is a lexical error.
    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
                self.advance();
            }

            if self.pos >= self.src.len() {
                return Ok(());
            }

            if self.src[self.pos] == b'-' && self.peek_at(1) == Some(b'-') {
                self.advance();
                self.advance();
                while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
                    self.advance();
                }
                continue;
            }

            if self.src[self.pos] == b'/' && self.peek_at(1) == Some(b'*') {
                let start_line = self.line;
                let start_col = self.col;
                self.advance();
                self.advance();
                let mut depth = 1u32;
                while self.pos < self.src.len() && depth > 0 {
                    if self.src[self.pos] == b'/' && self.peek_at(1) == Some(b'*') {
                        self.advance();
                        self.advance();
                        depth += 1;
                    } else if self.src[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                        self.advance();
                        self.advance();
                        depth -= 1;
                    } else {
                        self.advance();
                    }
                }
                if depth > 0 {
                    return Err(ParserError::lexical(
                        "unterminated block comment",
                        start_line,
                        start_col,
                    ));
                }
                continue;
            }

            return Ok(());
        }
    }

    // -----------------------------------------------------------------------
    // Literals, identifiers, parameters
    // -----------------------------------------------------------------------

    /// Lex a single-quoted string literal with `''` escapes. Uses memchr for
    /// fast quote search.
    fn lex_string(&mut self, start_line: u32, start_col: u32) -> Result<TokenKind> {
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(b'\'', remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    for _ in 0..offset {
                        self.advance();
                    }
                    self.advance(); // the quote itself

                    // Doubled-quote escape: '' -> '
                    if self.peek() == Some(b'\'') {
                        value.push('\'');
                        self.advance();
                    } else {
                        return Ok(TokenKind::String(value));
                    }
                }
                None => {
                    while self.pos < self.src.len() {
                        self.advance();
                    }
                    return Err(ParserError::lexical(
                        "unterminated string literal",
                        start_line,
                        start_col,
                    ));
                }
            }
        }
    }

    /// Lex a double-quoted identifier with `""` escapes. Case is preserved.
    fn lex_quoted_ident(&mut self, start_line: u32, start_col: u32) -> Result<TokenKind> {
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(b'"', remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    for _ in 0..offset {
                        self.advance();
                    }
                    self.advance(); // the quote itself

                    if self.peek() == Some(b'"') {
                        value.push('"');
                        self.advance();
                    } else if value.is_empty() {
                        return Err(ParserError::lexical(
                            "zero-length delimited identifier",
                            start_line,
                            start_col,
                        ));
                    } else {
                        return Ok(TokenKind::QuotedIdent(value));
                    }
                }
                None => {
                    while self.pos < self.src.len() {
                        self.advance();
                    }
                    return Err(ParserError::lexical(
                        "unterminated quoted identifier",
                        start_line,
                        start_col,
                    ));
                }
            }
        }
    }

    /// Lex a numeric literal: integer or float (fraction and/or exponent).
    /// An integer too large for i64 falls back to a float, as the language
    /// has no integer-overflow lexical error.
    fn lex_number(&mut self, start_line: u32, start_col: u32) -> Result<TokenKind> {
        let start = self.pos;
        let mut is_float = false;

        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.advance();
        }

        if self.peek() == Some(b'.') && self.peek_at(1).is_none_or(|c| c != b'.') {
            // A second dot means `1..2` range-like input; leave it alone.
            is_float = true;
            self.advance();
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            let digits_start = self.pos;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
            if self.pos == digits_start {
                return Err(ParserError::lexical(
                    "malformed numeric literal: missing exponent digits",
                    start_line,
                    start_col,
                ));
            }
        }

        let text = String::from_utf8_lossy(&self.src[start..self.pos]);
        if is_float {
            match text.parse::<f64>() {
                Ok(v) => Ok(TokenKind::Float(v)),
                Err(_) => Err(ParserError::lexical(
                    format!("malformed numeric literal: {text}"),
                    start_line,
                    start_col,
                )),
            }
        } else {
            text.parse::<i64>().map_or_else(
                |_| {
                    text.parse::<f64>().map(TokenKind::Float).map_err(|_| {
                        ParserError::lexical(
                            format!("malformed numeric literal: {text}"),
                            start_line,
                            start_col,
                        )
                    })
                },
                |v| Ok(TokenKind::Integer(v)),
            )
        }
    }

    /// Lex an identifier or keyword. Unquoted identifiers are case-folded
    /// to lowercase; keyword recognition is case-insensitive.
    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance(); // first character already validated

        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        TokenKind::lookup_keyword(&text)
            .unwrap_or_else(|| TokenKind::Ident(text.to_ascii_lowercase()))
    }

    /// Lex a positional parameter `$1`, `$2`, ...
    fn lex_param(&mut self, start_line: u32, start_col: u32) -> Result<TokenKind> {
        self.advance(); // skip $
        let num_start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.advance();
        }
        if self.pos == num_start {
            return Err(ParserError::lexical(
                "invalid parameter marker: '$' must be followed by digits",
                start_line,
                start_col,
            ));
        }
        let text = String::from_utf8_lossy(&self.src[num_start..self.pos]);
        text.parse::<u32>().map(TokenKind::Param).map_err(|_| {
            ParserError::lexical(
                format!("parameter number out of range: ${text}"),
                start_line,
                start_col,
            )
        })
    }
}

impl Scanner for Lexer<'_> {
    fn next_token(&mut self) -> Result<Token> {
        let tok = self.scan()?;
        self.emitted += 1;
        Ok(tok)
    }

    fn finish(&mut self) {
        debug!(tokens = self.emitted, "scanner finished");
    }
}
