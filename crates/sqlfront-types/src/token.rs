use crate::span::Span;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token discriminant.
    pub kind: TokenKind,
    /// Byte-offset span into the original source.
    pub span: Span,
    /// Line number (1-based) at the start of the token.
    pub line: u32,
    /// Column number (1-based) at the start of the token.
    pub col: u32,
}

impl Token {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, line: u32, col: u32) -> Self {
        Self {
            kind,
            span,
            line,
            col,
        }
    }
}

/// Token discriminant.
///
/// Organized by category: literals, identifiers, parameters, operators,
/// punctuation, keywords, merged multi-word tokens, and end-of-input.
///
/// The merged variants (`NullsFirst`, `WithCheck`, ...) are never produced
/// by the lexer. They exist only as output of the token filter, which fuses
/// the corresponding two-keyword sequences so that an LALR(1) grammar can
/// consume them as single terminals.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Integer literal: `42`, `0`.
    Integer(i64),
    /// Float literal: `3.14`, `1e10`, `.5`.
    Float(f64),
    /// String literal (single-quoted): `'hello'`.
    String(String),

    // === Identifiers ===
    /// Unquoted identifier, case-folded to lowercase.
    Ident(String),
    /// Double-quoted identifier, case preserved.
    QuotedIdent(String),

    // === Parameters ===
    /// Positional parameter: `$1`, `$2`, ...
    Param(u32),

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    Ne, // `<>` or `!=`
    Lt,
    Le,
    Gt,
    Ge,
    Typecast, // `::`

    // === Punctuation ===
    Dot,
    Comma,
    Semicolon,
    Colon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    // === Keywords ===
    KwAll,
    KwAnd,
    KwAs,
    KwAsc,
    KwBetween,
    KwBy,
    KwCascaded,
    KwCase,
    KwCast,
    KwCheck,
    KwCreate,
    KwCross,
    KwDelete,
    KwDesc,
    KwDistinct,
    KwDrop,
    KwElse,
    KwEnd,
    KwExcept,
    KwExists,
    KwFalse,
    KwFirst,
    KwFrom,
    KwFull,
    KwGrant,
    KwGroup,
    KwHaving,
    KwIn,
    KwInner,
    KwInsert,
    KwIntersect,
    KwInto,
    KwIs,
    KwJoin,
    KwLast,
    KwLeft,
    KwLike,
    KwLimit,
    KwLocal,
    KwNot,
    KwNull,
    KwNulls,
    KwOffset,
    KwOn,
    KwOption,
    KwOr,
    KwOrder,
    KwOuter,
    KwRecursive,
    KwRight,
    KwSelect,
    KwSet,
    KwTable,
    KwThen,
    KwTrue,
    KwUnion,
    KwUpdate,
    KwUsing,
    KwValues,
    KwView,
    KwWhen,
    KwWhere,
    KwWith,

    // === Merged multi-word tokens (filter output only) ===
    /// `NULLS FIRST` fused by the token filter.
    NullsFirst,
    /// `NULLS LAST` fused by the token filter.
    NullsLast,
    /// `WITH CASCADED` fused by the token filter.
    WithCascaded,
    /// `WITH LOCAL` fused by the token filter.
    WithLocal,
    /// `WITH CHECK` fused by the token filter.
    WithCheck,

    // === Special ===
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up an identifier string to see if it's a keyword.
    /// Returns the keyword variant if so, else `None`.
    ///
    /// Matching is case-insensitive, as SQL keywords are.
    #[must_use]
    pub fn lookup_keyword(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Some(Self::KwAll),
            "AND" => Some(Self::KwAnd),
            "AS" => Some(Self::KwAs),
            "ASC" => Some(Self::KwAsc),
            "BETWEEN" => Some(Self::KwBetween),
            "BY" => Some(Self::KwBy),
            "CASCADED" => Some(Self::KwCascaded),
            "CASE" => Some(Self::KwCase),
            "CAST" => Some(Self::KwCast),
            "CHECK" => Some(Self::KwCheck),
            "CREATE" => Some(Self::KwCreate),
            "CROSS" => Some(Self::KwCross),
            "DELETE" => Some(Self::KwDelete),
            "DESC" => Some(Self::KwDesc),
            "DISTINCT" => Some(Self::KwDistinct),
            "DROP" => Some(Self::KwDrop),
            "ELSE" => Some(Self::KwElse),
            "END" => Some(Self::KwEnd),
            "EXCEPT" => Some(Self::KwExcept),
            "EXISTS" => Some(Self::KwExists),
            "FALSE" => Some(Self::KwFalse),
            "FIRST" => Some(Self::KwFirst),
            "FROM" => Some(Self::KwFrom),
            "FULL" => Some(Self::KwFull),
            "GRANT" => Some(Self::KwGrant),
            "GROUP" => Some(Self::KwGroup),
            "HAVING" => Some(Self::KwHaving),
            "IN" => Some(Self::KwIn),
            "INNER" => Some(Self::KwInner),
            "INSERT" => Some(Self::KwInsert),
            "INTERSECT" => Some(Self::KwIntersect),
            "INTO" => Some(Self::KwInto),
            "IS" => Some(Self::KwIs),
            "JOIN" => Some(Self::KwJoin),
            "LAST" => Some(Self::KwLast),
            "LEFT" => Some(Self::KwLeft),
            "LIKE" => Some(Self::KwLike),
            "LIMIT" => Some(Self::KwLimit),
            "LOCAL" => Some(Self::KwLocal),
            "NOT" => Some(Self::KwNot),
            "NULL" => Some(Self::KwNull),
            "NULLS" => Some(Self::KwNulls),
            "OFFSET" => Some(Self::KwOffset),
            "ON" => Some(Self::KwOn),
            "OPTION" => Some(Self::KwOption),
            "OR" => Some(Self::KwOr),
            "ORDER" => Some(Self::KwOrder),
            "OUTER" => Some(Self::KwOuter),
            "RECURSIVE" => Some(Self::KwRecursive),
            "RIGHT" => Some(Self::KwRight),
            "SELECT" => Some(Self::KwSelect),
            "SET" => Some(Self::KwSet),
            "TABLE" => Some(Self::KwTable),
            "THEN" => Some(Self::KwThen),
            "TRUE" => Some(Self::KwTrue),
            "UNION" => Some(Self::KwUnion),
            "UPDATE" => Some(Self::KwUpdate),
            "USING" => Some(Self::KwUsing),
            "VALUES" => Some(Self::KwValues),
            "VIEW" => Some(Self::KwView),
            "WHEN" => Some(Self::KwWhen),
            "WHERE" => Some(Self::KwWhere),
            "WITH" => Some(Self::KwWith),
            _ => None,
        }
    }

    /// Whether this kind is end-of-input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}
