//! Token types shared by every lexer in this crate.
//!
//! The template lexer produces [`TokenKind::Literal`], [`TokenKind::Tag`],
//! [`TokenKind::Statement`] and [`TokenKind::Expression`] tokens. Expression
//! payloads are re-tokenized later by one of the expression sub-lexers, which
//! produce the remaining kinds.

use smol_str::SmolStr;
use std::fmt;

/// A token produced by one of the lexers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// 1-indexed line number the token starts on.
    pub line: usize,
    /// The kind of token.
    pub kind: TokenKind,
    /// The token text, after quote or bracket stripping where applicable.
    pub value: SmolStr,
}

impl Token {
    /// Creates a new token.
    pub fn new(line: usize, kind: TokenKind, value: impl Into<SmolStr>) -> Self {
        Self {
            line,
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?}", self.line, self.kind, self.value.as_str())
    }
}

/// Token kinds for Liquid templates and expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TokenKind {
    // === Template Tokens ===
    /// Raw template text, emitted verbatim.
    Literal,
    /// The name of a tag, e.g. `if` in `{% if x %}`.
    Tag,
    /// The contents of an output statement, e.g. `x` in `{{ x }}`.
    Statement,
    /// The unscanned expression following a tag name.
    Expression,

    // === Literals ===
    /// An identifier or path segment.
    Identifier,
    /// A quoted string, value holds the unquoted text.
    String,
    /// An integer literal.
    Integer,
    /// A float literal.
    Float,
    /// A bracketed integer index, value holds the index without brackets.
    IdentIndex,

    // === Punctuation ===
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `|`
    Pipe,
    /// `..`
    Range,
    /// `=`
    Assign,
    /// `-`
    Negative,

    // === Comparison Operators ===
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<>`
    Lg,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,

    // === Keywords ===
    /// `and`
    And,
    /// `or`
    Or,
    /// `contains`
    Contains,
    /// `true`
    True,
    /// `false`
    False,
    /// `nil`
    Nil,
    /// `empty`
    Empty,
    /// `in`
    In,
    /// `offset`
    Offset,
    /// `limit`
    Limit,
    /// `reversed`
    Reversed,
    /// `cols`
    Cols,
    /// `continue`
    Continue,
    /// `with`
    With,
    /// `for`
    For,
    /// `as`
    As,
    /// `by`
    By,
}

impl TokenKind {
    /// Returns the source spelling of a keyword kind, or `None` for other kinds.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            TokenKind::And
            | TokenKind::Or
            | TokenKind::Contains
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil
            | TokenKind::Empty
            | TokenKind::In
            | TokenKind::Offset
            | TokenKind::Limit
            | TokenKind::Reversed
            | TokenKind::Cols
            | TokenKind::Continue
            | TokenKind::With
            | TokenKind::For
            | TokenKind::As
            | TokenKind::By => Some(self.name()),
            _ => None,
        }
    }

    /// Maps the text of a comparison operator to its kind.
    pub fn operator(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "==" => TokenKind::Eq,
            "!=" => TokenKind::Ne,
            "<>" => TokenKind::Lg,
            "<" => TokenKind::Lt,
            ">" => TokenKind::Gt,
            "<=" => TokenKind::Le,
            ">=" => TokenKind::Ge,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Literal => "literal",
            TokenKind::Tag => "tag",
            TokenKind::Statement => "statement",
            TokenKind::Expression => "expression",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::IdentIndex => "identindex",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Colon => ":",
            TokenKind::Pipe => "|",
            TokenKind::Range => "..",
            TokenKind::Assign => "=",
            TokenKind::Negative => "-",
            TokenKind::Eq => "==",
            TokenKind::Ne => "!=",
            TokenKind::Lg => "<>",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Contains => "contains",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
            TokenKind::Empty => "empty",
            TokenKind::In => "in",
            TokenKind::Offset => "offset",
            TokenKind::Limit => "limit",
            TokenKind::Reversed => "reversed",
            TokenKind::Cols => "cols",
            TokenKind::Continue => "continue",
            TokenKind::With => "with",
            TokenKind::For => "for",
            TokenKind::As => "as",
            TokenKind::By => "by",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
