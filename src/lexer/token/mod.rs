mod span;

pub use span::{SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("for", TokenKind::KeywordFor);
    map.insert("over", TokenKind::KeywordOver);
    map.insert("by", TokenKind::KeywordBy);
    map
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn new(start: SpanIndex, length: SpanLength) -> Self {
        Self { start, length }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.into()..(self.start + self.length).into()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }

    pub fn merge(&self, other: &Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        let length = end - start;
        Span { start, length }
    }
}

/// A location in the source text. Lines and columns are 1-based and columns count
/// characters rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub span: Span,
}

impl Position {
    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Brackets
    LeftBracket,
    RightBracket,
    // Braces
    LeftBrace,
    RightBrace,
    // Miscellaneous
    Comma,
    Equal,
    // Operators
    Minus,
    Plus,
    Star,
    Slash,

    // Literals
    NumericLiteral,
    Ident,

    // Keywords
    KeywordFor,
    KeywordOver,
    KeywordBy,

    // End of file.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LEFT_PAREN"),
            TokenKind::RightParenthesis => write!(f, "RIGHT_PAREN"),
            TokenKind::LeftBracket => write!(f, "LEFT_BRACKET"),
            TokenKind::RightBracket => write!(f, "RIGHT_BRACKET"),
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Equal => write!(f, "EQUAL"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Star => write!(f, "STAR"),
            TokenKind::Slash => write!(f, "SLASH"),
            TokenKind::NumericLiteral => write!(f, "NUMBER"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordFor => write!(f, "FOR"),
            TokenKind::KeywordOver => write!(f, "OVER"),
            TokenKind::KeywordBy => write!(f, "BY"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn span(&self) -> Span {
        self.position.span
    }
}
