use crate::lexer::{LexicalError, Position, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected an expression but got token {0}.")]
    NonExpression(TokenKind),
    #[error("Expected a non-EOF token.")]
    UnexpectedEof,
    #[error("Expected a statement but got {0}.")]
    InvalidStatement(TokenKind),
    #[error("`{0}` is not a valid variable name.")]
    InvalidVariable(CompactString),
    #[error("`{0}` is not a valid function name.")]
    InvalidFunctionName(CompactString),
    #[error("Expected `)` or `]` to close the range but got token {0}.")]
    InvalidRangeEnd(TokenKind),
    #[error("A loop body needs at least one statement.")]
    EmptyBlock,
    #[error("A program needs at least one statement.")]
    EmptyProgram,
    #[error(transparent)]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[{position}] {kind}")]
pub struct ParserError {
    pub kind: ParserErrorKind,
    pub position: Position,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonExpression(_) => "PA002",
            ParserErrorKind::UnexpectedEof => "PA003",
            ParserErrorKind::InvalidStatement(_) => "PA004",
            ParserErrorKind::InvalidVariable(_) => "PA005",
            ParserErrorKind::InvalidFunctionName(_) => "PA006",
            ParserErrorKind::InvalidRangeEnd(_) => "PA007",
            ParserErrorKind::EmptyBlock => "PA008",
            ParserErrorKind::EmptyProgram => "PA009",
            ParserErrorKind::LexicalError(ref e) => e.code(),
        }
    }
}

impl From<LexicalError> for ParserError {
    fn from(value: LexicalError) -> Self {
        Self {
            position: value.position,
            kind: ParserErrorKind::LexicalError(value),
        }
    }
}
