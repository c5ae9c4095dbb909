use super::token::Position;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unrecognized character {0:?}")]
    Unrecognized(char),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub position: Position,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            LexicalErrorKind::Unrecognized(_) => "LX001",
        }
    }
}
