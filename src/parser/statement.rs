use compact_str::CompactString;

use super::expression::Expression;
use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(AssignmentStatement),
    Call(CallStatement),
    Loop(LoopStatement),
    Error(ErrorStatement),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Assignment(stmt) => stmt.position,
            Statement::Call(stmt) => stmt.position,
            Statement::Loop(stmt) => stmt.position,
            Statement::Error(stmt) => stmt.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    pub name: CompactString,
    pub value: Expression,
    pub position: Position,
}

/// A function call whose result is discarded. The root of `call` is always a call node.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStatement {
    pub call: Expression,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatement {
    pub variable: CompactString,
    pub start: Expression,
    pub end: Expression,
    pub step: Option<Expression>,
    pub inclusive: bool,
    pub body: Vec<Statement>,
    pub position: Position,
}

/// A construct that parsed but can never run, such as assigning to `pi`. It fails with
/// `message` whenever it is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorStatement {
    pub message: CompactString,
    pub position: Position,
}
