use compact_str::CompactString;
use thiserror::Error;

use crate::lexer::Position;
use crate::render::RenderError;

/// The kind of statement that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Assignment,
    Call,
    Loop,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Assignment => write!(f, "assignment"),
            Phase::Call => write!(f, "call"),
            Phase::Loop => write!(f, "loop"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoopRangeError {
    #[error("Step can't be 0 when the range runs from {start} to {end}")]
    ZeroStep { start: f64, end: f64 },
    #[error("Step {step} is positive but the range descends from {start} to {end}")]
    AscendingStepOnDescendingRange { start: f64, end: f64, step: f64 },
    #[error("Step {step} is negative but the range ascends from {start} to {end}")]
    DescendingStepOnAscendingRange { start: f64, end: f64, step: f64 },
}

#[derive(Debug, Error)]
pub enum RuntimeErrorKind {
    #[error("Undefined variable `{0}`")]
    UndefinedVariable(CompactString),
    #[error("No such function `{0}`")]
    NoSuchFunction(CompactString),
    #[error("`{name}` takes {expected} argument(s) but was given {actual}")]
    WrongArity {
        name: CompactString,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid loop range")]
    InvalidLoopRange(#[from] LoopRangeError),
    #[error("{0}")]
    IllegalAssignmentTarget(CompactString),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Statement(Box<RuntimeError>),
}

/// A failure while running a statement, tagged with the statement's phase and position.
#[derive(Debug, Error)]
#[error("{phase} error at {position}")]
pub struct RuntimeError {
    pub phase: Phase,
    pub position: Position,
    #[source]
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(phase: Phase, position: Position, kind: RuntimeErrorKind) -> Self {
        Self {
            phase,
            position,
            kind,
        }
    }

    /// The innermost statement that failed.
    pub fn innermost(&self) -> &RuntimeError {
        match self.kind {
            RuntimeErrorKind::Statement(ref inner) => inner.innermost(),
            _ => self,
        }
    }

    /// The underlying cause, below every statement wrapper.
    pub fn root_cause(&self) -> &RuntimeErrorKind {
        &self.innermost().kind
    }

    pub fn code(&self) -> &'static str {
        match self.root_cause() {
            RuntimeErrorKind::UndefinedVariable(_) => "RT001",
            RuntimeErrorKind::NoSuchFunction(_) => "RT002",
            RuntimeErrorKind::WrongArity { .. } => "RT003",
            RuntimeErrorKind::InvalidLoopRange(_) => "RT004",
            RuntimeErrorKind::IllegalAssignmentTarget(_) => "RT005",
            RuntimeErrorKind::Render(e) => e.code(),
            RuntimeErrorKind::Statement(_) => unreachable!("Root causes are never wrappers."),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Failed to finish rendering")]
    Close(#[source] RenderError),
}
