pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod render;

pub use interpreter::error::{ExecutionError, RuntimeError};
pub use interpreter::{execute, validate};
pub use parser::{parse, ParserError, Program};
