pub mod context;
pub mod environment;
pub mod error;
pub mod formatter;
pub mod range;
pub mod registry;
mod tree;

use crate::parser::Program;
use crate::render::RenderTarget;
use context::{RenderContext, ValidationContext};
use error::{ExecutionError, RuntimeError};
pub use tree::TreeWalkInterpreter;

/// Dry-runs `program` to surface the first semantic error before anything is drawn.
///
/// Drawing calls do nothing and every loop body runs exactly once, so the cost does not
/// depend on loop sizes. The program is handed back untouched on success.
pub fn validate(program: Program) -> Result<Program, RuntimeError> {
    tracing::debug!(statements = program.len(), "validating program");
    TreeWalkInterpreter::new(ValidationContext::new()).run(&program)?;
    Ok(program)
}

/// Runs `program` against a fresh environment that draws into `target`, then closes the
/// target and hands it back.
///
/// The target is only closed when every statement succeeds. On failure it is dropped
/// along with anything it was still holding back.
pub fn execute<T: RenderTarget>(program: &Program, target: T) -> Result<T, ExecutionError> {
    tracing::debug!(statements = program.len(), "executing program");
    let context = TreeWalkInterpreter::new(RenderContext::new(target)).run(program)?;
    let mut target = context.into_target();
    target.close().map_err(ExecutionError::Close)?;
    tracing::debug!("execution finished");
    Ok(target)
}
