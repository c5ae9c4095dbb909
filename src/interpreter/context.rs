use super::environment::Environment;
use super::error::RuntimeErrorKind;
use super::range::Range;
use super::registry;
use crate::render::{RenderCommand, RenderError, RenderTarget};

/// Everything statements can observe while they run: variables, loop ranges and the
/// side effects of built-in functions.
pub trait Context {
    fn environment(&self) -> &Environment;
    fn environment_mut(&mut self) -> &mut Environment;
    fn emit(&mut self, command: RenderCommand) -> Result<(), RenderError>;
    fn range(&self, start: f64, end: f64, step: Option<f64>, inclusive: bool) -> Range;

    fn value_of(&self, name: &str) -> Result<f64, RuntimeErrorKind> {
        self.environment().value_of(name)
    }

    fn assign(&mut self, name: &str, value: f64) {
        self.environment_mut().assign(name, value)
    }

    fn dispatch(&mut self, name: &str, arguments: &[f64]) -> Result<f64, RuntimeErrorKind> {
        registry::dispatch(self, name, arguments)
    }
}

/// Runs a program for real, forwarding every drawing command to a render target.
pub struct RenderContext<T: RenderTarget> {
    environment: Environment,
    target: T,
}

impl<T: RenderTarget> RenderContext<T> {
    pub fn new(target: T) -> Self {
        Self {
            environment: Environment::new(),
            target,
        }
    }

    pub fn into_target(self) -> T {
        self.target
    }
}

impl<T: RenderTarget> Context for RenderContext<T> {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    fn emit(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        tracing::trace!(?command, "emit");
        self.target.accept(command)
    }

    fn range(&self, start: f64, end: f64, step: Option<f64>, inclusive: bool) -> Range {
        Range::new(start, end, step, inclusive)
    }
}

/// A dry run: drawing succeeds without output and every loop runs its body once with
/// the loop variable at its start value.
#[derive(Debug, Default)]
pub struct ValidationContext {
    environment: Environment,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Context for ValidationContext {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    fn emit(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        let _ = command;
        Ok(())
    }

    fn range(&self, start: f64, end: f64, step: Option<f64>, inclusive: bool) -> Range {
        let _ = (end, step, inclusive);
        Range::single(start)
    }
}
