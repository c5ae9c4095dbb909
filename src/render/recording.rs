use super::{RenderCommand, RenderError, RenderTarget};

/// Keeps every command in memory. Useful when the caller wants the raw drawing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingTarget {
    commands: Vec<RenderCommand>,
    closed: usize,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// How many times `close` has been called.
    pub fn times_closed(&self) -> usize {
        self.closed
    }

    pub fn into_commands(self) -> Vec<RenderCommand> {
        self.commands
    }
}

impl RenderTarget for RecordingTarget {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        self.commands.push(command);
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.closed += 1;
        Ok(())
    }
}
