use super::{RenderCommand, RenderError, RenderTarget};

/// Holds back every command until `close`, then replays them into the wrapped target in
/// the order they arrived.
#[derive(Debug)]
pub struct BufferedTarget<T: RenderTarget> {
    inner: T,
    commands: Vec<RenderCommand>,
}

impl<T: RenderTarget> BufferedTarget<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub(super) fn commands_mut(&mut self) -> &mut [RenderCommand] {
        &mut self.commands
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: RenderTarget> RenderTarget for BufferedTarget<T> {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        self.commands.push(command);
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        let commands = std::mem::take(&mut self.commands);
        tracing::debug!(commands = commands.len(), "replaying buffered commands");
        for command in commands {
            self.inner.accept(command)?;
        }
        self.inner.close()
    }
}
