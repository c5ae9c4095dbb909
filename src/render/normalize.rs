use super::{BufferedTarget, RenderCommand, RenderError, RenderTarget};

/// The largest absolute finite radius among `commands`, or 1 when there is nothing to
/// scale by. Infinite and NaN radii do not take part.
pub fn normalization_factor(commands: &[RenderCommand]) -> f64 {
    let max = commands
        .iter()
        .map(|command| command.radius().abs())
        .filter(|r| r.is_finite())
        .fold(0.0, f64::max);
    if max == 0.0 {
        1.0
    } else {
        max
    }
}

/// Rescales every radius in place so the largest absolute radius becomes 1.
///
/// Infinite radii land on the unit circle with their sign kept. NaN radii are left as
/// they are.
pub fn normalize(commands: &mut [RenderCommand]) {
    let factor = normalization_factor(commands);
    tracing::debug!(factor, "normalizing radii");
    for command in commands.iter_mut() {
        let r = command.radius();
        let r = if r.is_infinite() {
            r.signum()
        } else {
            (r / factor).clamp(-1.0, 1.0)
        };
        *command = command.with_radius(r);
    }
}

/// Buffers all commands and rescales their radii into `[-1, 1]` when closed.
#[derive(Debug)]
pub struct NormalizingTarget<T: RenderTarget> {
    buffer: BufferedTarget<T>,
}

impl<T: RenderTarget> NormalizingTarget<T> {
    pub fn new(inner: T) -> Self {
        Self {
            buffer: BufferedTarget::new(inner),
        }
    }

    pub fn commands(&self) -> &[RenderCommand] {
        self.buffer.commands()
    }

    pub fn into_inner(self) -> T {
        self.buffer.into_inner()
    }
}

impl<T: RenderTarget> RenderTarget for NormalizingTarget<T> {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        self.buffer.accept(command)
    }

    fn close(&mut self) -> Result<(), RenderError> {
        normalize(self.buffer.commands_mut());
        self.buffer.close()
    }
}
