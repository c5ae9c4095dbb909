//! Render targets turn a stream of polar drawing commands into output.
//!
//! Targets are chained as decorators: a [`NormalizingTarget`] buffers everything it is
//! given and rescales it on [`RenderTarget::close`] before replaying it into, for
//! instance, an [`SvgTarget`].

mod buffer;
mod error;
mod normalize;
mod recording;
mod svg;
mod vertex;

pub use buffer::BufferedTarget;
pub use error::RenderError;
pub use normalize::{normalization_factor, normalize, NormalizingTarget};
pub use recording::RecordingTarget;
pub use svg::{SvgOptions, SvgTarget};
pub use vertex::VertexTarget;

/// A single drawing instruction in polar coordinates. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    Vertex { r: f64, theta: f64 },
    Arc { r: f64, theta: f64, sweep: f64 },
}

impl RenderCommand {
    pub fn radius(&self) -> f64 {
        match *self {
            RenderCommand::Vertex { r, .. } | RenderCommand::Arc { r, .. } => r,
        }
    }

    pub fn with_radius(self, r: f64) -> Self {
        match self {
            RenderCommand::Vertex { theta, .. } => RenderCommand::Vertex { r, theta },
            RenderCommand::Arc { theta, sweep, .. } => RenderCommand::Arc { r, theta, sweep },
        }
    }
}

/// A sink for drawing commands.
///
/// `close` finalizes the output and must be called exactly once after the last command;
/// targets that hold back commands only write them out then.
pub trait RenderTarget {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError>;
    fn close(&mut self) -> Result<(), RenderError>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        (**self).accept(command)
    }

    fn close(&mut self) -> Result<(), RenderError> {
        (**self).close()
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        (**self).accept(command)
    }

    fn close(&mut self) -> Result<(), RenderError> {
        (**self).close()
    }
}
