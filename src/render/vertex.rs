use std::io::Write;

use super::{RenderCommand, RenderError, RenderTarget};

/// Writes every vertex as a `theta r` line with five decimal places.
///
/// Arcs have no representation in this format and are approximated by the straight line
/// between their two end points.
#[derive(Debug)]
pub struct VertexTarget<W: Write> {
    writer: W,
}

impl<W: Write> VertexTarget<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_vertex(&mut self, r: f64, theta: f64) -> Result<(), RenderError> {
        writeln!(self.writer, "{theta:.5} {r:.5}")?;
        Ok(())
    }
}

impl<W: Write> RenderTarget for VertexTarget<W> {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        match command {
            RenderCommand::Vertex { r, theta } => self.write_vertex(r, theta),
            RenderCommand::Arc { r, theta, sweep } => {
                self.write_vertex(r, theta)?;
                self.write_vertex(r, theta + sweep)
            }
        }
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.writer.flush()?;
        Ok(())
    }
}
