use std::f64::consts::{PI, TAU};
use std::io::Write;

use super::{RenderCommand, RenderError, RenderTarget};

const GUIDE_TICKS: usize = 128;
const GUIDE_COLOR: &str = "#e0e0e0";
const CARDINAL_COLOR: &str = "#a0a0a0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgOptions {
    /// Width and height of the canvas in pixels.
    pub size: u32,
    /// Whether to draw the unit circle with tick marks underneath the plot.
    pub guide: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            size: 800,
            guide: false,
        }
    }
}

/// Draws normalized commands into an HTML page holding a single SVG canvas.
///
/// Consecutive vertices are joined into one polyline. Arcs become separate paths and
/// break the current polyline.
#[derive(Debug)]
pub struct SvgTarget<W: Write> {
    writer: W,
    options: SvgOptions,
    polyline: Vec<(f64, f64)>,
    started: bool,
    closed: bool,
}

impl<W: Write> SvgTarget<W> {
    pub fn new(writer: W, options: SvgOptions) -> Self {
        Self {
            writer,
            options,
            polyline: Vec::new(),
            started: false,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn scale(&self) -> f64 {
        f64::from(self.options.size) / 2.0
    }

    /// Screen coordinates of a polar point. The y axis points down on screen.
    fn to_cartesian(&self, r: f64, theta: f64) -> (f64, f64) {
        let scale = self.scale();
        (
            r * scale * theta.cos() + scale,
            -r * scale * theta.sin() + scale,
        )
    }

    fn start(&mut self) -> Result<(), RenderError> {
        if !self.started {
            self.started = true;
            writeln!(
                self.writer,
                "<html><body><svg height=\"{size}\" width=\"{size}\">",
                size = self.options.size
            )?;
        }
        Ok(())
    }

    fn flush_polyline(&mut self) -> Result<(), RenderError> {
        if self.polyline.is_empty() {
            return Ok(());
        }
        let points = self
            .polyline
            .drain(..)
            .map(|(x, y)| format!("{x:.5},{y:.5}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            self.writer,
            "<polyline points=\"{points}\" fill=\"none\" stroke=\"black\" />"
        )?;
        Ok(())
    }

    fn write_arc(&mut self, r: f64, theta: f64, sweep: f64) -> Result<(), RenderError> {
        let (x0, y0) = self.to_cartesian(r, theta);
        let (x1, y1) = self.to_cartesian(r, theta + sweep);
        let radius = r.abs() * self.scale();
        let large_arc = u8::from(sweep.abs() > PI);
        let sweep_flag = u8::from(sweep < 0.0);
        writeln!(
            self.writer,
            "<path d=\"M {x0:.5} {y0:.5} A {radius:.5} {radius:.5} 0 {large_arc} {sweep_flag} {x1:.5} {y1:.5}\" fill=\"none\" stroke=\"black\" />"
        )?;
        Ok(())
    }

    fn write_guide(&mut self) -> Result<(), RenderError> {
        let scale = self.scale();
        writeln!(
            self.writer,
            "<circle cx=\"{scale:.5}\" cy=\"{scale:.5}\" r=\"{scale:.5}\" fill=\"none\" stroke=\"{GUIDE_COLOR}\" />"
        )?;
        for tick in 0..GUIDE_TICKS {
            let theta = TAU * tick as f64 / GUIDE_TICKS as f64;
            let cardinal = tick % (GUIDE_TICKS / 4) == 0;
            let (inner, color) = if cardinal {
                (0.9, CARDINAL_COLOR)
            } else {
                (0.97, GUIDE_COLOR)
            };
            let (x1, y1) = self.to_cartesian(inner, theta);
            let (x2, y2) = self.to_cartesian(1.0, theta);
            writeln!(
                self.writer,
                "<line x1=\"{x1:.5}\" y1=\"{y1:.5}\" x2=\"{x2:.5}\" y2=\"{y2:.5}\" stroke=\"{color}\" />"
            )?;
        }
        Ok(())
    }
}

fn check_normalized(r: f64) -> Result<(), RenderError> {
    if r.is_nan() || r.abs() > 1.0 {
        Err(RenderError::UnnormalizedInput { radius: r })
    } else {
        Ok(())
    }
}

impl<W: Write> RenderTarget for SvgTarget<W> {
    fn accept(&mut self, command: RenderCommand) -> Result<(), RenderError> {
        check_normalized(command.radius())?;
        self.start()?;
        match command {
            RenderCommand::Vertex { r, theta } => {
                let point = self.to_cartesian(r, theta);
                self.polyline.push(point);
                Ok(())
            }
            RenderCommand::Arc { r, theta, sweep } => {
                self.flush_polyline()?;
                self.write_arc(r, theta, sweep)
            }
        }
    }

    fn close(&mut self) -> Result<(), RenderError> {
        if !self.closed {
            self.closed = true;
            self.start()?;
            self.flush_polyline()?;
            if self.options.guide {
                self.write_guide()?;
            }
            writeln!(self.writer, "</svg></body></html>")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
