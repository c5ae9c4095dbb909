use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write output")]
    Io(#[from] std::io::Error),
    #[error("Unnormalized input: radius {radius} lies outside [-1, 1]")]
    UnnormalizedInput { radius: f64 },
}

impl RenderError {
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::Io(_) => "RD001",
            RenderError::UnnormalizedInput { .. } => "RD002",
        }
    }
}
