//! Crate-level error types.

use std::fmt;

/// Errors raised while building or rebuilding the blit pipeline.
///
/// These are configuration faults: a view that reports one is not usable
/// until it is reconfigured with something the backend supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The requested pixel format cannot be presented by the surface.
    UnsupportedFormat(String),
    /// Shader or pipeline creation was rejected by the graphics backend.
    Validation(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(format) => {
                write!(f, "pixel format not supported by surface: {format}")
            }
            Self::Validation(msg) => {
                write!(f, "pipeline creation failed: {msg}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Errors produced by the texview crate.
#[derive(Debug)]
pub enum TexviewError {
    /// Render pipeline construction failure.
    Pipeline(PipelineError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for TexviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline(e) => write!(f, "pipeline error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for TexviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pipeline(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<PipelineError> for TexviewError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<std::io::Error> for TexviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
