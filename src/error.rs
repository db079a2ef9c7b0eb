//! Error types
//!
//! Only rendering failures are fatal to a run. Configuration errors fall back
//! to defaults at the call site.

use thiserror::Error;

/// A drawing call on the surface failed
#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser canvas rejected a call (e.g. a non-finite arc radius)
    #[error("canvas call `{call}` failed: {message}")]
    Canvas { call: &'static str, message: String },
    /// The drawing surface is gone (context lost, canvas detached)
    #[error("drawing surface lost")]
    SurfaceLost,
}

impl RenderError {
    pub fn canvas(call: &'static str, message: impl Into<String>) -> Self {
        RenderError::Canvas {
            call,
            message: message.into(),
        }
    }
}

/// Settings could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
}
