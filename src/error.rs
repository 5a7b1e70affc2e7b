//! Error handling for lrcurve-rs
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the chart engine.

use crate::axis::ScaleError;
use thiserror::Error;

/// Main error type for chart operations
#[derive(Error, Debug)]
pub enum LrCurveError {
    /// Malformed settings, rejected before anything is mounted
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors surfaced by the rendering backend
    #[error("Render error: {0}")]
    Render(String),

    /// Errors related to building an axis scale
    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),

    /// Errors related to settings or row (de)serialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LrCurveError>,
    },
}

impl LrCurveError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        LrCurveError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is a configuration error
    pub fn is_config(&self) -> bool {
        match self {
            LrCurveError::Config(_) => true,
            LrCurveError::WithContext { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

/// Result type alias for chart operations
pub type Result<T> = std::result::Result<T, LrCurveError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LrCurveError::Config("unknown facet 'acc'".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown facet 'acc'");
    }

    #[test]
    fn test_error_with_context() {
        let err = LrCurveError::Render("backend gone".to_string());
        let with_ctx = err.with_context("Failed to draw frame");
        assert!(with_ctx.to_string().contains("Failed to draw frame"));
        assert!(with_ctx.to_string().contains("backend gone"));
    }

    #[test]
    fn test_is_config_sees_through_context() {
        let err = LrCurveError::Config("bad".to_string()).with_context("loading settings");
        assert!(err.is_config());
        assert!(!LrCurveError::Render("x".to_string()).is_config());
    }

    #[test]
    fn test_scale_error_conversion() {
        let err: LrCurveError = ScaleError::NonPositiveDomain {
            lower: 0.0,
            upper: 1.0,
        }
        .into();
        assert!(err.to_string().contains("Scale error"));
    }
}
