//! Error types shared across tremor analyzer crates.

use std::path::PathBuf;

/// Top-level error type for tremor analysis operations.
///
/// "No hand found" and "not enough points to score" are not errors; they
/// resolve to empty trajectories and zero scores. Only contract violations
/// by the caller end up here.
#[derive(Debug, thiserror::Error)]
pub enum TremorError {
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TremorError.
pub type TremorResult<T> = Result<T, TremorError>;

impl TremorError {
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TremorError::invalid_frame("width is zero");
        assert_eq!(err.to_string(), "Invalid frame: width is zero");

        let err = TremorError::session("No recorded frames to analyze");
        assert_eq!(
            err.to_string(),
            "Session error: No recorded frames to analyze"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> TremorResult<String> {
            Ok(std::fs::read_to_string("/nonexistent/tremor/file")?)
        }
        assert!(matches!(fails(), Err(TremorError::Io(_))));
    }
}
