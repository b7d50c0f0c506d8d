//! Error types
//!
//! Library-level errors for AppForge. CLI and TUI seams wrap these in
//! `anyhow::Error` with context.

use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, grouped by area (1xx validation, 2xx config, 3xx io/terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidUrl,
    UnknownField,
    InvalidFieldValue,
    Config,
    Preset,
    Io,
    Terminal,
}

impl ErrorCode {
    /// Short code shown in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "E101",
            Self::UnknownField => "E102",
            Self::InvalidFieldValue => "E103",
            Self::Config => "E201",
            Self::Preset => "E202",
            Self::Io => "E301",
            Self::Terminal => "E302",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum AppForgeError {
    #[error("{message}")]
    InvalidUrl { input: String, message: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value {value:?} for field {field}: {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("preset {path:?}: {reason}")]
    Preset { path: PathBuf, reason: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl AppForgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl { .. } => ErrorCode::InvalidUrl,
            Self::UnknownField(_) => ErrorCode::UnknownField,
            Self::InvalidFieldValue { .. } => ErrorCode::InvalidFieldValue,
            Self::Config(_) => ErrorCode::Config,
            Self::Preset { .. } => ErrorCode::Preset,
            Self::Io { .. } => ErrorCode::Io,
            Self::Terminal(_) => ErrorCode::Terminal,
        }
    }

    /// Wrap an io error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppForgeError::UnknownField("colour".to_string());
        assert_eq!(err.code(), ErrorCode::UnknownField);
        assert_eq!(err.code().as_str(), "E102");
        assert_eq!(err.to_string(), "unknown field: colour");
    }

    #[test]
    fn test_invalid_url_displays_message_only() {
        let err = AppForgeError::InvalidUrl {
            input: "nope".to_string(),
            message: "Please enter a valid URL".to_string(),
        };
        assert_eq!(err.to_string(), "Please enter a valid URL");
        assert_eq!(err.code().to_string(), "E101");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = AppForgeError::io(
            "/tmp/missing.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), ErrorCode::Io);
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }
}
