//! Error types for rowlift
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for rowlift
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Read error: {message}")]
    Read { message: String },

    // ============================================================================
    // Record Validation Errors
    // ============================================================================
    /// A data line failed mandatory-field or type rules. Always carries the
    /// 1-based physical line number of the offending line.
    #[error("Line {line}: {message}")]
    Validation { line: u64, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Field '{field}' is not an integer: {value}")]
    InvalidInteger { field: String, value: String },

    // ============================================================================
    // Persistence Errors
    // ============================================================================
    #[error("Persistence error: {0}")]
    Database(#[from] duckdb::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing config field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a source-not-found error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a read error
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Create a validation error annotated with a 1-based line number
    pub fn validation(line: u64, message: impl Into<String>) -> Self {
        Self::Validation {
            line,
            message: message.into(),
        }
    }

    /// Create a missing record field error
    pub fn missing_record_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Annotate this error with the line it occurred on. Validation-class
    /// errors gain the line prefix; everything else passes through unchanged.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            Self::MissingField { .. } | Self::InvalidInteger { .. } => Self::Validation {
                line,
                message: self.to_string(),
            },
            other => other,
        }
    }

    /// Whether this error aborts a run with a line-annotated validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::MissingField { .. } | Self::InvalidInteger { .. }
        )
    }
}

/// Result type alias for rowlift
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("source");
        assert_eq!(err.to_string(), "Missing required config field: source");

        let err = Error::validation(3, "Missing required field: age");
        assert_eq!(err.to_string(), "Line 3: Missing required field: age");

        let err = Error::source_not_found("/tmp/people.csv");
        assert_eq!(err.to_string(), "Source file not found: /tmp/people.csv");
    }

    #[test]
    fn test_at_line_wraps_record_errors() {
        let err = Error::missing_record_field("name.firstName").at_line(7);
        assert_eq!(
            err.to_string(),
            "Line 7: Missing required field: name.firstName"
        );

        let err = Error::InvalidInteger {
            field: "age".to_string(),
            value: "notanumber".to_string(),
        }
        .at_line(2);
        assert_eq!(
            err.to_string(),
            "Line 2: Field 'age' is not an integer: notanumber"
        );
    }

    #[test]
    fn test_at_line_leaves_other_errors_alone() {
        let err = Error::read("stream reset").at_line(9);
        assert_eq!(err.to_string(), "Read error: stream reset");
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::validation(1, "bad").is_validation());
        assert!(Error::missing_record_field("age").is_validation());
        assert!(!Error::config("bad").is_validation());
        assert!(!Error::read("bad").is_validation());
    }
}
