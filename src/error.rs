//! Error types for cve-harvest
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Addressing misses and rate limiting never show up here: the extractor
//! reports a miss as `None` and the harvester absorbs 403 responses itself.

use thiserror::Error;

/// The main error type for cve-harvest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Malformed schema file '{path}' (line {line}): {message}")]
    MalformedSchemaFile {
        path: String,
        line: usize,
        message: String,
    },

    // ============================================================================
    // Harvest Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response body: {message}")]
    MalformedResponse { message: String },

    #[error("Harvest exhausted for window {window} after {attempts} failed attempts")]
    HarvestExhausted { window: String, attempts: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Harvest cancelled")]
    Cancelled,

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

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

/// Coarse grouping of fatal errors, used for the final user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The remote source could not be harvested
    Api,
    /// The output sink or an input file failed
    InputOutput,
    /// A schema file could not be used
    Schema,
    /// A command-line or configuration value was rejected
    Argument,
    /// The run was interrupted
    Cancelled,
    /// Anything else
    Unknown,
}

impl ErrorCategory {
    /// Short message reported before the process exits
    pub fn message(self) -> &'static str {
        match self {
            Self::Api => "There was an issue with the API call, exiting.",
            Self::InputOutput => "There was an issue with Input/Output, exiting.",
            Self::Schema => "There was an issue with the schema file, exiting.",
            Self::Argument => "There was an issue with the arguments, exiting.",
            Self::Cancelled => "Harvest cancelled, exiting.",
            Self::Unknown => "Unknown cause of error, exiting.",
        }
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a malformed schema file error
    pub fn malformed_schema(
        path: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedSchemaFile {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error counts against a window's retry budget
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::MalformedResponse { .. } | Error::JsonParse(_) => true,
            Error::HttpStatus { status, .. } => *status != 200,
            _ => false,
        }
    }

    /// Categorize this error for the final report
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::MalformedResponse { .. }
            | Error::HarvestExhausted { .. }
            | Error::InvalidUrl(_) => ErrorCategory::Api,
            Error::Output { .. } | Error::Io(_) => ErrorCategory::InputOutput,
            Error::MalformedSchemaFile { .. } => ErrorCategory::Schema,
            Error::Config { .. }
            | Error::InvalidArgument { .. }
            | Error::YamlParse(_)
            | Error::JsonParse(_) => ErrorCategory::Argument,
            Error::Cancelled => ErrorCategory::Cancelled,
            Error::Other(_) | Error::Anyhow(_) => ErrorCategory::Unknown,
        }
    }
}

/// Result type alias for cve-harvest
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::http_status(500, "boom");
        assert_eq!(err.to_string(), "HTTP 500: boom");

        let err = Error::malformed_schema("headers.txt", 3, "bad line");
        assert_eq!(
            err.to_string(),
            "Malformed schema file 'headers.txt' (line 3): bad line"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(404, "").is_retryable());
        assert!(Error::malformed_response("no totalResults").is_retryable());

        assert!(!Error::config("test").is_retryable());
        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::output("disk full").is_retryable());
    }

    #[test]
    fn test_category() {
        let exhausted = Error::HarvestExhausted {
            window: "2020-01".to_string(),
            attempts: 11,
        };
        assert_eq!(exhausted.category(), ErrorCategory::Api);
        assert_eq!(
            Error::Io(std::io::Error::other("x")).category(),
            ErrorCategory::InputOutput
        );
        assert_eq!(
            Error::malformed_schema("f", 1, "m").category(),
            ErrorCategory::Schema
        );
        assert_eq!(
            Error::invalid_argument("start_year", "too early").category(),
            ErrorCategory::Argument
        );
        assert_eq!(
            ErrorCategory::Api.message(),
            "There was an issue with the API call, exiting."
        );
    }
}
