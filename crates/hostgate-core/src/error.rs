// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for Hostgate operations
///
/// The label filter itself never fails. These errors only surface while
/// loading host state snapshots and request contexts from disk.
#[derive(Error, Debug, Diagnostic)]
pub enum HostgateError {
    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(hostgate::serialization_error),
        help("Ensure the document is valid JSON or YAML and matches the expected layout")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File could not be read
    #[error("Failed to read {path}")]
    #[diagnostic(
        code(hostgate::io_error),
        help("Check that the file exists and is readable")
    )]
    IoError {
        #[allow(unused)]
        path: String,
        #[source]
        #[allow(unused)]
        source: std::io::Error,
    },

    /// Unsupported file format
    #[error("Unsupported file format: {path}")]
    #[diagnostic(
        code(hostgate::unsupported_format),
        help("Use a file ending in .json, .yaml or .yml")
    )]
    UnsupportedFormat {
        #[allow(unused)]
        path: String,
    },

    /// Invalid command-line argument
    #[error("Invalid argument: {reason}")]
    #[diagnostic(
        code(hostgate::invalid_argument),
        help("{suggestion}")
    )]
    InvalidArgument {
        #[allow(unused)]
        reason: String,
        #[allow(unused)]
        suggestion: String,
    },
}

/// Result type alias for Hostgate operations
pub type Result<T> = std::result::Result<T, HostgateError>;

impl HostgateError {
    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }

    /// Create an IoError
    pub fn io_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an UnsupportedFormat error
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }
}
