//! Hostgate Core - Host, label pool and request context types
//!
//! This crate provides:
//! - Host and label pool data model
//! - Placement request context
//! - Read-only host state query trait and in-memory snapshot
//! - Error types with miette diagnostics
//! - JSON/YAML loading helpers

pub mod error;
pub mod state;
pub mod types;

use std::path::Path;

// Re-export commonly used types
pub use error::{HostgateError, Result};
pub use state::{HostStateQuery, HostStateSnapshot};
pub use types::{Context, ContextEntry, Host, LabelPool, ResourceRequest, HOST_LABELS_POOL};

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        HostgateError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to YAML
pub fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        HostgateError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from JSON
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| {
        HostgateError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from YAML
pub fn from_yaml<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_yaml::from_str(data).map_err(|e| {
        HostgateError::serialization_error(
            format!("Failed to deserialize from YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Load a JSON or YAML document, picking the format from the file extension
pub fn load_file<T: for<'de> serde::Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let data = match extension.as_deref() {
        Some("json") | Some("yaml") | Some("yml") => std::fs::read_to_string(path)
            .map_err(|e| HostgateError::io_error(display.clone(), e))?,
        _ => return Err(HostgateError::unsupported_format(display)),
    };

    match extension.as_deref() {
        Some("json") => from_json(&data),
        _ => from_yaml(&data),
    }
}
