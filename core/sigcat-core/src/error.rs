//! Error types for sigcat-core operations.
//!
//! Only hard failures travel through [`CatalogError`]. Rejected catalog
//! operations (duplicate key, removing a system entry) are plain `bool`
//! results, and malformed stored entries are skipped where they are loaded.

use std::path::PathBuf;

/// All errors that can occur in sigcat-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    // ─────────────────────────────────────────────────────────────────────
    // Startup Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Subsystem initialization failed: {subsystem}: {details}")]
    SubsystemInit {
        subsystem: &'static str,
        details: String,
    },

    #[error("Registry instance unavailable: {0}")]
    InstanceUnavailable(String),

    #[error("Registry instance already installed")]
    InstanceAlreadyInstalled,

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Context is read-only: {0}")]
    ContextReadOnly(String),

    #[error("Context could not be read, refusing to overwrite: {0}")]
    ContextUnreadable(String),

    #[error("Slot {index} out of range for context {context} (length {len})")]
    SlotOutOfRange {
        context: String,
        index: usize,
        len: usize,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("TLE directory unavailable")]
    TleDirUnavailable,

    #[error("TLE parse failed: {0}")]
    TleParse(String),

    #[error("Source backend error: {0}")]
    Backend(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CatalogError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        CatalogError::Json {
            context: context.into(),
            source,
        }
    }
}

impl From<CatalogError> for String {
    fn from(err: CatalogError) -> String {
        err.to_string()
    }
}
