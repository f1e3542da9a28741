//! Error types for otacheck
//!
//! The detection core (executor, property reader, identity cache, comparator,
//! hashing) never fails: every fault degrades to an absent value. `OtaError`
//! covers the layers around it: configuration, candidate input, downloads.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for otacheck operations
pub type OtaResult<T> = Result<T, OtaError>;

/// Errors surfaced by the non-core layers
#[derive(Error, Debug)]
pub enum OtaError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Candidate metadata errors
    #[error("Invalid update metadata: {0}")]
    MetadataInvalid(String),

    #[error("Update metadata has no download URL")]
    MissingUrl,

    // Download errors
    #[error("No download directory available")]
    NoDownloadDir,

    #[error("Download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OtaError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigExists(_) => Some("Pass --force to overwrite"),
            Self::NoDownloadDir => Some("Set [download] directory in the config file"),
            Self::MissingUrl => Some("Add a \"url\" key to the metadata"),
            Self::ChecksumMismatch { .. } => Some("Delete the file and download it again"),
            _ => None,
        }
    }
}
