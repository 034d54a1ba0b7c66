//! Error types for folio operations.
//!
//! This module defines the main error type [`FolioError`] which represents
//! everything that can go wrong while talking to Instapaper, assembling an
//! article document, staging it for the renderer, or writing notes.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{FolioError, Result};
//!
//! fn require_text(text: Option<&str>, id: u64) -> Result<&str> {
//!     text.ok_or(FolioError::MissingContent { id })
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations.
///
/// Only [`FolioError::Structural`] and [`FolioError::MissingContent`] are
/// scoped to a single bookmark; the export pipeline treats every other
/// variant as fatal for the whole run.
#[derive(Error, Debug)]
pub enum FolioError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Error reported by the Instapaper API.
    ///
    /// `code` is the API's `error_code` when the body carried one, or the
    /// HTTP status otherwise.
    #[error("Instapaper API error {code}: {message}")]
    Api { code: u32, message: String },

    /// No folder with the requested name exists.
    #[error("Folder ID for name \"{0}\" not found")]
    FolderNotFound(String),

    /// The parsed article lacks the `<html>` root with `<head>` then `<body>`.
    ///
    /// Returned instead of emitting a malformed document, e.g. for
    /// frameset pages.
    #[error("Document structure error: {0}")]
    Structural(String),

    /// The bookmark was never enriched with its scraped text.
    #[error("Bookmark {id} has no scraped content")]
    MissingContent { id: u64 },

    /// Creation timestamp outside the representable calendar range.
    #[error("Invalid bookmark timestamp: {0}")]
    InvalidTimestamp(i64),

    /// The renderer executable could not be started.
    #[error("Failed to start renderer `{program}`: {source}")]
    RendererSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Renaming the staged markup file failed (e.g. the temp file vanished).
    #[error("Failed to stage markup at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system errors.
    ///
    /// Wraps standard I/O errors for directory creation and file writes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors.
    ///
    /// Returned when the config file is unreadable or invalid, or when
    /// required credentials are missing.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl FolioError {
    /// Whether the error only affects the bookmark being processed.
    pub fn is_per_bookmark(&self) -> bool {
        matches!(
            self,
            FolioError::Structural(_) | FolioError::MissingContent { .. } | FolioError::InvalidTimestamp(_)
        )
    }
}

impl From<tempfile::PathPersistError> for FolioError {
    fn from(err: tempfile::PathPersistError) -> Self {
        FolioError::Persist { path: err.path.to_path_buf(), source: err.error }
    }
}

/// Result type alias for FolioError.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FolioError::FolderNotFound("keep".to_string());
        assert_eq!(err.to_string(), "Folder ID for name \"keep\" not found");
    }

    #[test]
    fn test_api_error() {
        let err = FolioError::Api { code: 1241, message: "Invalid bookmark".to_string() };
        assert!(err.to_string().contains("1241"));
        assert!(err.to_string().contains("Invalid bookmark"));
    }

    #[test]
    fn test_timeout_error() {
        let err = FolioError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_per_bookmark_classification() {
        assert!(FolioError::Structural("frameset".into()).is_per_bookmark());
        assert!(FolioError::MissingContent { id: 1 }.is_per_bookmark());
        assert!(FolioError::InvalidTimestamp(i64::MAX).is_per_bookmark());
        assert!(!FolioError::FolderNotFound("keep".into()).is_per_bookmark());
        assert!(!FolioError::Io(std::io::Error::other("disk full")).is_per_bookmark());
    }
}
