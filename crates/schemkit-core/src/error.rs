//! Error handling for SchemKit
//!
//! Provides the error types shared by every layer of the editor:
//! - Asset errors (symbol files that cannot be fetched or parsed)
//! - Snapshot errors (diagram import/export data)
//! - Canvas errors (controller initialization)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Asset error type
///
/// Raised while loading a symbol's vector file. The renderer recovers from
/// every variant by drawing a placeholder, so these rarely reach callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// Asset file does not exist in the source
    #[error("Asset not found: {path}")]
    NotFound {
        /// The requested asset path.
        path: String,
    },

    /// Asset could not be read
    #[error("Failed to read asset {path}: {reason}")]
    ReadFailed {
        /// The requested asset path.
        path: String,
        /// The reason the read failed.
        reason: String,
    },

    /// Asset content is not a usable SVG document
    #[error("Failed to parse asset {path}: {reason}")]
    ParseFailed {
        /// The requested asset path.
        path: String,
        /// The reason parsing failed.
        reason: String,
    },
}

/// Snapshot error type
///
/// Represents problems with serialized diagram layouts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Snapshot text is not valid JSON for the expected shape
    #[error("Malformed snapshot: {reason}")]
    Malformed {
        /// The parser's description of the problem.
        reason: String,
    },

    /// Snapshot references a component type that no registry knows
    #[error("Unknown component type: {type_name}")]
    UnknownComponentType {
        /// The unrecognized type tag.
        type_name: String,
    },
}

/// Main error type for SchemKit
#[derive(Error, Debug)]
pub enum Error {
    /// Asset error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Snapshot error
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The canvas a controller was asked to drive is missing or unusable
    #[error("Canvas unavailable: {0}")]
    MissingCanvas(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an asset error
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Error::Asset(_))
    }

    /// Check if this error came from malformed input data
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::Json(_) | Error::Snapshot(SnapshotError::Malformed { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
