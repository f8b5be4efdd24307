//! Error types for the settings crate.
//!
//! This module provides structured error types for configuration management,
//! key-value storage and the preset library.

use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration file could not be loaded.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// The configuration file could not be saved.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The configuration directory could not be found or created.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// A storage backend error occurred.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A preset library error occurred.
    #[error("Preset error: {0}")]
    Preset(#[from] PresetError),
}

/// Errors raised by key-value storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// I/O error while reading or writing an entry.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors raised by the preset library.
#[derive(Error, Debug)]
pub enum PresetError {
    /// Imported preset text is not a valid preset map.
    #[error("Malformed preset data: {0}")]
    Malformed(String),

    /// A preset name is empty or whitespace.
    #[error("Preset name must not be empty")]
    EmptyName,

    /// Writing the library back to storage failed.
    #[error("Failed to persist presets: {0}")]
    Persist(#[from] StorageError),

    /// Serializing the library failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for preset operations.
pub type PresetResult<T> = Result<T, PresetError>;
