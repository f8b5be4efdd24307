//! SchemKit Settings Crate
//!
//! Handles application configuration, key-value persistence and the symbol
//! preset library.

pub mod config;
pub mod error;
pub mod presets;
pub mod store;

pub use config::{AssetSettings, CanvasSettings, Config, InteractionSettings, StorageSettings};
pub use error::{
    PresetError, PresetResult, SettingsError, SettingsResult, StorageError, StorageResult,
};
pub use presets::{PlacementArgs, PresetLibrary, PresetSnapshot};
pub use store::{FileStore, KeyValueStore, MemoryStore};
