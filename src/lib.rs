//! # SchemKit
//!
//! A schematic symbol placement editor:
//! - Grid-snapped canvas with zoom and pan
//! - SVG symbol assets scaled to their grid footprint, with cached templates
//!   and labelled placeholders for missing assets
//! - Click-to-place, select, drag, rotate and delete interactions
//! - Named single-symbol presets persisted in a key-value store
//! - JSON layout export and import
//!
//! ## Architecture
//!
//! SchemKit is organized as a workspace with multiple crates:
//!
//! 1. **schemkit-core** - Geometry, grid snapping, component types, errors
//! 2. **schemkit-settings** - Configuration, key-value storage, preset library
//! 3. **schemkit-designer** - SVG model, renderer, canvas and diagram controller
//! 4. **schemkit** - Main binary that renders a layout to an SVG file

pub use schemkit_core as core;
pub use schemkit_designer as designer;
pub use schemkit_settings as settings;

pub use schemkit_core::{
    AssetError, Bounds, ComponentType, Error, GridSettings, Point, Result, Rotation, Size,
    SnapshotError,
};

pub use schemkit_designer::{
    AssetLoader, AssetSource, ClickOutcome, ComponentInstance, Diagram, DiagramOptions,
    DirAssetSource, InstanceRecord, InteractionState, KeyEvent, KeyOutcome, MemoryAssetSource,
    PointerEvent, SymbolDefinition, SymbolRegistry, SymbolRenderer, Viewport,
};

pub use schemkit_settings::{
    Config, FileStore, KeyValueStore, MemoryStore, PlacementArgs, PresetLibrary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
