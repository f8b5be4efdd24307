//! Shared constants for the editor.

/// Default grid cell size in canvas units.
pub const DEFAULT_GRID_CELL_SIZE: f64 = 20.0;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;

/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;

/// Clicks closer than this to the previous committed click are dropped.
pub const CLICK_DEBOUNCE_MS: u64 = 150;

/// Opacity of the placement ghost.
pub const PREVIEW_OPACITY: f64 = 0.5;

/// CSS class carried only by preview visuals.
pub const PREVIEW_CLASS: &str = "symbol-preview";

/// Upper bound for the symbol scale factor, so tiny assets are not blown up.
pub const MAX_RENDER_SCALE: f64 = 4.0;

/// Native size assumed for assets without `viewBox` or dimensions.
pub const FALLBACK_NATIVE_SIZE: f64 = 100.0;

/// Key under which presets are persisted.
pub const PRESET_STORAGE_KEY: &str = "circuit-presets";

/// File name used for diagram snapshot exports.
pub const SNAPSHOT_FILE_NAME: &str = "circuit-design.json";

/// Zoom limits shared by every viewport.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;

/// Multiplicative step used by zoom in/out.
pub const ZOOM_STEP: f64 = 1.2;
