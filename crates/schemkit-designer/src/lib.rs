//! # SchemKit Designer
//!
//! This crate provides the schematic canvas: symbol rendering, component
//! placement, selection and dragging, and layout import/export.
//!
//! ## Core Components
//!
//! - **SVG model**: owned element tree with a tolerant parser and writer
//! - **Registry**: symbol metadata per component type
//! - **Assets**: async asset sources and a memoizing document loader
//! - **Renderer**: scales assets to the grid, caches templates, draws placeholders
//! - **Canvas**: retained scene with grid pattern, instance and overlay layers
//! - **Viewport**: screen to canvas coordinate mapping with zoom and pan
//! - **Instance**: a placed symbol with position, rotation and label
//! - **Preview**: the translucent ghost that follows the pointer
//! - **Diagram**: the controller tying the above to pointer and key input
//!
//! ## Architecture
//!
//! ```text
//! Diagram (controller)
//!   ├── Canvas (scene)
//!   │     ├── instances layer  <- ComponentInstance visuals
//!   │     └── overlay layer    <- PreviewController ghost
//!   ├── Viewport (pointer mapping)
//!   └── SymbolRenderer
//!         ├── SymbolRegistry
//!         └── AssetLoader -> AssetSource
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemkit_designer::{AssetLoader, Diagram, MemoryAssetSource};
//!
//! let loader = Arc::new(AssetLoader::new(MemoryAssetSource::with_builtin_symbols()));
//! let mut diagram = Diagram::from_config(&Config::default(), loader)?;
//! diagram.add_component(ComponentType::Resistor, Point::new(100.0, 60.0)).await;
//! std::fs::write("circuit.svg", diagram.to_svg())?;
//! ```

pub mod assets;
pub mod canvas;
pub mod diagram;
pub mod instance;
pub mod preview;
pub mod registry;
pub mod renderer;
pub mod serialization;
pub mod shortcuts;
pub mod svg;
pub mod viewport;

pub use assets::{AssetLoader, AssetSource, DirAssetSource, MemoryAssetSource};
pub use canvas::{Canvas, CanvasLayer};
pub use diagram::{
    ClickOutcome, Diagram, DiagramOptions, InteractionState, KeyOutcome, PointerEvent,
};
pub use instance::{ComponentInstance, DiagramEvent};
pub use preview::PreviewController;
pub use registry::{SymbolDefinition, SymbolRegistry};
pub use renderer::{
    build, build_fallback, compute_scale, is_preview, RenderedSymbol, SymbolRenderer, TemplateKey,
};
pub use serialization::{
    load_snapshot, records_from_json, records_to_json, save_snapshot, InstanceRecord,
};
pub use shortcuts::{KeyBinding, KeyEvent, Modifiers, ShortcutAction, ShortcutMap};
pub use svg::{parse_document, SvgDocument, SvgElement, SvgNode, SvgParseError};
pub use viewport::{snapped_canvas_position, Viewport};

pub use schemkit_core::{ComponentType, Point, Rotation};
