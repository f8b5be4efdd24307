//! Symbol registry.
//!
//! Maps each [`ComponentType`] to the metadata needed to draw it: a display
//! name, the path of its vector asset and its nominal footprint in grid cells.

use schemkit_core::{ComponentType, Size};

/// Immutable description of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDefinition {
    pub component_type: ComponentType,
    pub display_name: String,
    /// Asset path, resolved by the asset source.
    pub asset_path: String,
    /// Nominal footprint in grid cells.
    pub default_size: Size,
}

impl SymbolDefinition {
    pub fn new(
        component_type: ComponentType,
        display_name: impl Into<String>,
        asset_path: impl Into<String>,
        default_size: Size,
    ) -> Self {
        Self {
            component_type,
            display_name: display_name.into(),
            asset_path: asset_path.into(),
            default_size,
        }
    }

    /// Footprint in canvas units for a grid of `cell_size`.
    pub fn footprint(&self, cell_size: f64) -> Size {
        self.default_size.scaled(cell_size)
    }
}

/// Registry of symbol definitions, iterated in registration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    definitions: Vec<SymbolDefinition>,
}

impl SymbolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in symbols.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (ty, name, w, h) in [
            (ComponentType::Resistor, "Resistor", 4.0, 2.0),
            (ComponentType::Inductor, "Inductor", 4.0, 2.0),
            (ComponentType::Capacitor, "Capacitor", 2.0, 3.0),
            (ComponentType::Nmos, "NMOS", 3.0, 4.0),
            (ComponentType::Pmos, "PMOS", 3.0, 4.0),
        ] {
            registry.register(SymbolDefinition::new(
                ty,
                name,
                format!("symbols/{}.svg", ty),
                Size::new(w, h),
            ));
        }
        registry
    }

    /// Inserts a definition, replacing any existing one for the same type
    /// while keeping its position in iteration order.
    pub fn register(&mut self, definition: SymbolDefinition) {
        match self
            .definitions
            .iter_mut()
            .find(|d| d.component_type == definition.component_type)
        {
            Some(slot) => {
                tracing::debug!("Replacing symbol definition for {}", definition.component_type);
                *slot = definition;
            }
            None => self.definitions.push(definition),
        }
    }

    /// Removes the definition for `component_type`, returning it.
    pub fn unregister(&mut self, component_type: ComponentType) -> Option<SymbolDefinition> {
        let idx = self
            .definitions
            .iter()
            .position(|d| d.component_type == component_type)?;
        Some(self.definitions.remove(idx))
    }

    pub fn get(&self, component_type: ComponentType) -> Option<&SymbolDefinition> {
        self.definitions
            .iter()
            .find(|d| d.component_type == component_type)
    }

    /// Registered types in registration order.
    pub fn all_types(&self) -> Vec<ComponentType> {
        self.definitions.iter().map(|d| d.component_type).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
