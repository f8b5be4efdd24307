//! # Symbol Preset Library
//!
//! Named snapshots of single-component configurations (type, position,
//! rotation, label) persisted in a [`KeyValueStore`] under one key.
//!
//! The whole library is stored as a JSON object mapping preset name to
//! `{type, position: {x, y}, rotation, label, savedAt}`. It is read once when
//! the library is opened and written back after every mutation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemkit_core::constants::PRESET_STORAGE_KEY;
use schemkit_core::{ComponentType, Point, Rotation};
use serde::{Deserialize, Serialize};

use crate::error::{PresetError, PresetResult};
use crate::store::KeyValueStore;

/// Arguments needed to place a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementArgs {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub label: Option<String>,
}

impl PlacementArgs {
    pub fn new(component_type: ComponentType, position: Point) -> Self {
        Self {
            component_type,
            position,
            rotation: Rotation::ZERO,
            label: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A persisted preset entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSnapshot {
    #[serde(flatten)]
    pub placement: PlacementArgs,
    /// When the preset was last saved
    #[serde(rename = "savedAt", default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

/// Preset library bound to a storage backend.
pub struct PresetLibrary<S: KeyValueStore> {
    store: S,
    presets: BTreeMap<String, PresetSnapshot>,
}

impl<S: KeyValueStore> PresetLibrary<S> {
    /// Opens the library, reading existing presets from `store`.
    ///
    /// A missing, unreadable or corrupt entry yields an empty library.
    pub fn open(store: S) -> Self {
        let presets = match store.get(PRESET_STORAGE_KEY) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt preset store: {}", e);
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read preset store: {}", e);
                BTreeMap::new()
            }
        };
        tracing::debug!("Loaded {} presets", presets.len());
        Self { store, presets }
    }

    /// Saves `placement` under `name`, overwriting any preset with that name.
    pub fn save(&mut self, name: &str, placement: PlacementArgs) -> PresetResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        let mut next = self.presets.clone();
        next.insert(
            name.to_string(),
            PresetSnapshot {
                placement,
                saved_at: Utc::now(),
            },
        );
        self.commit(next)?;
        tracing::info!("Saved preset '{}'", name);
        Ok(())
    }

    /// Placement arguments of the preset called `name`.
    pub fn load(&self, name: &str) -> Option<PlacementArgs> {
        self.presets.get(name.trim()).map(|p| p.placement.clone())
    }

    /// The full stored entry, including its save time.
    pub fn get(&self, name: &str) -> Option<&PresetSnapshot> {
        self.presets.get(name.trim())
    }

    /// Deletes a preset; returns whether it existed.
    pub fn delete(&mut self, name: &str) -> PresetResult<bool> {
        let name = name.trim();
        if !self.presets.contains_key(name) {
            return Ok(false);
        }
        let mut next = self.presets.clone();
        next.remove(name);
        self.commit(next)?;
        tracing::info!("Deleted preset '{}'", name);
        Ok(true)
    }

    /// Serializes every preset as pretty JSON.
    pub fn export_all(&self) -> PresetResult<String> {
        Ok(serde_json::to_string_pretty(&self.presets)?)
    }

    /// Merges presets from JSON text; imported entries replace same-named ones.
    ///
    /// Malformed text is rejected as a whole and the library is left untouched.
    pub fn import_all(&mut self, json: &str) -> PresetResult<usize> {
        let imported: BTreeMap<String, PresetSnapshot> =
            serde_json::from_str(json).map_err(|e| PresetError::Malformed(e.to_string()))?;
        if imported.keys().any(|name| name.trim().is_empty()) {
            return Err(PresetError::EmptyName);
        }

        let count = imported.len();
        let mut next = self.presets.clone();
        next.extend(
            imported
                .into_iter()
                .map(|(name, preset)| (name.trim().to_string(), preset)),
        );
        self.commit(next)?;
        tracing::info!("Imported {} presets", count);
        Ok(count)
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists `next` and adopts it only once the write succeeded.
    fn commit(&mut self, next: BTreeMap<String, PresetSnapshot>) -> PresetResult<()> {
        let text = serde_json::to_string(&next)?;
        self.store.set(PRESET_STORAGE_KEY, &text)?;
        self.presets = next;
        Ok(())
    }
}
