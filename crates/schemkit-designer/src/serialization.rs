//! Serialization and deserialization of diagram layouts.
//!
//! A layout is a JSON array of instance records in z-order:
//!
//! ```json
//! [{"id": 1, "type": "resistor", "position": {"x": 100, "y": 60}, "rotation": 90, "label": null}]
//! ```
//!
//! The type is kept as text so that a record naming an unknown component can
//! be skipped on import without rejecting the whole file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result as AnyResult};
use schemkit_core::constants::SNAPSHOT_FILE_NAME;
use schemkit_core::{ComponentType, Error, Point, Result, Rotation, SnapshotError};
use schemkit_settings::PlacementArgs;
use serde::{Deserialize, Serialize};

/// One placed instance as stored in a layout file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub label: Option<String>,
}

impl InstanceRecord {
    /// Resolves the type tag.
    pub fn resolve_type(&self) -> std::result::Result<ComponentType, SnapshotError> {
        self.component_type
            .parse()
            .map_err(|_| SnapshotError::UnknownComponentType {
                type_name: self.component_type.clone(),
            })
    }

    /// Placement arguments replaying this record.
    pub fn placement(&self) -> std::result::Result<PlacementArgs, SnapshotError> {
        Ok(PlacementArgs {
            component_type: self.resolve_type()?,
            position: self.position,
            rotation: self.rotation,
            label: self.label.clone(),
        })
    }
}

/// Encodes records as a pretty JSON array.
pub fn records_to_json(records: &[InstanceRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Decodes a JSON array of records.
pub fn records_from_json(text: &str) -> Result<Vec<InstanceRecord>> {
    serde_json::from_str(text).map_err(|e| {
        Error::from(SnapshotError::Malformed {
            reason: e.to_string(),
        })
    })
}

/// File a snapshot at `path` is read from or written to; directories resolve
/// to the default file name inside them.
pub fn resolve_snapshot_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(SNAPSHOT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Writes `records` to `path`, returning the file written.
pub fn save_snapshot(path: &Path, records: &[InstanceRecord]) -> AnyResult<PathBuf> {
    let target = resolve_snapshot_path(path);
    let json = records_to_json(records).context("Failed to serialize layout")?;
    std::fs::write(&target, json)
        .with_context(|| format!("Failed to write layout to {}", target.display()))?;
    tracing::info!("Saved {} instances to {}", records.len(), target.display());
    Ok(target)
}

/// Reads records from `path`.
pub fn load_snapshot(path: &Path) -> AnyResult<Vec<InstanceRecord>> {
    let source = resolve_snapshot_path(path);
    let text = std::fs::read_to_string(&source)
        .with_context(|| format!("Failed to read layout from {}", source.display()))?;
    let records = records_from_json(&text)
        .with_context(|| format!("Failed to parse layout {}", source.display()))?;
    Ok(records)
}
