//! # SchemKit Core
//!
//! Core types and utilities for SchemKit.
//! Provides canvas geometry, grid snapping, component type tags and the
//! shared error type used by the settings and designer crates.

pub mod component;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod types;

pub use component::{ComponentType, Rotation};
pub use error::{AssetError, Error, Result, SnapshotError};
pub use geometry::{snap, snap_point, Bounds, GridSettings, Point, Size};
pub use types::{shared, thread_safe_map, Shared, ThreadSafeMap, WeakShared};
