//! Geometry primitives and grid snapping.
//!
//! All coordinates live in canvas space: the SVG user coordinate system of the
//! diagram, +X right and +Y down.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GRID_CELL_SIZE;

/// A point in canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0).
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point::new(v.0, v.1)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Scales both sides by `factor`.
    pub fn scaled(&self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

/// Axis-aligned rectangle given by its min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        let hw = size.width / 2.0;
        let hh = size.height / 2.0;
        Self::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Rounds `value` to the nearest multiple of `cell_size`.
///
/// Ties round away from zero. A cell size that is not a positive finite
/// number leaves the value untouched.
pub fn snap(value: f64, cell_size: f64) -> f64 {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return value;
    }
    let snapped = (value / cell_size).round() * cell_size;
    // Avoid handing out -0.0 for values that round to the origin.
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// Snaps both coordinates of a point.
pub fn snap_point(point: Point, cell_size: f64) -> Point {
    Point::new(snap(point.x, cell_size), snap(point.y, cell_size))
}

/// Grid configuration of a canvas.
///
/// Changing the cell size never moves placed components; it only affects
/// future snapping and the background pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    cell_size: f64,
    pub visible: bool,
}

impl GridSettings {
    /// Creates grid settings. Non-positive sizes fall back to the default.
    pub fn new(cell_size: f64, visible: bool) -> Self {
        let mut grid = Self {
            cell_size: DEFAULT_GRID_CELL_SIZE,
            visible,
        };
        grid.set_cell_size(cell_size);
        grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Updates the cell size; returns false and keeps the old size when the
    /// new one is not a positive finite number.
    pub fn set_cell_size(&mut self, cell_size: f64) -> bool {
        if cell_size.is_finite() && cell_size > 0.0 {
            self.cell_size = cell_size;
            true
        } else {
            false
        }
    }

    /// Snaps a canvas point to this grid.
    pub fn snap(&self, point: Point) -> Point {
        snap_point(point, self.cell_size)
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_CELL_SIZE, true)
    }
}
