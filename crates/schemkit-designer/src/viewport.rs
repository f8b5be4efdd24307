//! Viewport and coordinate transformation for pointer input.
//!
//! Handles conversion between screen coordinates (pointer events, relative to
//! the page) and canvas coordinates (the SVG user space components are placed
//! in). Manages zoom and pan with proper coordinate mapping.
//!
//! Both spaces are y-down, so the mapping is a plain scale and offset:
//!
//! ```text
//! canvas_x = (screen_x - origin_x - pan_x) / zoom
//! canvas_y = (screen_y - origin_y - pan_y) / zoom
//! ```
//!
//! where `origin` is where the canvas element sits on screen.

use std::fmt;

use schemkit_core::constants::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
use schemkit_core::{snap_point, Bounds, Point};

use crate::svg::ViewBox;

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
    client_origin: Point,
}

impl Viewport {
    /// Creates a 1:1 viewport for a canvas of the given pixel size.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
            client_origin: Point::origin(),
        }
    }

    /// Builds the mapping an SVG element with `view_box` establishes when laid
    /// out in the client rectangle `client` (default `xMidYMid meet`).
    pub fn from_view_box(view_box: &ViewBox, client: Bounds) -> Self {
        let width = client.width();
        let height = client.height();
        let zoom = (width / view_box.width)
            .min(height / view_box.height)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            zoom,
            pan_x: (width - view_box.width * zoom) / 2.0 - view_box.min_x * zoom,
            pan_y: (height - view_box.height * zoom) / 2.0 - view_box.min_y * zoom,
            canvas_width: width,
            canvas_height: height,
            client_origin: Point::new(client.min_x, client.min_y),
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the element resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Screen position of the canvas element's top-left corner.
    pub fn client_origin(&self) -> Point {
        self.client_origin
    }

    pub fn set_client_origin(&mut self, origin: Point) {
        self.client_origin = origin;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta amount in screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Converts a pointer position to canvas coordinates.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.client_origin.x - self.pan_x) / self.zoom,
            (screen.y - self.client_origin.y - self.pan_y) / self.zoom,
        )
    }

    /// Converts canvas coordinates to a screen position.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan_x + self.client_origin.x,
            canvas.y * self.zoom + self.pan_y + self.client_origin.y,
        )
    }

    /// Zooms to `new_zoom` keeping `canvas_point` at the same screen position.
    pub fn zoom_to_point(&mut self, canvas_point: Point, new_zoom: f64) {
        if !new_zoom.is_finite() {
            return;
        }
        let new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let screen = self.canvas_to_screen(canvas_point);
        self.zoom = new_zoom;
        self.pan_x = screen.x - self.client_origin.x - canvas_point.x * new_zoom;
        self.pan_y = screen.y - self.client_origin.y - canvas_point.y * new_zoom;
    }

    /// Zooms in around a canvas point (keeps it under the cursor).
    pub fn zoom_in_at(&mut self, canvas_point: Point) {
        self.zoom_to_point(canvas_point, self.zoom * ZOOM_STEP);
    }

    /// Zooms out around a canvas point (keeps it under the cursor).
    pub fn zoom_out_at(&mut self, canvas_point: Point) {
        self.zoom_to_point(canvas_point, self.zoom / ZOOM_STEP);
    }

    /// Fits `bounds` into the viewport, reserving `padding` (0.0 - 0.5) of
    /// each side, and centres it.
    pub fn fit_to_bounds(&mut self, bounds: Bounds, padding: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let padding_factor = 1.0 - padding.clamp(0.0, 0.45) * 2.0;
        let zoom_x = self.canvas_width * padding_factor / bounds.width();
        let zoom_y = self.canvas_height * padding_factor / bounds.height();
        self.zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        let center = Point::new(
            (bounds.min_x + bounds.max_x) / 2.0,
            (bounds.min_y + bounds.max_y) / 2.0,
        );
        self.center_on(center);
    }

    /// Centres the viewport on a canvas point.
    pub fn center_on(&mut self, canvas_point: Point) {
        self.pan_x = self.canvas_width / 2.0 - canvas_point.x * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - canvas_point.y * self.zoom;
    }

    /// Resets to the 1:1 mapping.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.reset_pan();
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

/// Canvas position of a pointer event, snapped to a grid of `cell_size`.
pub fn snapped_canvas_position(screen: Point, viewport: &Viewport, cell_size: f64) -> Point {
    snap_point(viewport.screen_to_canvas(screen), cell_size)
}
