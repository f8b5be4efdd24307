//! Canvas surface.
//!
//! The retained SVG scene a diagram draws into: a background grid pattern, a
//! layer holding placed instances and an overlay layer for transient visuals
//! such as the placement preview.

use std::rc::Rc;

use schemkit_core::{shared, Error, GridSettings, Result, Shared};

use crate::svg::{fmt_num, SvgElement};

/// An ordered group of scene nodes. Later children are drawn on top.
#[derive(Debug, Default)]
pub struct CanvasLayer {
    id: String,
    children: Vec<Shared<SvgElement>>,
}

impl CanvasLayer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append(&mut self, node: Shared<SvgElement>) {
        self.children.push(node);
    }

    /// Removes `node`; returns false when it was not a child.
    pub fn detach(&mut self, node: &Shared<SvgElement>) -> bool {
        match self.children.iter().position(|c| Rc::ptr_eq(c, node)) {
            Some(idx) => {
                self.children.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, node: &Shared<SvgElement>) -> bool {
        self.children.iter().any(|c| Rc::ptr_eq(c, node))
    }

    pub fn children(&self) -> &[Shared<SvgElement>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Snapshot of the layer as a `<g id=..>` element.
    pub fn to_element(&self) -> SvgElement {
        let mut group = SvgElement::new("g").with_attr("id", &self.id);
        for child in &self.children {
            group.push_child(child.borrow().clone());
        }
        group
    }
}

/// The drawing surface of a diagram.
#[derive(Debug)]
pub struct Canvas {
    width: f64,
    height: f64,
    grid: GridSettings,
    instances: Shared<CanvasLayer>,
    overlay: Shared<CanvasLayer>,
}

impl Canvas {
    /// Creates a canvas; both dimensions must be positive finite numbers.
    pub fn new(width: f64, height: f64, grid: GridSettings) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            let msg = format!("invalid canvas dimensions {}x{}", width, height);
            tracing::error!("Cannot initialize canvas: {}", msg);
            return Err(Error::MissingCanvas(msg));
        }
        Ok(Self {
            width,
            height,
            grid,
            instances: shared(CanvasLayer::new("instances")),
            overlay: shared(CanvasLayer::new("overlay")),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridSettings {
        &mut self.grid
    }

    /// Layer holding placed component visuals.
    pub fn instance_layer(&self) -> &Shared<CanvasLayer> {
        &self.instances
    }

    /// Layer holding transient visuals.
    pub fn overlay_layer(&self) -> &Shared<CanvasLayer> {
        &self.overlay
    }

    /// Number of visuals currently mounted in the instance layer.
    pub fn live_handle_count(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Builds the whole scene as an `<svg>` element.
    pub fn to_element(&self) -> SvgElement {
        let cell = fmt_num(self.grid.cell_size());
        let mut root = SvgElement::new("svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_attr("width", fmt_num(self.width))
            .with_attr("height", fmt_num(self.height))
            .with_attr(
                "viewBox",
                format!("0 0 {} {}", fmt_num(self.width), fmt_num(self.height)),
            );

        root.push_child(
            SvgElement::new("defs").with_child(
                SvgElement::new("pattern")
                    .with_attr("id", "grid")
                    .with_attr("width", &cell)
                    .with_attr("height", &cell)
                    .with_attr("patternUnits", "userSpaceOnUse")
                    .with_child(
                        SvgElement::new("path")
                            .with_attr("d", format!("M {} 0 L 0 0 0 {}", cell, cell))
                            .with_attr("fill", "none")
                            .with_attr("stroke", "#e0e0e0")
                            .with_attr("stroke-width", 1),
                    ),
            ),
        );
        if self.grid.visible {
            root.push_child(
                SvgElement::new("rect")
                    .with_attr("class", "grid")
                    .with_attr("width", "100%")
                    .with_attr("height", "100%")
                    .with_attr("fill", "url(#grid)"),
            );
        }
        root.push_child(self.instances.borrow().to_element());
        root.push_child(self.overlay.borrow().to_element());
        root
    }

    /// Serializes the scene as SVG text.
    pub fn to_svg_string(&self) -> String {
        self.to_element().to_svg_string()
    }
}
