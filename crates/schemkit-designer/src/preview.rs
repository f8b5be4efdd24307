//! Placement preview.
//!
//! Shows a translucent ghost of the armed symbol type under the pointer in
//! the canvas overlay layer. At most one ghost exists at a time.

use schemkit_core::{shared, ComponentType, Point, Shared};

use crate::canvas::CanvasLayer;
use crate::renderer::SymbolRenderer;
use crate::svg::{fmt_num, SvgElement};

#[derive(Debug)]
struct Ghost {
    component_type: ComponentType,
    position: Point,
    cell_size: f64,
    node: Shared<SvgElement>,
}

/// Owns the ghost shown in an overlay layer.
#[derive(Debug)]
pub struct PreviewController {
    overlay: Shared<CanvasLayer>,
    ghost: Option<Ghost>,
}

impl PreviewController {
    pub fn new(overlay: Shared<CanvasLayer>) -> Self {
        Self {
            overlay,
            ghost: None,
        }
    }

    /// Shows a ghost of `component_type` at `position`, replacing any current
    /// one. Returns false when the type is not registered.
    pub async fn show(
        &mut self,
        renderer: &mut SymbolRenderer,
        component_type: ComponentType,
        position: Point,
        cell_size: f64,
    ) -> bool {
        self.clear();
        let Some(rendered) = renderer.render_preview(component_type, cell_size).await else {
            tracing::warn!("No symbol registered for {}, no preview", component_type);
            return false;
        };

        let node = shared(
            SvgElement::new("g")
                .with_attr("class", "preview-anchor")
                .with_attr("transform", translate(position))
                .with_child(rendered.element),
        );
        self.overlay.borrow_mut().append(node.clone());
        self.ghost = Some(Ghost {
            component_type,
            position,
            cell_size,
            node,
        });
        true
    }

    /// Moves the ghost; returns false when no ghost is shown.
    pub fn move_to(&mut self, position: Point) -> bool {
        let Some(ghost) = self.ghost.as_mut() else {
            return false;
        };
        if ghost.position != position {
            ghost.position = position;
            ghost
                .node
                .borrow_mut()
                .set_attr("transform", translate(position));
        }
        true
    }

    /// Removes the ghost; returns whether one was shown.
    pub fn clear(&mut self) -> bool {
        match self.ghost.take() {
            Some(ghost) => {
                self.overlay.borrow_mut().detach(&ghost.node);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.ghost.is_some()
    }

    pub fn active_type(&self) -> Option<ComponentType> {
        self.ghost.as_ref().map(|g| g.component_type)
    }

    pub fn position(&self) -> Option<Point> {
        self.ghost.as_ref().map(|g| g.position)
    }

    /// Grid cell size the ghost was rendered for.
    pub fn cell_size(&self) -> Option<f64> {
        self.ghost.as_ref().map(|g| g.cell_size)
    }

    /// True when the current ghost shows `component_type` rendered for
    /// `cell_size`, so it only needs moving.
    pub fn matches(&self, component_type: ComponentType, cell_size: f64) -> bool {
        self.ghost
            .as_ref()
            .is_some_and(|g| g.component_type == component_type && g.cell_size == cell_size)
    }
}

fn translate(p: Point) -> String {
    format!("translate({}, {})", fmt_num(p.x), fmt_num(p.y))
}
