//! Placed component instances.
//!
//! An instance owns the wrapper group of its visual:
//!
//! ```text
//! <g class="component" data-id="1" data-type="resistor" transform="translate(x, y) rotate(r)">
//!   <g class="symbol symbol-resistor" ...>...</g>
//!   <text class="component-label">R1</text>
//!   <g class="delete-handle">...</g>
//! </g>
//! ```
//!
//! Position and rotation changes only rewrite the wrapper transform.

use std::rc::Rc;

use schemkit_core::{Bounds, ComponentType, Point, Rotation, Shared, Size, WeakShared};
use schemkit_settings::PlacementArgs;
use tokio::sync::mpsc::UnboundedSender;

use crate::canvas::CanvasLayer;
use crate::renderer::RenderedSymbol;
use crate::serialization::InstanceRecord;
use crate::svg::{fmt_num, SvgElement, SvgNode};

/// Radius of the delete affordance in canvas units.
pub const DELETE_HANDLE_RADIUS: f64 = 6.0;

const LABEL_CLASS: &str = "component-label";
const DELETE_HANDLE_CLASS: &str = "delete-handle";
const SELECTED_CLASS: &str = "selected";
const LABEL_GAP: f64 = 14.0;

/// Notifications sent from instances to the owning diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramEvent {
    /// The instance detached itself and should leave the collection.
    RemoveRequested(u64),
}

/// A symbol placed on a diagram.
#[derive(Debug)]
pub struct ComponentInstance {
    id: u64,
    component_type: ComponentType,
    position: Point,
    rotation: Rotation,
    label: Option<String>,
    footprint: Size,
    is_fallback: bool,
    visual: Shared<SvgElement>,
    layer: WeakShared<CanvasLayer>,
    events: UnboundedSender<DiagramEvent>,
}

impl ComponentInstance {
    /// Wraps `symbol` and appends it to `layer`.
    pub(crate) fn mount(
        id: u64,
        placement: PlacementArgs,
        symbol: RenderedSymbol,
        layer: &Shared<CanvasLayer>,
        events: UnboundedSender<DiagramEvent>,
    ) -> Self {
        let footprint = symbol.footprint;
        let wrapper = SvgElement::new("g")
            .with_attr("class", "component")
            .with_attr("data-id", id)
            .with_attr("data-type", placement.component_type.as_str())
            .with_child(symbol.element)
            .with_child(delete_handle(footprint));

        let mut instance = Self {
            id,
            component_type: placement.component_type,
            position: placement.position,
            rotation: placement.rotation,
            label: None,
            footprint,
            is_fallback: symbol.is_fallback,
            visual: schemkit_core::shared(wrapper),
            layer: Rc::downgrade(layer),
            events,
        };
        instance.write_transform();
        layer.borrow_mut().append(instance.visual.clone());
        instance.set_label(placement.label);
        instance
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Unrotated size of the drawn symbol.
    pub fn footprint(&self) -> Size {
        self.footprint
    }

    /// True when the visual is the placeholder rectangle.
    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    /// Handle to the mounted wrapper group.
    pub fn visual(&self) -> Shared<SvgElement> {
        self.visual.clone()
    }

    /// Moves the instance; the visual is not re-rendered.
    pub fn reposition(&mut self, position: Point) {
        self.position = position;
        self.write_transform();
    }

    /// Rotates by a quarter turn in place and returns the new rotation.
    pub fn rotate_step(&mut self) -> Rotation {
        self.set_rotation(self.rotation.step());
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.write_transform();
    }

    /// Sets or clears the label text. Blank labels clear it.
    pub fn set_label(&mut self, label: Option<String>) {
        let label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        let mut visual = self.visual.borrow_mut();
        match &label {
            Some(text) => match visual.child_with_class_mut(LABEL_CLASS) {
                Some(node) => node.set_text(text.clone()),
                None => {
                    let node = SvgElement::new("text")
                        .with_attr("class", LABEL_CLASS)
                        .with_attr("x", 0)
                        .with_attr("y", fmt_num(self.footprint.height / 2.0 + LABEL_GAP))
                        .with_attr("text-anchor", "middle")
                        .with_attr("font-size", 12)
                        .with_text(text.clone());
                    // Keep the delete handle last so it stays on top.
                    let at = visual.children.len().saturating_sub(1);
                    visual.children.insert(at, SvgNode::Element(node));
                }
            },
            None => {
                visual.remove_children_with_class(LABEL_CLASS);
            }
        }
        drop(visual);
        self.label = label;
    }

    /// Marks or unmarks the visual as selected.
    pub fn set_selected(&self, selected: bool) {
        let mut visual = self.visual.borrow_mut();
        if selected {
            visual.add_class(SELECTED_CLASS);
        } else {
            visual.remove_class(SELECTED_CLASS);
        }
    }

    pub fn is_selected(&self) -> bool {
        self.visual.borrow().has_class(SELECTED_CLASS)
    }

    /// Detaches the visual and asks the owning diagram to drop this instance.
    ///
    /// Returns false if the instance was already detached.
    pub fn remove(&self) -> bool {
        let detached = self.detach();
        if detached {
            // A closed channel means the diagram is gone; nothing left to notify.
            let _ = self.events.send(DiagramEvent::RemoveRequested(self.id));
        }
        detached
    }

    /// Detaches the visual without notifying the diagram.
    pub(crate) fn detach(&self) -> bool {
        match self.layer.upgrade() {
            Some(layer) => layer.borrow_mut().detach(&self.visual),
            None => false,
        }
    }

    /// True while the visual is mounted in the canvas layer.
    pub fn is_attached(&self) -> bool {
        self.layer
            .upgrade()
            .is_some_and(|layer| layer.borrow().contains(&self.visual))
    }

    /// Axis-aligned footprint in canvas coordinates.
    pub fn bounds(&self) -> Bounds {
        let size = if self.rotation.is_quarter_turn() {
            Size::new(self.footprint.height, self.footprint.width)
        } else {
            self.footprint
        };
        Bounds::centered(self.position, size)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(&point)
    }

    /// Canvas position of the delete affordance's centre.
    pub fn delete_handle_position(&self) -> Point {
        let local = Point::new(self.footprint.width / 2.0, -self.footprint.height / 2.0);
        let (sin, cos) = f64::from(self.rotation.degrees()).to_radians().sin_cos();
        Point::new(
            self.position.x + local.x * cos - local.y * sin,
            self.position.y + local.x * sin + local.y * cos,
        )
    }

    pub fn hits_delete_handle(&self, point: Point) -> bool {
        self.delete_handle_position().distance_to(&point) <= DELETE_HANDLE_RADIUS
    }

    /// Serializable form of this instance.
    pub fn record(&self) -> InstanceRecord {
        InstanceRecord {
            id: self.id,
            component_type: self.component_type.as_str().to_string(),
            position: self.position,
            rotation: self.rotation,
            label: self.label.clone(),
        }
    }

    /// Placement arguments reproducing this instance.
    pub fn placement(&self) -> PlacementArgs {
        PlacementArgs {
            component_type: self.component_type,
            position: self.position,
            rotation: self.rotation,
            label: self.label.clone(),
        }
    }

    fn write_transform(&self) {
        self.visual.borrow_mut().set_attr(
            "transform",
            format!(
                "translate({}, {}) rotate({})",
                fmt_num(self.position.x),
                fmt_num(self.position.y),
                self.rotation.degrees()
            ),
        );
    }
}

fn delete_handle(footprint: Size) -> SvgElement {
    let r = DELETE_HANDLE_RADIUS;
    let arm = fmt_num(r / 2.0);
    SvgElement::new("g")
        .with_attr("class", DELETE_HANDLE_CLASS)
        .with_attr(
            "transform",
            format!(
                "translate({}, {})",
                fmt_num(footprint.width / 2.0),
                fmt_num(-footprint.height / 2.0)
            ),
        )
        .with_child(
            SvgElement::new("circle")
                .with_attr("r", fmt_num(r))
                .with_attr("fill", "#d9534f"),
        )
        .with_child(
            SvgElement::new("path")
                .with_attr(
                    "d",
                    format!("M -{a} -{a} L {a} {a} M {a} -{a} L -{a} {a}", a = arm),
                )
                .with_attr("stroke", "#fff")
                .with_attr("stroke-width", 1.5),
        )
}
