//! Diagram controller.
//!
//! Owns the placed instances of one canvas and routes pointer and keyboard
//! input to placement, selection, dragging and deletion. Also converts the
//! instance collection to and from layout records.
//!
//! Interaction is a small state machine:
//!
//! - `Idle`: clicks select the topmost instance under the pointer; pressing
//!   on an instance starts a drag, pressing on its delete handle removes it.
//! - `TypeSelected`: a symbol type is armed; the preview follows the pointer
//!   and the next click places one instance, then the diagram returns to idle.
//! - `Dragging`: pointer moves reposition the grabbed instance until release.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemkit_core::constants::CLICK_DEBOUNCE_MS;
use schemkit_core::{ComponentType, Error, Point, Result, Rotation};
use schemkit_settings::{Config, KeyValueStore, PlacementArgs, PresetLibrary, PresetResult};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::assets::AssetLoader;
use crate::canvas::Canvas;
use crate::instance::{ComponentInstance, DiagramEvent};
use crate::preview::PreviewController;
use crate::registry::SymbolRegistry;
use crate::renderer::{is_preview, SymbolRenderer};
use crate::serialization::{self, InstanceRecord};
use crate::shortcuts::{KeyEvent, ShortcutAction, ShortcutMap};
use crate::viewport::{snapped_canvas_position, Viewport};

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    TypeSelected(ComponentType),
    Dragging {
        id: u64,
        /// Pointer position minus instance position when the drag started.
        grab_offset: Point,
    },
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub screen: Point,
    /// Event time in milliseconds; only differences matter.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            screen: Point::new(x, y),
            timestamp_ms,
        }
    }
}

/// What a pointer press or click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Placed(u64),
    Selected(u64),
    Deselected,
    Removed(u64),
    DragStarted(u64),
    Ignored,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Layout JSON of the whole diagram. It is also written to
    /// `<export_dir>/circuit-design.json` when an export directory is set;
    /// otherwise saving the text is up to the caller.
    Exported(String),
    Deleted(u64),
    Rotated(u64, Rotation),
    Deselected,
    Unhandled,
}

/// Interaction tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramOptions {
    pub click_debounce_ms: u64,
    pub shortcuts: ShortcutMap,
    /// Directory the export shortcut writes the layout file to.
    pub export_dir: Option<PathBuf>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            click_debounce_ms: CLICK_DEBOUNCE_MS,
            shortcuts: ShortcutMap::default(),
            export_dir: None,
        }
    }
}

impl DiagramOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            click_debounce_ms: config.interaction.click_debounce_ms,
            shortcuts: ShortcutMap::with_overrides(&config.shortcuts),
            export_dir: config.storage.export_directory.clone(),
        }
    }
}

/// Placed components of one canvas plus the interaction state around them.
#[derive(Debug)]
pub struct Diagram {
    canvas: Canvas,
    viewport: Viewport,
    renderer: SymbolRenderer,
    preview: PreviewController,
    instances: Vec<ComponentInstance>,
    next_id: u64,
    state: InteractionState,
    selected: Option<u64>,
    last_commit_ms: Option<u64>,
    options: DiagramOptions,
    events_tx: UnboundedSender<DiagramEvent>,
    events_rx: UnboundedReceiver<DiagramEvent>,
}

impl Diagram {
    pub fn new(canvas: Canvas, renderer: SymbolRenderer, options: DiagramOptions) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            viewport: Viewport::new(canvas.width(), canvas.height()),
            preview: PreviewController::new(canvas.overlay_layer().clone()),
            canvas,
            renderer,
            instances: Vec::new(),
            next_id: 1,
            state: InteractionState::Idle,
            selected: None,
            last_commit_ms: None,
            options,
            events_tx,
            events_rx,
        }
    }

    /// Builds a diagram with the default symbols from `config`.
    pub fn from_config(config: &Config, loader: Arc<AssetLoader>) -> Result<Self> {
        let canvas = Canvas::new(config.canvas.width, config.canvas.height, config.canvas.grid())?;
        let renderer = SymbolRenderer::new(SymbolRegistry::with_defaults(), loader)
            .with_preview_opacity(config.interaction.preview_opacity);
        Ok(Self::new(
            canvas,
            renderer,
            DiagramOptions::from_config(config),
        ))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn renderer(&self) -> &SymbolRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut SymbolRenderer {
        &mut self.renderer
    }

    pub fn preview(&self) -> &PreviewController {
        &self.preview
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    /// Changes the grid cell size. Placed instances stay where they are.
    pub fn set_grid_cell_size(&mut self, cell_size: f64) -> bool {
        self.canvas.grid_mut().set_cell_size(cell_size)
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.canvas.grid_mut().visible = visible;
    }

    fn cell_size(&self) -> f64 {
        self.canvas.grid().cell_size()
    }

    /// Applies removals requested by instances; returns how many were applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                DiagramEvent::RemoveRequested(id) => {
                    if self.forget(id) {
                        tracing::info!("Removed component #{}", id);
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    /// Drops `id` from the collection and from selection/drag state.
    fn forget(&mut self, id: u64) -> bool {
        let Some(idx) = self.instances.iter().position(|i| i.id() == id) else {
            return false;
        };
        self.instances.remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if matches!(self.state, InteractionState::Dragging { id: dragged, .. } if dragged == id) {
            self.state = InteractionState::Idle;
        }
        true
    }

    // ---- Queries ----

    /// Placed instances in z-order (bottom first).
    pub fn instances(&self) -> Vec<&ComponentInstance> {
        self.live().collect()
    }

    fn live(&self) -> impl DoubleEndedIterator<Item = &ComponentInstance> {
        self.instances.iter().filter(|i| i.is_attached())
    }

    pub fn instance(&self, id: u64) -> Option<&ComponentInstance> {
        self.live().find(|i| i.id() == id)
    }

    fn instance_mut(&mut self, id: u64) -> Option<&mut ComponentInstance> {
        self.instances
            .iter_mut()
            .find(|i| i.id() == id && i.is_attached())
    }

    pub fn len(&self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Topmost instance whose footprint contains `point` (canvas space).
    pub fn instance_at(&self, point: Point) -> Option<u64> {
        self.live().rev().find(|i| i.contains(point)).map(|i| i.id())
    }

    // ---- Placement ----

    /// Arms `component_type` for placement. Returns false for unregistered types.
    pub fn arm(&mut self, component_type: ComponentType) -> bool {
        if self.renderer.registry().get(component_type).is_none() {
            tracing::warn!("Cannot arm unregistered symbol {}", component_type);
            return false;
        }
        if self.preview.active_type() != Some(component_type) {
            self.preview.clear();
        }
        tracing::debug!("Armed {}", component_type);
        self.state = InteractionState::TypeSelected(component_type);
        true
    }

    /// Drops the armed type and its preview.
    pub fn disarm(&mut self) {
        self.preview.clear();
        if matches!(self.state, InteractionState::TypeSelected(_)) {
            self.state = InteractionState::Idle;
        }
    }

    /// Places `component_type` at `position` with no rotation or label.
    pub async fn add_component(
        &mut self,
        component_type: ComponentType,
        position: Point,
    ) -> Option<u64> {
        self.add_component_with(PlacementArgs::new(component_type, position))
            .await
    }

    /// Places a component; returns its id, or `None` when the type has no
    /// registered symbol.
    pub async fn add_component_with(&mut self, placement: PlacementArgs) -> Option<u64> {
        self.process_events();
        let cell_size = self.cell_size();
        let ty = placement.component_type;

        let Some(rendered) = self.renderer.render(ty, cell_size).await else {
            tracing::warn!("No symbol registered for {}, nothing placed", ty);
            return None;
        };
        if is_preview(&rendered.element) {
            tracing::warn!("Refusing to place a preview visual for {}", ty);
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let position = placement.position;
        let instance = ComponentInstance::mount(
            id,
            placement,
            rendered,
            self.canvas.instance_layer(),
            self.events_tx.clone(),
        );
        self.instances.push(instance);
        tracing::info!("Placed {} #{} at {}", ty, id, position);
        Some(id)
    }

    /// Places the preset `name`, optionally at another position.
    pub async fn add_from_preset<S: KeyValueStore>(
        &mut self,
        library: &PresetLibrary<S>,
        name: &str,
        position: Option<Point>,
    ) -> Option<u64> {
        let Some(mut placement) = library.load(name) else {
            tracing::warn!("No preset named '{}'", name);
            return None;
        };
        if let Some(position) = position {
            placement.position = position;
        }
        self.add_component_with(placement).await
    }

    /// Saves instance `id` as preset `name`; returns false if `id` is unknown.
    pub fn save_preset<S: KeyValueStore>(
        &self,
        library: &mut PresetLibrary<S>,
        name: &str,
        id: u64,
    ) -> PresetResult<bool> {
        match self.instance(id) {
            Some(instance) => {
                library.save(name, instance.placement())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ---- Editing ----

    /// Removes instance `id`; returns false if it is not placed.
    pub fn remove_component(&mut self, id: u64) -> bool {
        self.process_events();
        let Some(instance) = self.instances.iter().find(|i| i.id() == id) else {
            return false;
        };
        instance.detach();
        self.forget(id);
        tracing::info!("Removed component #{}", id);
        true
    }

    /// Removes every instance and restarts id assignment.
    pub fn clear(&mut self) {
        for instance in &self.instances {
            instance.detach();
        }
        self.instances.clear();
        while self.events_rx.try_recv().is_ok() {}
        self.next_id = 1;
        self.selected = None;
        if matches!(self.state, InteractionState::Dragging { .. }) {
            self.state = InteractionState::Idle;
        }
        tracing::debug!("Cleared diagram");
    }

    pub fn move_component(&mut self, id: u64, position: Point) -> bool {
        self.process_events();
        match self.instance_mut(id) {
            Some(instance) => {
                instance.reposition(position);
                true
            }
            None => false,
        }
    }

    /// Rotates instance `id` by a quarter turn.
    pub fn rotate_component(&mut self, id: u64) -> Option<Rotation> {
        self.process_events();
        self.instance_mut(id).map(ComponentInstance::rotate_step)
    }

    pub fn set_label(&mut self, id: u64, label: Option<String>) -> bool {
        self.process_events();
        match self.instance_mut(id) {
            Some(instance) => {
                instance.set_label(label);
                true
            }
            None => false,
        }
    }

    // ---- Selection ----

    pub fn select(&mut self, id: u64) -> bool {
        self.process_events();
        if self.instance(id).is_none() {
            return false;
        }
        self.deselect();
        if let Some(instance) = self.instance(id) {
            instance.set_selected(true);
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            if let Some(instance) = self.instance(id) {
                instance.set_selected(false);
            }
        }
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected.filter(|id| self.instance(*id).is_some())
    }

    // ---- Pointer input ----

    /// Tracks the pointer: drives the preview while armed and the grabbed
    /// instance while dragging. Returns the snapped canvas position.
    pub async fn handle_pointer_move(&mut self, event: PointerEvent) -> Point {
        self.process_events();
        let cell_size = self.cell_size();
        let snapped = snapped_canvas_position(event.screen, &self.viewport, cell_size);

        match self.state {
            InteractionState::TypeSelected(ty) => {
                if self.preview.matches(ty, cell_size) {
                    self.preview.move_to(snapped);
                } else {
                    self.preview
                        .show(&mut self.renderer, ty, snapped, cell_size)
                        .await;
                }
            }
            InteractionState::Dragging { id, grab_offset } => {
                let point = self.viewport.screen_to_canvas(event.screen);
                let target = self.canvas.grid().snap(point - grab_offset);
                if let Some(instance) = self.instance_mut(id) {
                    instance.reposition(target);
                }
            }
            InteractionState::Idle => {}
        }
        snapped
    }

    /// Pointer press. While idle the topmost instance under the pointer is
    /// removed when its delete handle is hit, otherwise selected and dragged.
    pub fn handle_pointer_down(&mut self, event: PointerEvent) -> ClickOutcome {
        self.process_events();
        if self.state != InteractionState::Idle {
            return ClickOutcome::Ignored;
        }
        let point = self.viewport.screen_to_canvas(event.screen);

        // Topmost instance hit by its handle or its body.
        let hit = self
            .live()
            .rev()
            .map(|i| (i, i.hits_delete_handle(point)))
            .find(|(i, on_handle)| *on_handle || i.contains(point))
            .map(|(i, on_handle)| (i.id(), on_handle, point - i.position()));

        match hit {
            Some((id, true, _)) => {
                self.remove_component(id);
                ClickOutcome::Removed(id)
            }
            Some((id, false, grab_offset)) => {
                self.select(id);
                self.state = InteractionState::Dragging { id, grab_offset };
                ClickOutcome::DragStarted(id)
            }
            None => {
                self.deselect();
                ClickOutcome::Deselected
            }
        }
    }

    /// Pointer release; ends a drag.
    pub fn handle_pointer_up(&mut self, _event: PointerEvent) -> bool {
        if matches!(self.state, InteractionState::Dragging { .. }) {
            self.state = InteractionState::Idle;
            return true;
        }
        false
    }

    /// Click. Places the armed type at the snapped pointer position, or
    /// updates the selection while idle.
    ///
    /// Clicks arriving within the debounce window of the last placement are
    /// ignored in every state.
    pub async fn handle_click(&mut self, event: PointerEvent) -> ClickOutcome {
        self.process_events();
        if let Some(last) = self.last_commit_ms {
            if event.timestamp_ms.saturating_sub(last) < self.options.click_debounce_ms {
                tracing::debug!("Ignoring click within debounce window");
                return ClickOutcome::Ignored;
            }
        }

        match self.state {
            InteractionState::TypeSelected(ty) => {
                let position =
                    snapped_canvas_position(event.screen, &self.viewport, self.cell_size());
                let placed = self.add_component(ty, position).await;
                self.preview.clear();
                self.state = InteractionState::Idle;
                match placed {
                    Some(id) => {
                        self.last_commit_ms = Some(event.timestamp_ms);
                        ClickOutcome::Placed(id)
                    }
                    None => ClickOutcome::Ignored,
                }
            }
            InteractionState::Idle => {
                let point = self.viewport.screen_to_canvas(event.screen);
                match self.instance_at(point) {
                    Some(id) => {
                        self.select(id);
                        ClickOutcome::Selected(id)
                    }
                    None => {
                        self.deselect();
                        ClickOutcome::Deselected
                    }
                }
            }
            InteractionState::Dragging { .. } => ClickOutcome::Ignored,
        }
    }

    // ---- Keyboard input ----

    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<KeyOutcome> {
        self.process_events();
        let Some(action) = self.options.shortcuts.action_for(event) else {
            return Ok(KeyOutcome::Unhandled);
        };

        let outcome = match action {
            ShortcutAction::Export => KeyOutcome::Exported(self.export()?),
            ShortcutAction::DeleteSelected => match self.selected() {
                Some(id) if self.remove_component(id) => KeyOutcome::Deleted(id),
                _ => KeyOutcome::Unhandled,
            },
            ShortcutAction::RotateSelected => match self.selected() {
                Some(id) => match self.rotate_component(id) {
                    Some(rotation) => KeyOutcome::Rotated(id, rotation),
                    None => KeyOutcome::Unhandled,
                },
                None => KeyOutcome::Unhandled,
            },
            ShortcutAction::Deselect => {
                self.disarm();
                self.deselect();
                KeyOutcome::Deselected
            }
        };
        Ok(outcome)
    }

    // ---- Snapshots ----

    /// Records of every placed instance in z-order.
    pub fn export_snapshot(&self) -> Vec<InstanceRecord> {
        self.live().map(ComponentInstance::record).collect()
    }

    pub fn export_json(&self) -> Result<String> {
        serialization::records_to_json(&self.export_snapshot())
    }

    /// Export shortcut: the layout JSON, also saved to the export directory
    /// when one is configured.
    fn export(&self) -> Result<String> {
        let json = self.export_json()?;
        if let Some(dir) = &self.options.export_dir {
            serialization::save_snapshot(dir, &self.export_snapshot())
                .map_err(|e| Error::other(format!("{:#}", e)))?;
        }
        Ok(json)
    }

    /// Replaces the diagram with `records`. Records of unknown types are
    /// skipped; ids are reassigned. Returns the number placed.
    pub async fn import_snapshot(&mut self, records: &[InstanceRecord]) -> usize {
        self.clear();
        let mut placed = 0;
        for record in records {
            let placement = match record.placement() {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Skipping record #{}: {}", record.id, e);
                    continue;
                }
            };
            if self.add_component_with(placement).await.is_some() {
                placed += 1;
            }
        }
        tracing::info!("Imported {} of {} components", placed, records.len());
        placed
    }

    /// Parses layout JSON and imports it. Malformed text leaves the diagram
    /// untouched.
    pub async fn import_json(&mut self, text: &str) -> Result<usize> {
        let records = serialization::records_from_json(text)?;
        Ok(self.import_snapshot(&records).await)
    }

    /// Writes the layout to `path` (a directory gets the default file name).
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<PathBuf> {
        serialization::save_snapshot(path, &self.export_snapshot())
    }

    pub async fn load_from_file(&mut self, path: &Path) -> anyhow::Result<usize> {
        let records = serialization::load_snapshot(path)?;
        Ok(self.import_snapshot(&records).await)
    }

    /// The rendered scene as SVG text.
    pub fn to_svg(&self) -> String {
        self.canvas.to_svg_string()
    }
}
