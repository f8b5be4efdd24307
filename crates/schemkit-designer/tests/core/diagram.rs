use std::sync::Arc;

use schemkit_core::{ComponentType, Error, Point, Rotation};
use schemkit_designer::{
    AssetLoader, ClickOutcome, Diagram, InteractionState, KeyEvent, KeyOutcome,
    MemoryAssetSource, PointerEvent,
};
use schemkit_core::constants::SNAPSHOT_FILE_NAME;
use schemkit_settings::{Config, MemoryStore, PresetLibrary};
use tempfile::TempDir;

fn diagram() -> Diagram {
    diagram_with(&Config::default())
}

fn diagram_with(config: &Config) -> Diagram {
    let loader = Arc::new(AssetLoader::new(MemoryAssetSource::with_builtin_symbols()));
    Diagram::from_config(config, loader).unwrap()
}

async fn place(diagram: &mut Diagram, ty: ComponentType, x: f64, y: f64, ts: u64) -> u64 {
    assert!(diagram.arm(ty));
    match diagram.handle_click(PointerEvent::new(x, y, ts)).await {
        ClickOutcome::Placed(id) => id,
        other => panic!("expected placement, got {:?}", other),
    }
}

#[tokio::test]
async fn test_place_rotate_export_clear() {
    let mut diagram = diagram();
    assert!(diagram.arm(ComponentType::Resistor));
    assert_eq!(
        diagram.state(),
        &InteractionState::TypeSelected(ComponentType::Resistor)
    );

    let snapped = diagram
        .handle_pointer_move(PointerEvent::new(103.0, 58.0, 990))
        .await;
    assert_eq!(snapped, Point::new(100.0, 60.0));
    assert!(diagram.preview().is_active());
    assert_eq!(diagram.canvas().overlay_layer().borrow().len(), 1);

    let outcome = diagram
        .handle_click(PointerEvent::new(103.0, 58.0, 1000))
        .await;
    assert_eq!(outcome, ClickOutcome::Placed(1));
    assert_eq!(diagram.state(), &InteractionState::Idle);
    assert!(!diagram.preview().is_active());
    assert!(diagram.canvas().overlay_layer().borrow().is_empty());

    let instance = diagram.instance(1).unwrap();
    assert_eq!(instance.position(), Point::new(100.0, 60.0));
    assert!(!instance.is_fallback());

    assert_eq!(diagram.rotate_component(1), Some(Rotation::from_degrees(90)));
    let records = diagram.export_snapshot();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].component_type, "resistor");
    assert_eq!(records[0].rotation.degrees(), 90);

    diagram.clear();
    assert!(diagram.is_empty());
    assert_eq!(diagram.canvas().live_handle_count(), 0);
}

#[tokio::test]
async fn test_click_debounce() {
    let mut diagram = diagram();
    place(&mut diagram, ComponentType::Capacitor, 40.0, 40.0, 1000).await;

    assert!(diagram.arm(ComponentType::Capacitor));
    let early = diagram
        .handle_click(PointerEvent::new(200.0, 40.0, 1100))
        .await;
    assert_eq!(early, ClickOutcome::Ignored);
    assert_eq!(diagram.len(), 1);
    assert_eq!(
        diagram.state(),
        &InteractionState::TypeSelected(ComponentType::Capacitor)
    );

    let later = diagram
        .handle_click(PointerEvent::new(200.0, 40.0, 1200))
        .await;
    assert_eq!(later, ClickOutcome::Placed(2));
    assert_eq!(diagram.len(), 2);
}

#[tokio::test]
async fn test_duplicate_commit_click_does_not_select() {
    let mut diagram = diagram();
    let id = place(&mut diagram, ComponentType::Resistor, 103.0, 58.0, 1000).await;
    assert_eq!(diagram.state(), &InteractionState::Idle);

    let duplicate = diagram
        .handle_click(PointerEvent::new(103.0, 58.0, 1010))
        .await;
    assert_eq!(duplicate, ClickOutcome::Ignored);
    assert_eq!(diagram.selected(), None);
    assert!(!diagram.instance(id).unwrap().is_selected());

    let later = diagram
        .handle_click(PointerEvent::new(103.0, 58.0, 1500))
        .await;
    assert_eq!(later, ClickOutcome::Selected(id));
}

#[tokio::test]
async fn test_idle_click_selects_topmost() {
    let mut diagram = diagram();
    let below = place(&mut diagram, ComponentType::Resistor, 100.0, 60.0, 1000).await;
    let above = place(&mut diagram, ComponentType::Inductor, 120.0, 60.0, 2000).await;

    let outcome = diagram
        .handle_click(PointerEvent::new(110.0, 60.0, 3000))
        .await;
    assert_eq!(outcome, ClickOutcome::Selected(above));
    assert!(diagram.instance(above).unwrap().is_selected());
    assert!(!diagram.instance(below).unwrap().is_selected());

    let outcome = diagram
        .handle_click(PointerEvent::new(600.0, 600.0, 4000))
        .await;
    assert_eq!(outcome, ClickOutcome::Deselected);
    assert_eq!(diagram.selected(), None);
    assert!(!diagram.instance(above).unwrap().is_selected());
}

#[tokio::test]
async fn test_drag_snaps_and_ends_on_release() {
    let mut diagram = diagram();
    let id = place(&mut diagram, ComponentType::Resistor, 100.0, 60.0, 1000).await;

    let down = diagram.handle_pointer_down(PointerEvent::new(100.0, 60.0, 2000));
    assert_eq!(down, ClickOutcome::DragStarted(id));
    assert_eq!(diagram.selected(), Some(id));

    diagram
        .handle_pointer_move(PointerEvent::new(143.0, 81.0, 2050))
        .await;
    assert_eq!(diagram.instance(id).unwrap().position(), Point::new(140.0, 80.0));

    assert!(diagram.handle_pointer_up(PointerEvent::new(143.0, 81.0, 2100)));
    assert_eq!(diagram.state(), &InteractionState::Idle);
    assert!(!diagram.handle_pointer_up(PointerEvent::new(143.0, 81.0, 2150)));
}

#[tokio::test]
async fn test_drag_keeps_grab_offset() {
    let mut diagram = diagram();
    let id = place(&mut diagram, ComponentType::Resistor, 100.0, 60.0, 1000).await;

    diagram.handle_pointer_down(PointerEvent::new(120.0, 60.0, 2000));
    diagram
        .handle_pointer_move(PointerEvent::new(220.0, 100.0, 2050))
        .await;
    assert_eq!(diagram.instance(id).unwrap().position(), Point::new(200.0, 100.0));
}

#[tokio::test]
async fn test_delete_handle_removes() {
    let mut diagram = diagram();
    let id = place(&mut diagram, ComponentType::Resistor, 100.0, 60.0, 1000).await;
    assert_eq!(
        diagram.instance(id).unwrap().delete_handle_position(),
        Point::new(140.0, 40.0)
    );

    let outcome = diagram.handle_pointer_down(PointerEvent::new(140.0, 40.0, 2000));
    assert_eq!(outcome, ClickOutcome::Removed(id));
    assert!(diagram.is_empty());
    assert_eq!(diagram.canvas().live_handle_count(), 0);
    assert_eq!(diagram.state(), &InteractionState::Idle);
}

#[tokio::test]
async fn test_upper_body_covers_lower_delete_handle() {
    let mut diagram = diagram();
    let lower = diagram
        .add_component(ComponentType::Resistor, Point::new(100.0, 60.0))
        .await
        .unwrap();
    let handle = diagram.instance(lower).unwrap().delete_handle_position();
    let upper = diagram
        .add_component(ComponentType::Inductor, handle)
        .await
        .unwrap();
    assert!(diagram.instance(upper).unwrap().contains(handle));

    let outcome = diagram.handle_pointer_down(PointerEvent::new(handle.x, handle.y, 1000));
    assert_eq!(outcome, ClickOutcome::DragStarted(upper));
    assert_eq!(diagram.len(), 2);
    assert_eq!(diagram.selected(), Some(upper));
}

#[tokio::test]
async fn test_shortcuts() {
    let mut diagram = diagram();
    let a = place(&mut diagram, ComponentType::Nmos, 100.0, 100.0, 1000).await;
    let b = place(&mut diagram, ComponentType::Pmos, 300.0, 100.0, 2000).await;

    assert_eq!(
        diagram.handle_key(&KeyEvent::new("r")).unwrap(),
        KeyOutcome::Unhandled
    );

    diagram.select(a);
    assert_eq!(
        diagram.handle_key(&KeyEvent::new("r")).unwrap(),
        KeyOutcome::Rotated(a, Rotation::from_degrees(90))
    );

    match diagram.handle_key(&KeyEvent::new("s").with_ctrl()).unwrap() {
        KeyOutcome::Exported(json) => {
            assert!(json.contains(r#""type": "nmos""#));
            assert!(json.contains(r#""type": "pmos""#));
        }
        other => panic!("expected export, got {:?}", other),
    }

    assert_eq!(
        diagram.handle_key(&KeyEvent::new("Delete")).unwrap(),
        KeyOutcome::Deleted(a)
    );
    assert_eq!(diagram.len(), 1);

    diagram.select(b);
    assert!(diagram.arm(ComponentType::Resistor));
    assert_eq!(
        diagram.handle_key(&KeyEvent::new("Escape")).unwrap(),
        KeyOutcome::Deselected
    );
    assert_eq!(diagram.selected(), None);
    assert_eq!(diagram.state(), &InteractionState::Idle);
    assert_eq!(
        diagram.handle_key(&KeyEvent::new("q")).unwrap(),
        KeyOutcome::Unhandled
    );
}

#[tokio::test]
async fn test_shortcut_overrides_from_config() {
    let mut config = Config::default();
    config
        .shortcuts
        .insert("rotate_selected".to_string(), "Shift+R".to_string());
    let mut diagram = diagram_with(&config);
    let id = place(&mut diagram, ComponentType::Inductor, 100.0, 60.0, 1000).await;
    diagram.select(id);

    assert_eq!(
        diagram.handle_key(&KeyEvent::new("r")).unwrap(),
        KeyOutcome::Unhandled
    );
    assert_eq!(
        diagram.handle_key(&KeyEvent::new("R").with_shift()).unwrap(),
        KeyOutcome::Rotated(id, Rotation::from_degrees(90))
    );
}

#[tokio::test]
async fn test_grid_change_only_affects_new_placements() {
    let mut diagram = diagram();
    let first = place(&mut diagram, ComponentType::Resistor, 103.0, 58.0, 1000).await;

    assert!(diagram.set_grid_cell_size(25.0));
    assert!(!diagram.set_grid_cell_size(0.0));
    assert_eq!(diagram.canvas().grid().cell_size(), 25.0);
    assert_eq!(
        diagram.instance(first).unwrap().position(),
        Point::new(100.0, 60.0)
    );

    let second = place(&mut diagram, ComponentType::Resistor, 103.0, 58.0, 2000).await;
    assert_eq!(
        diagram.instance(second).unwrap().position(),
        Point::new(100.0, 50.0)
    );
}

#[tokio::test]
async fn test_preview_follows_grid_change() {
    let mut diagram = diagram();
    assert!(diagram.arm(ComponentType::Resistor));
    diagram
        .handle_pointer_move(PointerEvent::new(103.0, 58.0, 1000))
        .await;
    assert_eq!(diagram.preview().cell_size(), Some(20.0));

    assert!(diagram.set_grid_cell_size(40.0));
    diagram
        .handle_pointer_move(PointerEvent::new(103.0, 58.0, 1050))
        .await;
    assert_eq!(diagram.preview().cell_size(), Some(40.0));
    assert_eq!(diagram.canvas().overlay_layer().borrow().len(), 1);
    let ghost = diagram.canvas().overlay_layer().borrow().children()[0]
        .borrow()
        .to_svg_string();
    assert!(ghost.contains("scale(2)"));

    let id = match diagram
        .handle_click(PointerEvent::new(103.0, 58.0, 1100))
        .await
    {
        ClickOutcome::Placed(id) => id,
        other => panic!("expected placement, got {:?}", other),
    };
    let placed = diagram.instance(id).unwrap().visual().borrow().to_svg_string();
    assert!(placed.contains("scale(2)"));
}

#[tokio::test]
async fn test_export_shortcut_writes_layout_file() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.export_directory = Some(temp.path().to_path_buf());
    let mut diagram = diagram_with(&config);
    place(&mut diagram, ComponentType::Capacitor, 60.0, 60.0, 1000).await;

    let json = match diagram.handle_key(&KeyEvent::new("s").with_ctrl()).unwrap() {
        KeyOutcome::Exported(json) => json,
        other => panic!("expected export, got {:?}", other),
    };
    let written = std::fs::read_to_string(temp.path().join(SNAPSHOT_FILE_NAME)).unwrap();
    assert_eq!(written, json);
}

#[tokio::test]
async fn test_arm_unregistered_type() {
    let mut diagram = diagram();
    diagram.renderer_mut().unregister(ComponentType::Pmos);
    assert!(!diagram.arm(ComponentType::Pmos));
    assert_eq!(diagram.state(), &InteractionState::Idle);
    assert_eq!(
        diagram
            .add_component(ComponentType::Pmos, Point::new(40.0, 40.0))
            .await,
        None
    );
}

#[test]
fn test_invalid_canvas_is_rejected() {
    let mut config = Config::default();
    config.canvas.width = 0.0;
    let loader = Arc::new(AssetLoader::new(MemoryAssetSource::new()));
    let err = Diagram::from_config(&config, loader).unwrap_err();
    assert!(matches!(err, Error::MissingCanvas(_)));
}

#[tokio::test]
async fn test_ids_are_monotonic_until_clear() {
    let mut diagram = diagram();
    let a = diagram
        .add_component(ComponentType::Resistor, Point::new(40.0, 40.0))
        .await
        .unwrap();
    let b = diagram
        .add_component(ComponentType::Resistor, Point::new(200.0, 40.0))
        .await
        .unwrap();
    assert!(diagram.remove_component(b));
    assert!(!diagram.remove_component(b));

    let c = diagram
        .add_component(ComponentType::Resistor, Point::new(200.0, 40.0))
        .await
        .unwrap();
    assert_eq!((a, b, c), (1, 2, 3));

    diagram.clear();
    let d = diagram
        .add_component(ComponentType::Capacitor, Point::new(40.0, 40.0))
        .await
        .unwrap();
    assert_eq!(d, 1);
}

#[tokio::test]
async fn test_presets_round_trip() {
    let mut diagram = diagram();
    let mut library = PresetLibrary::open(MemoryStore::new());
    let id = diagram
        .add_component(ComponentType::Nmos, Point::new(100.0, 100.0))
        .await
        .unwrap();
    diagram.rotate_component(id);
    diagram.set_label(id, Some("M1".to_string()));

    assert!(diagram.save_preset(&mut library, "driver", id).unwrap());
    assert!(!diagram.save_preset(&mut library, "ghost", 99).unwrap());
    assert_eq!(library.names(), vec!["driver"]);

    let copy = diagram
        .add_from_preset(&library, "driver", Some(Point::new(300.0, 100.0)))
        .await
        .unwrap();
    let placed = diagram.instance(copy).unwrap();
    assert_eq!(placed.component_type(), ComponentType::Nmos);
    assert_eq!(placed.position(), Point::new(300.0, 100.0));
    assert_eq!(placed.rotation().degrees(), 90);
    assert_eq!(placed.label(), Some("M1"));

    assert_eq!(diagram.add_from_preset(&library, "missing", None).await, None);
}
