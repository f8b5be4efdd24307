use std::sync::Arc;

use schemkit_core::{ComponentType, Point, Rotation};
use schemkit_designer::{AssetLoader, Diagram, MemoryAssetSource};
use schemkit_settings::{Config, PlacementArgs};

fn diagram() -> Diagram {
    let loader = Arc::new(AssetLoader::new(MemoryAssetSource::with_builtin_symbols()));
    Diagram::from_config(&Config::default(), loader).unwrap()
}

#[tokio::test]
async fn test_instance_side_remove_is_observed_immediately() {
    let mut diagram = diagram();
    let a = diagram
        .add_component(ComponentType::Resistor, Point::new(40.0, 40.0))
        .await
        .unwrap();
    let b = diagram
        .add_component(ComponentType::Capacitor, Point::new(200.0, 40.0))
        .await
        .unwrap();
    diagram.select(a);

    assert!(diagram.instance(a).unwrap().remove());

    assert_eq!(diagram.len(), 1);
    assert_eq!(diagram.canvas().live_handle_count(), 1);
    assert!(diagram.instance(a).is_none());
    assert_eq!(diagram.selected(), None);
    let exported = diagram.export_snapshot();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].id, b);

    assert_eq!(diagram.process_events(), 1);
    assert_eq!(diagram.process_events(), 0);
    assert_eq!(diagram.len(), 1);
}

#[tokio::test]
async fn test_rotate_four_times_is_identity() {
    let mut diagram = diagram();
    let id = diagram
        .add_component(ComponentType::Nmos, Point::new(60.0, 80.0))
        .await
        .unwrap();

    let seen: Vec<u16> = (0..4)
        .map(|_| diagram.rotate_component(id).unwrap().degrees())
        .collect();
    assert_eq!(seen, vec![90, 180, 270, 0]);

    let instance = diagram.instance(id).unwrap();
    assert_eq!(instance.rotation(), Rotation::ZERO);
    assert_eq!(
        instance.visual().borrow().attr("transform"),
        Some("translate(60, 80) rotate(0)")
    );
}

#[tokio::test]
async fn test_move_does_not_rerender() {
    let mut diagram = diagram();
    let id = diagram
        .add_component(ComponentType::Inductor, Point::new(40.0, 40.0))
        .await
        .unwrap();
    let visual = diagram.instance(id).unwrap().visual();
    let templates = diagram.renderer().cached_templates();

    assert!(diagram.move_component(id, Point::new(80.0, 120.0)));
    let after = diagram.instance(id).unwrap().visual();
    assert!(std::rc::Rc::ptr_eq(&visual, &after));
    assert_eq!(diagram.renderer().cached_templates(), templates);
    assert_eq!(
        after.borrow().attr("transform"),
        Some("translate(80, 120) rotate(0)")
    );
}

#[tokio::test]
async fn test_label_round_trips_through_visual() {
    let mut diagram = diagram();
    let id = diagram
        .add_component_with(
            PlacementArgs::new(ComponentType::Pmos, Point::new(100.0, 100.0)).with_label("M2"),
        )
        .await
        .unwrap();
    assert!(diagram.to_svg().contains(r#"class="component-label""#));
    assert_eq!(diagram.instance(id).unwrap().label(), Some("M2"));

    assert!(diagram.set_label(id, None));
    assert!(!diagram.to_svg().contains("component-label"));
    assert!(diagram.export_snapshot()[0].label.is_none());
}

#[tokio::test]
async fn test_bounds_follow_rotation() {
    let mut diagram = diagram();
    let id = diagram
        .add_component(ComponentType::Resistor, Point::new(100.0, 60.0))
        .await
        .unwrap();
    assert_eq!(diagram.instance_at(Point::new(135.0, 60.0)), Some(id));

    diagram.rotate_component(id);
    assert_eq!(diagram.instance_at(Point::new(135.0, 60.0)), None);
    assert_eq!(diagram.instance_at(Point::new(100.0, 95.0)), Some(id));
}
