use std::path::PathBuf;
use std::sync::Arc;

use schemkit_core::{ComponentType, Point};
use schemkit_designer::{parse_document, AssetLoader, Diagram, MemoryAssetSource};
use schemkit_settings::Config;

fn diagram() -> Diagram {
    let loader = Arc::new(AssetLoader::new(MemoryAssetSource::with_builtin_symbols()));
    Diagram::from_config(&Config::default(), loader).unwrap()
}

#[tokio::test]
async fn test_wrapper_markup() {
    let mut diagram = diagram();
    diagram
        .add_component(ComponentType::Resistor, Point::new(100.0, 60.0))
        .await
        .unwrap();

    let svg = diagram.to_svg();
    assert!(svg.contains(
        r#"<g class="component" data-id="1" data-type="resistor" transform="translate(100, 60) rotate(0)">"#
    ));
    assert!(svg.contains(r#"class="symbol symbol-resistor""#));
    assert!(svg.contains(r#"class="delete-handle""#));
    assert!(svg.contains(r#"<g id="instances">"#));
}

#[tokio::test]
async fn test_scene_reparses() {
    let mut diagram = diagram();
    for (i, ty) in ComponentType::ALL.into_iter().enumerate() {
        diagram
            .add_component(ty, Point::new(100.0 + 120.0 * i as f64, 100.0))
            .await
            .unwrap();
    }

    let doc = parse_document(&diagram.to_svg()).unwrap();
    assert_eq!(doc.root.local_name(), "svg");
    let native = doc.native_size();
    assert_eq!((native.width, native.height), (1200.0, 800.0));

    let instances = doc
        .root
        .elements()
        .find(|e| e.attr("id") == Some("instances"))
        .unwrap();
    assert_eq!(instances.elements().count(), ComponentType::ALL.len());
}

#[tokio::test]
async fn test_hidden_grid_has_no_backdrop() {
    let mut diagram = diagram();
    assert!(diagram.to_svg().contains(r#"class="grid""#));
    diagram.set_grid_visible(false);
    let svg = diagram.to_svg();
    assert!(!svg.contains(r#"class="grid""#));
    assert!(svg.contains(r#"<pattern id="grid""#));
}

#[test]
fn test_builtin_assets_parse() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/symbols");
    for ty in ComponentType::ALL {
        let path = dir.join(format!("{}.svg", ty.as_str()));
        let text = std::fs::read_to_string(&path).unwrap();
        let doc = parse_document(&text).unwrap();
        assert!(doc.root.drawable_count() > 0, "{} has nothing to draw", ty);
        assert!(doc.view_box.is_some(), "{} has no viewBox", ty);
    }
}
