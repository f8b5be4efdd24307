use std::sync::Arc;

use schemkit_core::{ComponentType, Size};
use schemkit_designer::{
    is_preview, AssetLoader, MemoryAssetSource, SymbolDefinition, SymbolRegistry, SymbolRenderer,
};

fn renderer_over(source: MemoryAssetSource) -> (SymbolRenderer, Arc<MemoryAssetSource>) {
    let source = Arc::new(source);
    let loader = Arc::new(AssetLoader::from_arc(source.clone()));
    (
        SymbolRenderer::new(SymbolRegistry::with_defaults(), loader),
        source,
    )
}

#[tokio::test]
async fn test_render_uses_template_cache() {
    let (mut renderer, source) = renderer_over(MemoryAssetSource::with_builtin_symbols());

    let first = renderer.render(ComponentType::Resistor, 20.0).await.unwrap();
    assert!(!first.is_fallback);
    assert_eq!(first.footprint, Size::new(80.0, 40.0));
    assert_eq!(first.element.attr("class"), Some("symbol symbol-resistor"));
    assert_eq!(renderer.cached_templates(), 1);

    let second = renderer.render(ComponentType::Resistor, 20.0).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(renderer.cached_templates(), 1);
    assert_eq!(source.fetch_count(), 1);

    let half = renderer.render(ComponentType::Resistor, 10.0).await.unwrap();
    assert_eq!(half.footprint, Size::new(40.0, 20.0));
    assert_eq!(renderer.cached_templates(), 2);
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_rendered_symbol_has_no_metadata() {
    let (mut renderer, _) = renderer_over(MemoryAssetSource::with_builtin_symbols());
    for ty in ComponentType::ALL {
        let rendered = renderer.render(ty, 20.0).await.unwrap();
        let markup = rendered.element.to_svg_string();
        for tag in ["<title", "<metadata", "<defs", "<desc", "<style"] {
            assert!(!markup.contains(tag), "{} kept {}", ty, tag);
        }
        assert!(rendered.element.drawable_count() > 0);
    }
}

#[tokio::test]
async fn test_missing_asset_falls_back_without_caching() {
    let mut source = MemoryAssetSource::with_builtin_symbols();
    source.remove("symbols/nmos.svg");
    let (mut renderer, source) = renderer_over(source);

    let rendered = renderer.render(ComponentType::Nmos, 20.0).await.unwrap();
    assert!(rendered.is_fallback);
    assert_eq!(rendered.footprint, Size::new(60.0, 80.0));
    assert!(rendered.element.to_svg_string().contains(">NMOS</text>"));
    assert_eq!(renderer.cached_templates(), 0);

    renderer.render(ComponentType::Nmos, 20.0).await.unwrap();
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_asset_without_drawables_falls_back() {
    let source = MemoryAssetSource::new().with_asset(
        "symbols/capacitor.svg",
        r#"<svg viewBox="0 0 40 60"><title>nothing</title><metadata/></svg>"#,
    );
    let (mut renderer, _) = renderer_over(source);

    let rendered = renderer.render(ComponentType::Capacitor, 20.0).await.unwrap();
    assert!(rendered.is_fallback);
    assert!(rendered.element.to_svg_string().contains(">Capacitor</text>"));
}

#[tokio::test]
async fn test_tiny_asset_scale_is_capped() {
    let source = MemoryAssetSource::new().with_asset(
        "symbols/resistor.svg",
        r#"<svg viewBox="0 0 2 1"><path d="M0 0.5 H2"/></svg>"#,
    );
    let (mut renderer, _) = renderer_over(source);

    let rendered = renderer.render(ComponentType::Resistor, 20.0).await.unwrap();
    assert_eq!(rendered.footprint, Size::new(8.0, 4.0));
    assert_eq!(
        rendered.element.attr("transform"),
        Some("translate(-4, -2) scale(4)")
    );
}

#[tokio::test]
async fn test_unregistered_type_renders_nothing() {
    let (mut renderer, _) = renderer_over(MemoryAssetSource::with_builtin_symbols());
    assert!(renderer.unregister(ComponentType::Pmos).is_some());
    assert!(renderer.render(ComponentType::Pmos, 20.0).await.is_none());
    assert!(renderer.render_preview(ComponentType::Pmos, 20.0).await.is_none());
}

#[tokio::test]
async fn test_preview_is_tagged_and_template_untouched() {
    let (mut renderer, _) = renderer_over(MemoryAssetSource::with_builtin_symbols());

    let preview = renderer
        .render_preview(ComponentType::Inductor, 20.0)
        .await
        .unwrap();
    assert!(is_preview(&preview.element));
    assert!(preview.element.has_class("symbol-preview"));
    assert_eq!(preview.element.attr("data-preview"), Some("true"));
    assert_eq!(preview.element.attr("opacity"), Some("0.5"));

    let normal = renderer.render(ComponentType::Inductor, 20.0).await.unwrap();
    assert!(!is_preview(&normal.element));
    assert_eq!(normal.element.attr("opacity"), None);
}

#[tokio::test]
async fn test_register_invalidates_type_templates() {
    let (mut renderer, _) = renderer_over(MemoryAssetSource::with_builtin_symbols());
    renderer.render(ComponentType::Resistor, 20.0).await.unwrap();
    renderer.render(ComponentType::Inductor, 20.0).await.unwrap();
    assert_eq!(renderer.cached_templates(), 2);

    renderer.register(SymbolDefinition::new(
        ComponentType::Resistor,
        "Resistor",
        "symbols/resistor.svg",
        Size::new(8.0, 4.0),
    ));
    assert_eq!(renderer.cached_templates(), 1);

    let bigger = renderer.render(ComponentType::Resistor, 20.0).await.unwrap();
    assert_eq!(bigger.footprint, Size::new(160.0, 80.0));
}
