//! Symbol renderer.
//!
//! Turns a registered [`ComponentType`] into a displayable SVG group:
//!
//! 1. look up the [`SymbolDefinition`] in the registry
//! 2. load the vector asset through the shared [`AssetLoader`]
//! 3. scale it to the definition's footprint on the current grid
//! 4. copy the drawable primitives into a fresh group centred on the origin
//!
//! Built groups are cached as templates keyed by `(type, scale)`; every render
//! hands out an independent copy. When the asset cannot be loaded, or has
//! nothing to draw, a labelled placeholder rectangle is produced instead.

use std::collections::HashMap;
use std::sync::Arc;

use schemkit_core::constants::{MAX_RENDER_SCALE, PREVIEW_CLASS, PREVIEW_OPACITY};
use schemkit_core::{ComponentType, Size};

use crate::assets::AssetLoader;
use crate::registry::{SymbolDefinition, SymbolRegistry};
use crate::svg::{fmt_num, SvgDocument, SvgElement, SvgNode};

/// Presentation attributes inherited from the asset's root `<svg>`.
const INHERITED_ATTRS: &[&str] = &[
    "fill",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
];

/// Cache key for built symbol templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub component_type: ComponentType,
    scale_bits: u64,
}

impl TemplateKey {
    pub fn new(component_type: ComponentType, scale: f64) -> Self {
        Self {
            component_type,
            scale_bits: scale.to_bits(),
        }
    }

    pub fn scale(&self) -> f64 {
        f64::from_bits(self.scale_bits)
    }
}

/// Output of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSymbol {
    pub element: SvgElement,
    /// Size of the drawn symbol in canvas units, before rotation.
    pub footprint: Size,
    pub is_fallback: bool,
}

/// Uniform scale fitting `native` inside `target`, capped at
/// [`MAX_RENDER_SCALE`]. Degenerate sizes yield 1.0.
pub fn compute_scale(native: Size, target: Size) -> f64 {
    if !native.is_valid() || !target.is_valid() {
        return 1.0;
    }
    let scale = (target.width / native.width).min(target.height / native.height);
    scale.min(MAX_RENDER_SCALE)
}

/// Builds a symbol group from a parsed asset.
///
/// Non-visual elements are dropped and the group is transformed so that the
/// symbol's centre sits on the origin. Returns `None` when nothing drawable
/// remains.
pub fn build(component_type: ComponentType, doc: &SvgDocument, scale: f64) -> Option<SvgElement> {
    let native = doc.native_size();
    let (min_x, min_y) = doc.origin();

    let mut group = SvgElement::new("g").with_attr(
        "class",
        format!("symbol symbol-{}", component_type.as_str()),
    );

    let mut transform = format!(
        "translate({}, {}) scale({})",
        fmt_num(-native.width * scale / 2.0),
        fmt_num(-native.height * scale / 2.0),
        fmt_num(scale)
    );
    if min_x != 0.0 || min_y != 0.0 {
        transform.push_str(&format!(
            " translate({}, {})",
            fmt_num(-min_x),
            fmt_num(-min_y)
        ));
    }
    group.set_attr("transform", transform);

    for name in INHERITED_ATTRS {
        if let Some(value) = doc.root.attr(name) {
            group.set_attr(name, value);
        }
    }

    for child in doc.root.elements() {
        if let Some(copy) = copy_visual(child) {
            group.push_child(copy);
        }
    }

    if group.drawable_count() == 0 {
        return None;
    }
    Some(group)
}

/// Deep copy of `element` without non-visual descendants.
fn copy_visual(element: &SvgElement) -> Option<SvgElement> {
    if element.is_non_visual() {
        return None;
    }
    let is_group = element.local_name() == "g";
    if !is_group && !element.is_drawable() {
        return None;
    }

    let mut copy = SvgElement::new(element.name());
    for (k, v) in element.attrs() {
        copy.set_attr(k, v);
    }
    for child in &element.children {
        match child {
            SvgNode::Element(e) if is_group => {
                if let Some(c) = copy_visual(e) {
                    copy.push_child(c);
                }
            }
            SvgNode::Element(e) => {
                if !e.is_non_visual() {
                    copy.push_child(e.clone());
                }
            }
            SvgNode::Text(t) => {
                if !is_group {
                    copy.push_text(t.clone());
                }
            }
        }
    }

    if is_group && copy.drawable_count() == 0 {
        return None;
    }
    Some(copy)
}

/// Placeholder symbol: a dashed rectangle of `footprint` centred on the
/// origin, labelled with `display_name`.
pub fn build_fallback(display_name: &str, footprint: Size) -> SvgElement {
    let size = if footprint.is_valid() {
        footprint
    } else {
        Size::new(40.0, 40.0)
    };
    let font_size = (size.height / 3.0).clamp(8.0, 14.0);

    SvgElement::new("g")
        .with_attr("class", "symbol symbol-fallback")
        .with_child(
            SvgElement::new("rect")
                .with_attr("x", fmt_num(-size.width / 2.0))
                .with_attr("y", fmt_num(-size.height / 2.0))
                .with_attr("width", fmt_num(size.width))
                .with_attr("height", fmt_num(size.height))
                .with_attr("fill", "#fafafa")
                .with_attr("stroke", "#888")
                .with_attr("stroke-dasharray", "4 2"),
        )
        .with_child(
            SvgElement::new("text")
                .with_attr("x", 0)
                .with_attr("y", 0)
                .with_attr("text-anchor", "middle")
                .with_attr("dominant-baseline", "central")
                .with_attr("font-size", fmt_num(font_size))
                .with_text(display_name),
        )
}

/// True when `element` carries the preview marker.
pub fn is_preview(element: &SvgElement) -> bool {
    element.has_class(PREVIEW_CLASS) || element.attr("data-preview") == Some("true")
}

/// Renders symbols through the registry, asset loader and template cache.
#[derive(Debug)]
pub struct SymbolRenderer {
    registry: SymbolRegistry,
    loader: Arc<AssetLoader>,
    templates: HashMap<TemplateKey, SvgElement>,
    preview_opacity: f64,
}

impl SymbolRenderer {
    pub fn new(registry: SymbolRegistry, loader: Arc<AssetLoader>) -> Self {
        Self {
            registry,
            loader,
            templates: HashMap::new(),
            preview_opacity: PREVIEW_OPACITY,
        }
    }

    pub fn with_preview_opacity(mut self, opacity: f64) -> Self {
        self.preview_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn loader(&self) -> &Arc<AssetLoader> {
        &self.loader
    }

    /// Registers a definition and drops cached templates for its type.
    pub fn register(&mut self, definition: SymbolDefinition) {
        let ty = definition.component_type;
        self.registry.register(definition);
        self.invalidate(ty);
    }

    pub fn unregister(&mut self, component_type: ComponentType) -> Option<SymbolDefinition> {
        self.invalidate(component_type);
        self.registry.unregister(component_type)
    }

    fn invalidate(&mut self, component_type: ComponentType) {
        self.templates
            .retain(|key, _| key.component_type != component_type);
    }

    pub fn clear_cache(&mut self) {
        self.templates.clear();
    }

    /// Number of cached templates.
    pub fn cached_templates(&self) -> usize {
        self.templates.len()
    }

    /// Renders `component_type` for a grid of `cell_size`.
    ///
    /// Returns `None` only when the type is not registered.
    pub async fn render(
        &mut self,
        component_type: ComponentType,
        cell_size: f64,
    ) -> Option<RenderedSymbol> {
        let definition = self.registry.get(component_type)?.clone();
        let target = definition.footprint(cell_size);

        let doc = match self.loader.load(&definition.asset_path).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Using placeholder for {}: {}", component_type, e);
                return Some(Self::fallback(&definition, target));
            }
        };

        let native = doc.native_size();
        let scale = compute_scale(native, target);
        let key = TemplateKey::new(component_type, scale);
        let footprint = native.scaled(scale);

        if let Some(template) = self.templates.get(&key) {
            tracing::debug!("Template cache hit for {} at scale {}", component_type, scale);
            return Some(RenderedSymbol {
                element: template.clone(),
                footprint,
                is_fallback: false,
            });
        }

        match build(component_type, &doc, scale) {
            Some(template) => {
                tracing::debug!("Built template for {} at scale {}", component_type, scale);
                let element = template.clone();
                self.templates.insert(key, template);
                Some(RenderedSymbol {
                    element,
                    footprint,
                    is_fallback: false,
                })
            }
            None => {
                tracing::warn!(
                    "Asset {} has no drawable elements, using placeholder",
                    definition.asset_path
                );
                Some(Self::fallback(&definition, target))
            }
        }
    }

    /// Renders the translucent placement ghost of `component_type`.
    pub async fn render_preview(
        &mut self,
        component_type: ComponentType,
        cell_size: f64,
    ) -> Option<RenderedSymbol> {
        let mut rendered = self.render(component_type, cell_size).await?;
        rendered.element.add_class(PREVIEW_CLASS);
        rendered.element.set_attr("data-preview", "true");
        rendered
            .element
            .set_attr("opacity", fmt_num(self.preview_opacity));
        Some(rendered)
    }

    fn fallback(definition: &SymbolDefinition, target: Size) -> RenderedSymbol {
        RenderedSymbol {
            element: build_fallback(&definition.display_name, target),
            footprint: target,
            is_fallback: true,
        }
    }
}
