//! Owned SVG element tree.
//!
//! Symbol assets are parsed into [`SvgElement`] trees, filtered and rescaled by
//! the renderer, and mounted on the canvas. Every tree can be written back out
//! as SVG markup.

mod parser;

pub use parser::{parse_document, SvgDocument, SvgParseError, ViewBox};

use std::fmt::Write as _;

/// Elements that draw something.
pub const DRAWABLE_ELEMENTS: &[&str] = &[
    "path", "rect", "circle", "line", "polyline", "polygon", "ellipse", "text",
];

/// Elements that carry no geometry of their own and are dropped from symbols.
pub const NON_VISUAL_ELEMENTS: &[&str] = &[
    "metadata", "defs", "title", "desc", "style", "script", "namedview",
];

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

/// An SVG element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgElement {
    name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name as written, including any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name without namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`push_child`](Self::push_child).
    pub fn with_child(mut self, child: SvgElement) -> Self {
        self.push_child(child);
        self
    }

    /// Builder form of [`push_text`](Self::push_text).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses an attribute as a number, tolerating a trailing `px`.
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        let raw = self.attr(name)?.trim();
        raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        if kept.is_empty() {
            self.remove_attr("class");
        } else {
            let joined = kept.join(" ");
            self.set_attr("class", joined);
        }
    }

    pub fn push_child(&mut self, child: SvgElement) {
        self.children.push(SvgNode::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(SvgNode::Text(text.into()));
    }

    /// Direct element children.
    pub fn elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|c| match c {
            SvgNode::Element(e) => Some(e),
            SvgNode::Text(_) => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                SvgNode::Text(t) => Some(t.as_str()),
                SvgNode::Element(_) => None,
            })
            .collect()
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![SvgNode::Text(text.into())];
    }

    /// First direct child carrying `class`.
    pub fn child_with_class_mut(&mut self, class: &str) -> Option<&mut SvgElement> {
        self.children.iter_mut().find_map(|c| match c {
            SvgNode::Element(e) if e.has_class(class) => Some(e),
            _ => None,
        })
    }

    /// Removes direct children carrying `class`; returns how many were removed.
    pub fn remove_children_with_class(&mut self, class: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|c| !matches!(c, SvgNode::Element(e) if e.has_class(class)));
        before - self.children.len()
    }

    /// True for primitives that paint geometry.
    pub fn is_drawable(&self) -> bool {
        DRAWABLE_ELEMENTS.contains(&self.local_name())
    }

    pub fn is_non_visual(&self) -> bool {
        NON_VISUAL_ELEMENTS.contains(&self.local_name())
    }

    /// Number of drawable primitives in this subtree, including itself.
    pub fn drawable_count(&self) -> usize {
        let own = usize::from(self.is_drawable());
        own + self.elements().map(SvgElement::drawable_count).sum::<usize>()
    }

    /// Serializes the subtree as compact SVG markup.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Appends the subtree's markup to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(e) => e.write_to(out),
                SvgNode::Text(t) => out.push_str(&escape(t)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// Escapes text for use in markup and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a number for an attribute: integers without a fraction, others
/// trimmed to four decimals.
pub fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
