//! Tolerant SVG reader.
//!
//! Understands the subset of XML found in icon files: elements, quoted
//! attributes, text, comments, CDATA, processing instructions and a doctype.
//! Entity references are limited to the five predefined ones and numeric
//! character references.

use schemkit_core::constants::FALLBACK_NATIVE_SIZE;
use schemkit_core::Size;
use thiserror::Error;

use super::{SvgElement, SvgNode};

/// Reasons an SVG document could not be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("malformed markup at byte {0}")]
    Malformed(usize),

    #[error("mismatched closing tag </{found}> for <{expected}>")]
    MismatchedTag { expected: String, found: String },

    #[error("missing <svg> root element")]
    MissingRoot,
}

/// The `viewBox` of a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parses `"min-x min-y width height"`, comma or space separated.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<f64> = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        if parts.len() != 4 || parts[2] <= 0.0 || parts[3] <= 0.0 {
            return None;
        }
        Some(Self {
            min_x: parts[0],
            min_y: parts[1],
            width: parts[2],
            height: parts[3],
        })
    }
}

/// A parsed SVG file.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub root: SvgElement,
    pub view_box: Option<ViewBox>,
}

impl SvgDocument {
    /// Intrinsic size: the `viewBox` extent, else `width`/`height`, else the
    /// fallback size.
    pub fn native_size(&self) -> Size {
        if let Some(vb) = self.view_box {
            return Size::new(vb.width, vb.height);
        }
        let size = Size::new(
            self.root.attr_f64("width").unwrap_or(FALLBACK_NATIVE_SIZE),
            self.root.attr_f64("height").unwrap_or(FALLBACK_NATIVE_SIZE),
        );
        if size.is_valid() {
            size
        } else {
            Size::new(FALLBACK_NATIVE_SIZE, FALLBACK_NATIVE_SIZE)
        }
    }

    /// Top-left corner of the user coordinate system.
    pub fn origin(&self) -> (f64, f64) {
        self.view_box.map_or((0.0, 0.0), |vb| (vb.min_x, vb.min_y))
    }
}

/// Parses SVG text into a document.
pub fn parse_document(input: &str) -> Result<SvgDocument, SvgParseError> {
    let root = Parser::new(input).parse()?;
    if root.local_name() != "svg" {
        return Err(SvgParseError::MissingRoot);
    }
    let view_box = root.attr("viewBox").and_then(ViewBox::parse);
    Ok(SvgDocument { root, view_box })
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_until(&mut self, terminator: &str) -> Result<&'a str, SvgParseError> {
        let rest = self.rest();
        let end = rest.find(terminator).ok_or(SvgParseError::UnexpectedEof)?;
        self.pos += end + terminator.len();
        Ok(&rest[..end])
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn parse(mut self) -> Result<SvgElement, SvgParseError> {
        // Open elements; the bottom entry collects top-level nodes.
        let mut stack: Vec<SvgElement> = vec![SvgElement::new("#document")];

        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.pos += 4;
                self.skip_until("-->")?;
            } else if rest.starts_with("<![CDATA[") {
                self.pos += 9;
                let text = self.skip_until("]]>")?;
                if let Some(top) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        top.push_text(text);
                    }
                }
            } else if rest.starts_with("<?") || rest.starts_with("<!") {
                self.skip_until(">")?;
            } else if rest.starts_with("</") {
                self.pos += 2;
                let name = self.skip_until(">")?.trim().to_string();
                if stack.len() < 2 {
                    return Err(SvgParseError::Malformed(self.pos));
                }
                let element = stack.pop().ok_or(SvgParseError::UnexpectedEof)?;
                if element.name() != name {
                    return Err(SvgParseError::MismatchedTag {
                        expected: element.name().to_string(),
                        found: name,
                    });
                }
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(SvgNode::Element(element));
                }
            } else if rest.starts_with('<') {
                let (element, self_closing) = self.parse_start_tag()?;
                if self_closing {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(SvgNode::Element(element));
                    }
                } else {
                    stack.push(element);
                }
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                let text = &rest[..end];
                self.pos += end;
                if !text.trim().is_empty() {
                    if let Some(top) = stack.last_mut() {
                        top.push_text(decode_entities(text.trim()));
                    }
                }
            }
        }

        if stack.len() != 1 {
            return Err(SvgParseError::UnexpectedEof);
        }
        let document = stack.pop().ok_or(SvgParseError::UnexpectedEof)?;
        document
            .children
            .into_iter()
            .find_map(|c| match c {
                SvgNode::Element(e) => Some(e),
                SvgNode::Text(_) => None,
            })
            .ok_or(SvgParseError::MissingRoot)
    }

    /// Parses `<name attr="v" ...>` or `<name .../>`; `self.pos` is on `<`.
    fn parse_start_tag(&mut self) -> Result<(SvgElement, bool), SvgParseError> {
        self.pos += 1;
        let name_len = self
            .rest()
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .ok_or(SvgParseError::UnexpectedEof)?;
        if name_len == 0 {
            return Err(SvgParseError::Malformed(self.pos));
        }
        let mut element = SvgElement::new(&self.rest()[..name_len]);
        self.pos += name_len;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((element, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((element, false));
            }
            if rest.is_empty() {
                return Err(SvgParseError::UnexpectedEof);
            }

            let eq = rest.find('=').ok_or(SvgParseError::Malformed(self.pos))?;
            let key = rest[..eq].trim();
            if key.is_empty() || key.contains(|c: char| c.is_whitespace() || c == '>') {
                return Err(SvgParseError::Malformed(self.pos));
            }
            self.pos += eq + 1;
            self.skip_whitespace();

            let quote = self
                .rest()
                .chars()
                .next()
                .ok_or(SvgParseError::UnexpectedEof)?;
            if quote != '"' && quote != '\'' {
                return Err(SvgParseError::Malformed(self.pos));
            }
            self.pos += 1;
            let value = self.skip_until(if quote == '"' { "\"" } else { "'" })?;
            element.set_attr(key, decode_entities(value));
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
