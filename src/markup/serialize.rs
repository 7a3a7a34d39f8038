//! Markup output: styled units for runs, and whole trees.
//!
//! Both paths write styled units through [`push_unit`] and escape text through
//! [`escape_text_to`], so a plain label and the same label re-read as markup
//! produce identical bytes.

use crate::{
    markup::{
        escape_text_to,
        parse::VOID_ELEMENTS,
        tree::{Attribute, Element, MarkupTree, NodeId, NodeKind},
    },
    policy::{FontPolicy, UnitSyntax},
    segment::Run,
};

/// Raw attribute of a styled unit: `(name, undecoded value)`.
pub(crate) fn unit_attribute(font: &str, unit: UnitSyntax) -> (&'static str, String) {
    let mut raw = String::with_capacity(font.len() + 16);
    match unit {
        UnitSyntax::Span => {
            raw.push_str("font-family: ");
            html_escape::encode_double_quoted_attribute_to_string(font, &mut raw);
            raw.push(';');
            ("style", raw)
        }
        UnitSyntax::FontFace => {
            html_escape::encode_double_quoted_attribute_to_string(font, &mut raw);
            ("face", raw)
        }
    }
}

#[inline]
pub(crate) fn unit_tag(unit: UnitSyntax) -> &'static str {
    match unit {
        UnitSyntax::Span => "span",
        UnitSyntax::FontFace => "font",
    }
}

/// Append one styled unit wrapping `text` in `font`.
pub fn push_unit(out: &mut String, text: &str, font: &str, unit: UnitSyntax) {
    let tag = unit_tag(unit);
    let (name, raw) = unit_attribute(font, unit);
    out.push('<');
    out.push_str(tag);
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&raw);
    out.push_str("\">");
    escape_text_to(text, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Serialize runs as consecutive styled units, in run order.
pub fn serialize_runs<'a, I>(runs: I, policy: &FontPolicy, unit: UnitSyntax) -> String
where
    I: IntoIterator<Item = Run<'a>>,
{
    let mut out = String::new();
    for run in runs {
        push_unit(&mut out, run.text, policy.font_for(run.class), unit);
    }
    out
}

impl MarkupTree {
    /// Serialize the whole fragment.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        // Explicit stack: nesting depth must not be limited by the call stack
        let mut steps: Vec<Step> = self
            .children(Self::ROOT)
            .iter()
            .rev()
            .map(|&id| Step::Open(id))
            .collect();

        while let Some(step) = steps.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(name) => {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                    continue;
                }
            };
            let node = self.node(id);
            match &node.kind {
                NodeKind::Root => {
                    steps.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
                }
                NodeKind::Text(text) => escape_text_to(text, &mut out),
                NodeKind::RawText(text) => out.push_str(text),
                NodeKind::Comment(body) => {
                    out.push_str("<!--");
                    out.push_str(body);
                    out.push_str("-->");
                }
                NodeKind::Declaration(body) => {
                    out.push_str("<!");
                    out.push_str(body);
                    out.push('>');
                }
                NodeKind::Element(element) => {
                    write_open_tag(element, &mut out);
                    if element.self_closing {
                        continue;
                    }
                    let is_void =
                        VOID_ELEMENTS.contains(element.name.to_ascii_lowercase().as_str());
                    if is_void && node.children.is_empty() {
                        continue;
                    }
                    steps.push(Step::Close(&element.name));
                    steps.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
                }
            }
        }
        out
    }
}

enum Step<'t> {
    Open(NodeId),
    Close(&'t str),
}

fn write_open_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attribute in &element.attributes {
        out.push(' ');
        write_attribute(attribute, out);
    }
    if element.self_closing {
        out.push('/');
    }
    out.push('>');
}

fn write_attribute(attribute: &Attribute, out: &mut String) {
    out.push_str(&attribute.name);
    let Some(raw) = &attribute.raw_value else {
        return;
    };
    out.push('=');
    match attribute.quote {
        Some(q) => {
            out.push(q);
            out.push_str(raw);
            out.push(q);
        }
        None => out.push_str(raw),
    }
}
