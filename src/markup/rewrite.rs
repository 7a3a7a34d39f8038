//! Markup-tree rewriter – wraps every text node's runs in styled units.
//!
//! Idempotence comes from re-deriving, never from skipping: before a child
//! list is rewritten, every *managed unit* in it (an element shaped exactly like
//! the units this crate emits, naming one of the policy fonts) is unwrapped
//! back to its text, adjacent text is merged, and the merged text is segmented
//! afresh. A second rewrite therefore sees the same text the first one did
//! and emits the same units.
//!
//! Everything else is left as found: element names and attributes, comments,
//! declarations, raw `script`/`style` text, and whitespace-only text.
//!
//! Note that the unit shape is recognised by form, not by origin. A
//! hand-written `<span style="font-family: SimSun">Hello</span>` naming a
//! policy font is indistinguishable from an emitted unit, so it is unwrapped
//! and `Hello` comes back in the Latin font. To pin a font on purpose, use a
//! font outside the policy or add any second declaration or attribute; such
//! elements are kept as ancestors and units are nested inside them.

use smallvec::SmallVec;

use crate::{
    markup::{
        serialize::{unit_attribute, unit_tag},
        tree::{Attribute, Element, MarkupTree, NodeId, NodeKind},
    },
    policy::{FontPolicy, UnitSyntax},
    segment::segment,
    unicode::{ScriptClass, is_blank},
};

/// Rewrite every text node of `tree` into font-styled units. Returns the same
/// tree for chaining.
pub fn rewrite<'t>(
    tree: &'t mut MarkupTree,
    policy: &FontPolicy,
    unit: UnitSyntax,
) -> &'t mut MarkupTree {
    rewrite_children(tree, MarkupTree::ROOT, policy, unit);
    tree
}

// Each element's child list is rewritten independently, so elements are
// queued on an explicit stack instead of recursing; nesting depth is bounded
// only by memory.
fn rewrite_children(tree: &mut MarkupTree, root: NodeId, policy: &FontPolicy, unit: UnitSyntax) {
    let mut pending = vec![root];
    while let Some(parent) = pending.pop() {
        let old = tree.replace_children(parent, Vec::new());
        let flat = unwrap_managed(tree, old, policy);

        let mut rewritten = Vec::with_capacity(flat.len());
        for id in flat {
            match &tree.node(id).kind {
                NodeKind::Text(text) if !is_blank(text) => {
                    let runs: SmallVec<[(String, ScriptClass); 4]> = segment(text)
                        .map(|run| (run.text.to_owned(), run.class))
                        .collect();
                    for (text, class) in runs {
                        rewritten.push(alloc_unit(tree, text, policy.font_for(class), unit));
                    }
                }
                NodeKind::Element(_) => {
                    pending.push(id);
                    rewritten.push(id);
                }
                _ => rewritten.push(id),
            }
        }

        tree.replace_children(parent, rewritten);
    }
}

/// Replace managed units by their text and merge adjacent text nodes.
fn unwrap_managed(
    tree: &mut MarkupTree,
    children: Vec<NodeId>,
    policy: &FontPolicy,
) -> Vec<NodeId> {
    let mut flat: Vec<NodeId> = Vec::with_capacity(children.len());
    for child in children {
        let id = managed_text(tree, child, policy).unwrap_or(child);

        let text = tree.node(id).as_text().map(str::to_owned);
        let previous = flat.last().copied();
        if let (Some(text), Some(prev)) = (text, previous) {
            if let NodeKind::Text(prev_text) = &mut tree.node_mut(prev).kind {
                prev_text.push_str(&text);
                continue;
            }
        }
        flat.push(id);
    }
    flat
}

/// If `id` is a managed unit, the id of its single text child.
fn managed_text(tree: &MarkupTree, id: NodeId, policy: &FontPolicy) -> Option<NodeId> {
    let node = tree.node(id);
    let element = node.as_element()?;
    if element.self_closing || element.attributes.len() != 1 {
        return None;
    }
    let &[child] = node.children.as_slice() else {
        return None;
    };
    tree.node(child).as_text()?;

    let attribute = &element.attributes[0];
    let family = if element.is("span") && attribute.name.eq_ignore_ascii_case("style") {
        single_font_family(&attribute.value()?)?
    } else if element.is("font") && attribute.name.eq_ignore_ascii_case("face") {
        unquote(attribute.value()?.trim()).to_owned()
    } else {
        return None;
    };

    policy.is_policy_font(&family).then_some(child)
}

/// The family of a style declaration list consisting of exactly one
/// `font-family` declaration.
fn single_font_family(style: &str) -> Option<String> {
    let mut declarations = style.split(';').map(str::trim).filter(|d| !d.is_empty());
    let declaration = declarations.next()?;
    if declarations.next().is_some() {
        return None;
    }
    let (property, value) = declaration.split_once(':')?;
    if !property.trim().eq_ignore_ascii_case("font-family") {
        return None;
    }
    Some(unquote(value.trim()).to_owned())
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

/// Allocate a detached styled unit holding `text`.
fn alloc_unit(tree: &mut MarkupTree, text: String, font: &str, unit: UnitSyntax) -> NodeId {
    let (name, raw) = unit_attribute(font, unit);
    let element = Element {
        name: unit_tag(unit).to_owned(),
        attributes: vec![Attribute {
            name: name.to_owned(),
            raw_value: Some(raw),
            quote: Some('"'),
        }],
        self_closing: false,
    };
    let id = tree.alloc(NodeKind::Element(element));
    tree.append(id, NodeKind::Text(text));
    id
}
