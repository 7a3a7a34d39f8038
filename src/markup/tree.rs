//! Arena-backed markup tree.
//!
//! Nodes live in one `Vec` and refer to their children by [`NodeId`]. Node 0 is
//! a synthetic root holding the top-level fragment. Rewrites never splice a
//! child list while walking it; they build a replacement list and swap it in.

use crate::markup::{ParseError, parse::Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An attribute exactly as written, so it can be re-emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Undecoded value; `None` for a bare attribute like `disabled`.
    pub raw_value: Option<String>,
    /// `'"'`, `'\''`, or `None` when the value was unquoted.
    pub quote: Option<char>,
}

impl Attribute {
    /// Value with character references decoded.
    pub fn value(&self) -> Option<std::borrow::Cow<'_, str>> {
        self.raw_value.as_deref().map(crate::markup::decode_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source.
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Written as `<name ... />`.
    pub self_closing: bool,
}

impl Element {
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(Element),
    /// Decoded character data.
    Text(String),
    /// `script`/`style` content, kept verbatim.
    RawText(String),
    /// Body of `<!-- ... -->`.
    Comment(String),
    /// Body of `<!...>`, e.g. `DOCTYPE html`.
    Declaration(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

impl Node {
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTree {
    nodes: Vec<Node>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                children: Vec::new(),
            }],
        }
    }

    /// Parse a markup fragment. Either the whole input parses or no tree is
    /// produced.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::new(input).run()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        id
    }

    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Swap in a new child list for `parent`, returning the old one.
    #[inline]
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<NodeId>) -> Vec<NodeId> {
        std::mem::replace(&mut self.nodes[parent.0].children, children)
    }

    /// Concatenated text content below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match &node.kind {
                NodeKind::Text(text) | NodeKind::RawText(text) => out.push_str(text),
                NodeKind::Root | NodeKind::Element(_) => {
                    stack.extend(node.children.iter().rev());
                }
                NodeKind::Comment(_) | NodeKind::Declaration(_) => {}
            }
        }
        out
    }
}
