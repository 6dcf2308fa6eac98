//! Serializer / layout engine.
//!
//! Renders a node tree to HTML text. Layout is decided per element:
//! an element renders in **inline mode** when its own inline flag is set or
//! when every child is inline; otherwise children go on their own indented
//! lines (two spaces per level). Top-level sequences (fragments, template
//! output) join adjacent nodes with a newline unless both are inline.
//!
//! A renderer owns the cycle-detector set for one top-level invocation:
//! entering a content-bearing element whose identity is already on the
//! active path fails with [`WeaveError::CircularReference`]. Identities are
//! removed on the way out, so the same element may appear several times as
//! a sibling without tripping the detector.

use rustc_hash::FxHashSet;

use crate::attr::{AttrEntry, Attrs};
use crate::error::{WeaveError, WeaveResult};
use crate::node::{ContentView, Element, Node, NodeId};

// =============================================================================
// Renderer
// =============================================================================

/// One render invocation: output buffer plus the active-path identity set.
pub(crate) struct Renderer {
    out: String,
    active: FxHashSet<NodeId>,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        Self {
            out: String::new(),
            active: FxHashSet::default(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    /// Write a single node at the given indent depth.
    pub(crate) fn write_node(&mut self, node: &Node, indent: usize) -> WeaveResult<()> {
        match node {
            Node::Element(elem) => self.write_element(elem, indent),
            Node::Text(text) => {
                if text.is_raw() {
                    self.out.push_str(text.content());
                } else {
                    self.out.push_str(&escape_html(text.content()));
                }
                Ok(())
            }
            Node::Resource(resource) => {
                let nodes = crate::template::resource_nodes(resource.kind());
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        self.newline_indent(indent);
                    }
                    self.write_node(node, indent)?;
                }
                Ok(())
            }
        }
    }

    /// Write a top-level sequence of sibling nodes.
    ///
    /// Adjacent nodes are separated by a newline unless both are inline.
    pub(crate) fn write_nodes(&mut self, nodes: &[Node], indent: usize) -> WeaveResult<()> {
        let mut prev_inline: Option<bool> = None;
        for node in nodes {
            if prev_inline.is_some_and(|prev| !(prev && node.is_inline())) {
                self.newline_indent(indent);
            }
            self.write_node(node, indent)?;
            prev_inline = Some(node.is_inline());
        }
        Ok(())
    }

    fn write_element(&mut self, elem: &Element, indent: usize) -> WeaveResult<()> {
        self.out.push('<');
        self.out.push_str(elem.tag());
        self.write_attrs(&elem.borrow_attrs());
        self.out.push('>');

        let children = match elem.content_view() {
            ContentView::Void { omit_end_tag } => {
                if !omit_end_tag {
                    self.out.push_str("</");
                    self.out.push_str(elem.tag());
                    self.out.push('>');
                }
                return Ok(());
            }
            ContentView::Children(children) => children,
        };

        let id = elem.id();
        if !self.active.insert(id) {
            return Err(WeaveError::CircularReference {
                tag: elem.tag().to_string(),
            });
        }
        let result = self.write_element_children(&children, elem.is_inline(), indent);
        drop(children);
        self.active.remove(&id);
        result?;

        self.out.push_str("</");
        self.out.push_str(elem.tag());
        self.out.push('>');
        Ok(())
    }

    fn write_element_children(
        &mut self,
        children: &[Node],
        own_inline: bool,
        indent: usize,
    ) -> WeaveResult<()> {
        let inline_mode = own_inline || children.iter().all(Node::is_inline);
        let first_child_is_block = children.first().is_some_and(|n| !n.is_inline());
        let mut indent_next = !inline_mode || first_child_is_block;

        for child in children {
            if indent_next || !child.is_inline() {
                self.newline_indent(indent + 1);
            }
            self.write_node(child, indent + 1)?;
            indent_next = !child.is_inline();
        }

        if !children.is_empty() && (indent_next || !inline_mode) {
            self.newline_indent(indent);
        }
        Ok(())
    }

    fn write_attrs(&mut self, attrs: &Attrs) {
        for (name, entry) in attrs.iter() {
            self.out.push(' ');
            self.out.push_str(name);
            if let AttrEntry::Value(value) = entry {
                self.out.push_str("=\"");
                self.out.push_str(&escape_attr(value));
                self.out.push('"');
            }
        }
    }

    fn newline_indent(&mut self, indent: usize) {
        self.out.push('\n');
        for _ in 0..indent {
            self.out.push_str("  ");
        }
    }
}

/// Render a top-level sequence of sibling nodes to a string.
pub fn render_nodes(nodes: &[Node]) -> WeaveResult<String> {
    let mut renderer = Renderer::new();
    renderer.write_nodes(nodes, 0)?;
    Ok(renderer.finish())
}

// =============================================================================
// Escaping
// =============================================================================

/// Escape text content (`&`, `<`, `>`; quotes stay).
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute values (`&`, `"`, `<`, `>`).
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
