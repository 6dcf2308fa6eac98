//! Node types for the build tree.
//!
//! A tree is made of three node shapes: [`Element`], [`Text`], and the
//! deferred [`Resource`](crate::template::Resource) placeholder. All of them
//! are cheap-clone `Rc`-backed handles; cloning never copies tree content,
//! it only hands out another reference to the same node identity.
//!
//! [`Content`] is the "child argument" type: anything that can be attached
//! to an element, either an already-built node or a lazy [`HasNodes`]
//! capability (fragments, components, user-defined providers).

mod element;
mod text;

pub use element::{Children, Element};
pub(crate) use element::ContentView;
pub use text::{Text, raw, text};

use std::rc::Rc;

use crate::error::WeaveResult;
use crate::render::Renderer;
use crate::template::Resource;

// =============================================================================
// NodeId
// =============================================================================

/// Identity of a node handle, derived from its shared allocation address.
///
/// Used for capture-scope bookkeeping and the render-time cycle detector;
/// never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        NodeId(Rc::as_ptr(rc) as *const () as usize)
    }
}

// =============================================================================
// Node
// =============================================================================

/// Node in a build tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element, content-bearing or void.
    Element(Element),
    /// A text node.
    Text(Text),
    /// A deferred style/script placeholder resolved at render time.
    Resource(Resource),
}

impl Node {
    /// Whether this node may share an output line with its siblings.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Element(e) => e.is_inline(),
            Node::Text(_) => true,
            Node::Resource(_) => false,
        }
    }

    /// Node identity for bookkeeping and cycle detection.
    pub fn id(&self) -> NodeId {
        match self {
            Node::Element(e) => e.id(),
            Node::Text(t) => t.id(),
            Node::Resource(r) => r.id(),
        }
    }

    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get as element reference.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as text reference.
    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Render this node to a string.
    pub fn render(&self) -> WeaveResult<String> {
        let mut renderer = Renderer::new();
        renderer.write_node(self, 0)?;
        Ok(renderer.finish())
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Node::Text(t)
    }
}

impl From<Resource> for Node {
    fn from(r: Resource) -> Self {
        Node::Resource(r)
    }
}

// =============================================================================
// HasNodes
// =============================================================================

/// Capability for objects that can contribute nodes as child content.
///
/// The core calls [`get_nodes`](HasNodes::get_nodes) exactly once per need
/// and does not cache the result; providers that want caching (components
/// do) implement it themselves.
pub trait HasNodes {
    /// Produce the contributed nodes, in order.
    fn get_nodes(&self) -> Vec<Node>;
}

// =============================================================================
// Content
// =============================================================================

/// Child content: an already-built node, or a lazy [`HasNodes`] capability
/// expanded once at attach time.
#[derive(Clone)]
pub enum Content {
    /// A single node.
    Node(Node),
    /// A lazy node provider; identity is the shared allocation address.
    Lazy(Rc<dyn HasNodes>),
}

impl Content {
    /// Wrap a shared [`HasNodes`] provider as lazy content.
    ///
    /// Identity follows the `Rc` allocation: pass clones of the same `Rc`
    /// when the claim/deregister bookkeeping needs to recognize the object.
    pub fn lazy(provider: Rc<dyn HasNodes>) -> Self {
        Content::Lazy(provider)
    }

    /// Identity used by capture-scope bookkeeping.
    pub fn id(&self) -> NodeId {
        match self {
            Content::Node(n) => n.id(),
            Content::Lazy(p) => NodeId::of(p),
        }
    }

    /// Expand into nodes, calling lazy providers exactly once.
    pub(crate) fn collect_into<E: Extend<Node>>(self, out: &mut E) {
        match self {
            Content::Node(n) => out.extend(std::iter::once(n)),
            Content::Lazy(p) => out.extend(p.get_nodes()),
        }
    }
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Node(n) => f.debug_tuple("Content::Node").field(n).finish(),
            Content::Lazy(_) => f.write_str("Content::Lazy(..)"),
        }
    }
}

impl From<Node> for Content {
    fn from(n: Node) -> Self {
        Content::Node(n)
    }
}

impl From<Element> for Content {
    fn from(e: Element) -> Self {
        Content::Node(Node::Element(e))
    }
}

impl From<Text> for Content {
    fn from(t: Text) -> Self {
        Content::Node(Node::Text(t))
    }
}

impl From<Resource> for Content {
    fn from(r: Resource) -> Self {
        Content::Node(Node::Resource(r))
    }
}

/// Raw strings become escaped text nodes; they are never tracked by the
/// ambient capture scope.
impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Node(Node::Text(Text::new(s)))
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Node(Node::Text(Text::new(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_inline_classification() {
        assert!(Node::Text(Text::new("x")).is_inline());
        assert!(Node::Element(Element::new("span", true)).is_inline());
        assert!(!Node::Element(Element::new("div", false)).is_inline());
    }

    #[test]
    fn test_content_from_str_is_escaped_text() {
        let content = Content::from("a & b");
        let mut nodes = Vec::new();
        content.collect_into(&mut nodes);
        assert_eq!(nodes.len(), 1);
        let Node::Text(t) = &nodes[0] else {
            panic!("expected text node");
        };
        assert_eq!(t.content(), "a & b");
        assert!(!t.is_raw());
    }

    #[test]
    fn test_lazy_content_identity_follows_allocation() {
        struct Empty;
        impl HasNodes for Empty {
            fn get_nodes(&self) -> Vec<Node> {
                Vec::new()
            }
        }

        let provider: Rc<dyn HasNodes> = Rc::new(Empty);
        let a = Content::lazy(provider.clone());
        let b = Content::lazy(provider);
        assert_eq!(a.id(), b.id());
    }
}
