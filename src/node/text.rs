//! Text node type.

use std::rc::Rc;

use crate::node::{Node, NodeId};
use crate::scope;

// =============================================================================
// Text
// =============================================================================

/// Text content node. Always inline.
///
/// Cheap-clone shared handle; clones refer to the same node identity.
#[derive(Clone)]
pub struct Text {
    inner: Rc<TextInner>,
}

struct TextInner {
    content: String,
    raw: bool,
}

impl Text {
    /// Create an escaped text node without registering it with the ambient
    /// capture scope. Prefer the [`text`] factory in construction code.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(TextInner {
                content: content.into(),
                raw: false,
            }),
        }
    }

    /// Create a raw (pre-escaped) text node, written verbatim.
    pub fn new_raw(content: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(TextInner {
                content: content.into(),
                raw: true,
            }),
        }
    }

    /// The wrapped string, before any escaping.
    pub fn content(&self) -> &str {
        &self.inner.content
    }

    /// Whether the content is written verbatim instead of HTML-escaped.
    pub fn is_raw(&self) -> bool {
        self.inner.raw
    }

    /// Node identity of this handle.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.inner)
    }
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Text").field(&self.inner.content).finish()
    }
}

// =============================================================================
// Factories
// =============================================================================

/// Create an escaped text node and register it with the ambient scope.
pub fn text(content: impl Into<String>) -> Text {
    let node = Text::new(content);
    scope::register(&Node::Text(node.clone()).into());
    node
}

/// Create a raw text node and register it with the ambient scope.
///
/// The content bypasses HTML escaping entirely; the caller vouches for it.
pub fn raw(content: impl Into<String>) -> Text {
    let node = Text::new_raw(content);
    scope::register(&Node::Text(node.clone()).into());
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let n = text("hi there & goodbye");
        assert_eq!(
            Node::Text(n).render().unwrap(),
            "hi there &amp; goodbye"
        );
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let n = raw("hi there & goodbye");
        assert_eq!(Node::Text(n).render().unwrap(), "hi there & goodbye");
    }

    #[test]
    fn test_clones_share_identity() {
        let n = Text::new("x");
        assert_eq!(n.id(), n.clone().id());
        assert_ne!(n.id(), Text::new("x").id());
    }
}
