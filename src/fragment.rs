//! Fragments: ordered groups of nodes without a wrapping element.
//!
//! A fragment renders its nodes as a top-level sequence and expands in
//! place when attached to an element, so helper functions can return
//! several siblings as one value. Like elements, fragments are cheap-clone
//! shared handles and participate in the capture-scope claim protocol
//! through their [`HasNodes`] identity.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::WeaveResult;
use crate::node::{Content, Element, HasNodes, Node, NodeId};
use crate::render::render_nodes;
use crate::scope;

// =============================================================================
// Fragment
// =============================================================================

/// An unwrapped, ordered group of nodes.
#[derive(Clone)]
pub struct Fragment {
    inner: Rc<FragmentInner>,
}

struct FragmentInner {
    nodes: RefCell<Vec<Node>>,
}

impl HasNodes for FragmentInner {
    fn get_nodes(&self) -> Vec<Node> {
        self.nodes.borrow().clone()
    }
}

impl HasNodes for Fragment {
    fn get_nodes(&self) -> Vec<Node> {
        self.inner.get_nodes()
    }
}

impl Fragment {
    /// Create an empty fragment, registered with the ambient capture scope.
    pub fn new() -> Self {
        fragment(std::iter::empty::<Content>())
    }

    /// Identity used by capture-scope bookkeeping.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.inner)
    }

    /// Snapshot of the grouped nodes, in order.
    pub fn nodes(&self) -> Vec<Node> {
        self.inner.nodes.borrow().clone()
    }

    /// Number of grouped nodes.
    pub fn len(&self) -> usize {
        self.inner.nodes.borrow().len()
    }

    /// Whether the fragment holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.nodes.borrow().is_empty()
    }

    /// Run a scoped-construction block that appends to this fragment.
    ///
    /// Unclaimed nodes created inside the closure are appended in creation
    /// order, the same way [`Element::scope`] attaches them to an element.
    pub fn scope(self, f: impl FnOnce()) -> Self {
        scope::register(&Content::from(self.clone()));
        let capture = Element::new("__capture__", false);
        scope::push_scope(capture.clone());
        let guard = scope::ScopeGuard::new();
        f();
        guard.disarm();
        let (parent, content) = scope::pop_scope();
        assert!(
            parent.ptr_eq(&capture),
            "fragment capture scope exited out of order"
        );
        {
            let mut nodes = self.inner.nodes.borrow_mut();
            for item in content {
                item.collect_into(&mut *nodes);
            }
        }
        self
    }

    /// Render the grouped nodes as a top-level sequence.
    pub fn render(&self) -> WeaveResult<String> {
        render_nodes(&self.nodes())
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Fragment> for Content {
    fn from(f: Fragment) -> Self {
        Content::lazy(f.inner)
    }
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fragment({} nodes)", self.len())
    }
}

/// Group `items` into a fragment.
///
/// Each item is claimed from the ambient capture scope and expanded, then
/// the fragment itself is registered, so passing captured nodes into a
/// fragment moves them rather than duplicating them.
pub fn fragment<I>(items: I) -> Fragment
where
    I: IntoIterator,
    I::Item: Into<Content>,
{
    let frag = Fragment {
        inner: Rc::new(FragmentInner {
            nodes: RefCell::new(Vec::new()),
        }),
    };
    {
        let mut nodes = frag.inner.nodes.borrow_mut();
        for item in items {
            let content = item.into();
            scope::deregister(&content);
            content.collect_into(&mut *nodes);
        }
    }
    scope::register(&Content::from(frag.clone()));
    frag
}

/// Variadic form of [`fragment`]: `fragment![p(), span(), "text"]`.
#[macro_export]
macro_rules! fragment {
    () => {
        $crate::Fragment::new()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::fragment([$($crate::Content::from($item)),+])
    };
}
