//! Element type - the core building block of the build tree.
//!
//! Elements come in two shapes fixed at construction: content-bearing
//! (ordered child nodes) and void (no children collection at all, e.g.
//! `<img>`). Tag name, inline flag, and void-ness are immutable; attributes
//! and children grow additively through the builder methods.
//!
//! Every attach-style builder call ([`Element::child`], [`Element::text`],
//! [`Element::attr`], ...) re-registers the element with the innermost
//! capture scope (idempotent) and claims explicitly passed children, so a
//! node handed to a parent directly is not also swept up by the ambient
//! scope. See [`crate::scope`] for the protocol.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{AttrEntry, AttrValue, Attrs, AttrsExt, normalize_name};
use crate::error::WeaveResult;
use crate::node::{Content, Node, NodeId, Text};
use crate::scope;

/// Child node collection.
pub type Children = SmallVec<[Node; 8]>;

// =============================================================================
// Element
// =============================================================================

/// HTML element handle.
///
/// Cheap-clone shared handle; clones refer to the same element identity.
/// Create instances through the [`crate::tags`] factories (which register
/// the element with the ambient capture scope) or through
/// [`TagDef::el`](crate::tags::TagDef::el) for custom tags.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

struct ElementInner {
    tag: CompactString,
    inline: bool,
    attrs: RefCell<Attrs>,
    content: ElementContent,
}

enum ElementContent {
    Children(RefCell<Children>),
    Void { omit_end_tag: bool },
}

impl Element {
    /// Create a content-bearing element.
    ///
    /// The raw constructor does not register with the ambient capture scope;
    /// that is the job of the tag factories.
    pub fn new(tag: impl Into<CompactString>, inline: bool) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                tag: tag.into(),
                inline,
                attrs: RefCell::new(Attrs::new()),
                content: ElementContent::Children(RefCell::new(SmallVec::new())),
            }),
        }
    }

    /// Create a void element (no children collection).
    pub fn new_void(tag: impl Into<CompactString>, inline: bool, omit_end_tag: bool) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                tag: tag.into(),
                inline,
                attrs: RefCell::new(Attrs::new()),
                content: ElementContent::Void { omit_end_tag },
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspectors
    // ─────────────────────────────────────────────────────────────────────────

    /// Tag name, fixed at construction.
    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// Whether this element may share an output line with siblings.
    pub fn is_inline(&self) -> bool {
        self.inner.inline
    }

    /// Whether this element is void (cannot carry child content).
    pub fn is_void(&self) -> bool {
        matches!(self.inner.content, ElementContent::Void { .. })
    }

    /// Node identity of this handle.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.inner)
    }

    /// Whether two handles refer to the same element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get a stored attribute entry by (normalized) name.
    pub fn get_attr(&self, name: &str) -> Option<AttrEntry> {
        self.inner.attrs.borrow().get_attr(name).cloned()
    }

    /// Check if an attribute is set.
    pub fn has_attr(&self, name: &str) -> bool {
        self.inner.attrs.borrow().has_attr(name)
    }

    /// Number of direct children. Zero for void elements.
    pub fn child_count(&self) -> usize {
        match &self.inner.content {
            ElementContent::Children(c) => c.borrow().len(),
            ElementContent::Void { .. } => 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Set an attribute.
    ///
    /// The name is normalized (`class_` → `class`, `data_foo` → `data-foo`)
    /// and validated; a malformed name fails here, not at render time.
    /// Boolean values carry add/remove semantics: `true` stores a bare
    /// minimized attribute, `false` removes any previous entry, so a later
    /// call can undo an earlier one. Last write wins per name.
    pub fn attr(self, name: &str, value: impl Into<AttrValue>) -> WeaveResult<Self> {
        scope::register(&Content::from(self.clone()));
        let name = normalize_name(name)?;
        let mut attrs = self.inner.attrs.borrow_mut();
        match value.into() {
            AttrValue::Text(v) => attrs.set_attr(name, AttrEntry::Value(v)),
            AttrValue::Flag(true) => attrs.set_attr(name, AttrEntry::Bare),
            AttrValue::Flag(false) => {
                attrs.remove_attr(&name);
            }
        }
        drop(attrs);
        Ok(self)
    }

    /// Class/id shorthand over a whitespace-separated token string.
    ///
    /// Tokens starting with `#` set (replace) the `id` attribute, last one
    /// wins; other tokens append to the `class` attribute, order preserved
    /// and not de-duplicated.
    pub fn classes(self, tokens: &str) -> Self {
        let mut attrs = self.inner.attrs.borrow_mut();
        let mut class_names: Vec<&str> = Vec::new();
        for token in tokens.split_whitespace() {
            if let Some(id) = token.strip_prefix('#') {
                attrs.set_attr(CompactString::const_new("id"), AttrEntry::Value(id.into()));
            } else {
                class_names.push(token);
            }
        }
        if !class_names.is_empty() {
            let mut merged = match attrs.get_attr("class") {
                Some(AttrEntry::Value(existing)) => existing.to_string(),
                _ => String::new(),
            };
            for name in class_names {
                if !merged.is_empty() {
                    merged.push(' ');
                }
                merged.push_str(name);
            }
            attrs.set_attr(CompactString::const_new("class"), AttrEntry::Value(merged.into()));
        }
        drop(attrs);
        self
    }

    /// Attach one piece of child content.
    ///
    /// # Panics
    ///
    /// Panics if this is a void element.
    pub fn child(self, content: impl Into<Content>) -> Self {
        self.attach([content.into()]);
        self
    }

    /// Attach several pieces of child content, in order.
    ///
    /// # Panics
    ///
    /// Panics if this is a void element.
    pub fn children<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Content>,
    {
        self.attach(items.into_iter().map(Into::into));
        self
    }

    /// Attach an escaped text child.
    ///
    /// # Panics
    ///
    /// Panics if this is a void element.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.attach([Content::from(Node::Text(Text::new(content)))]);
        self
    }

    /// Run a scoped-construction block with this element as the capture
    /// parent.
    ///
    /// Nodes created inside the closure that are not explicitly attached to
    /// something else are collected and attached to this element when the
    /// closure returns, in creation order. Scopes nest strictly LIFO; the
    /// stack is restored if the closure unwinds.
    ///
    /// # Panics
    ///
    /// Panics if this is a void element, or if the closure left a different
    /// capture scope on top of the stack.
    pub fn scope(self, f: impl FnOnce()) -> Self {
        scope::push_scope(self.clone());
        let guard = scope::ScopeGuard::new();
        f();
        guard.disarm();
        let (parent, content) = scope::pop_scope();
        assert!(
            parent.ptr_eq(&self),
            "capture scope for <{}> exited out of order",
            self.tag()
        );
        self.attach(content);
        self
    }

    /// Render this element (and its subtree) to a string.
    pub fn render(&self) -> WeaveResult<String> {
        Node::Element(self.clone()).render()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// The attach path shared by `child`/`children`/`text`/`scope`:
    /// re-register with the ambient scope, claim each explicit child,
    /// expand lazy content once, and append.
    fn attach(&self, items: impl IntoIterator<Item = Content>) {
        scope::register(&Content::from(self.clone()));
        let ElementContent::Children(children) = &self.inner.content else {
            panic!(
                "<{}> is a void element and cannot take child content",
                self.tag()
            );
        };
        let mut kids = children.borrow_mut();
        for item in items {
            scope::deregister(&item);
            item.collect_into(&mut *kids);
        }
    }

    pub(crate) fn borrow_attrs(&self) -> Ref<'_, Attrs> {
        self.inner.attrs.borrow()
    }

    /// Borrow the element content for serialization.
    pub(crate) fn content_view(&self) -> ContentView<'_> {
        match &self.inner.content {
            ElementContent::Children(c) => ContentView::Children(c.borrow()),
            ElementContent::Void { omit_end_tag } => ContentView::Void {
                omit_end_tag: *omit_end_tag,
            },
        }
    }
}

/// Borrowed view of an element's content, serialization-side.
pub(crate) enum ContentView<'a> {
    Void { omit_end_tag: bool },
    Children(Ref<'a, Children>),
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Element(<{}>)", self.inner.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrEntry;
    use crate::error::WeaveError;

    #[test]
    fn test_element_basics() {
        let elem = Element::new("div", false);
        assert_eq!(elem.tag(), "div");
        assert!(!elem.is_inline());
        assert!(!elem.is_void());
        assert_eq!(elem.child_count(), 0);
    }

    #[test]
    fn test_attribute_last_write_wins() {
        let elem = Element::new("div", false)
            .attr("title", "one")
            .unwrap()
            .attr("lang", "en")
            .unwrap()
            .attr("title", "two")
            .unwrap();

        assert_eq!(elem.get_attr("title"), Some(AttrEntry::Value("two".into())));
        assert_eq!(elem.borrow_attrs()[0].0, "title");
    }

    #[test]
    fn test_boolean_false_removes_attribute() {
        let elem = Element::new("input", false)
            .attr("disabled", true)
            .unwrap()
            .attr("disabled", false)
            .unwrap();

        assert!(!elem.has_attr("disabled"));
    }

    #[test]
    fn test_invalid_attribute_name_fails_at_call_time() {
        let err = Element::new("div", false).attr("not valid", "x").unwrap_err();
        assert_eq!(
            err,
            WeaveError::InvalidAttributeName {
                name: "not valid".to_string()
            }
        );
    }

    #[test]
    fn test_classes_merge_and_id_replace() {
        let elem = Element::new("div", false)
            .classes("green #blue")
            .classes("supergreen #red");

        assert_eq!(elem.get_attr("id"), Some(AttrEntry::Value("red".into())));
        assert_eq!(
            elem.get_attr("class"),
            Some(AttrEntry::Value("green supergreen".into()))
        );
    }

    #[test]
    #[should_panic(expected = "void element")]
    fn test_void_element_rejects_children() {
        let _ = Element::new_void("img", true, true).text("content");
    }

    #[test]
    fn test_clones_share_state() {
        let elem = Element::new("div", false);
        let other = elem.clone();
        let _ = other.attr("id", "x").unwrap();
        assert!(elem.has_attr("id"));
        assert!(elem.ptr_eq(&elem.clone()));
    }
}
