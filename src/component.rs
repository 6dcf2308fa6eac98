//! Components: reusable subtree builders with named slots.
//!
//! A component wraps a body closure that produces its subtree on demand.
//! Callers fill slots with content before the component is expanded; the
//! body reads them back through [`Slots::slot`]. Expansion is cached per
//! instance, so a component renders the same subtree no matter how often
//! it is stringified, and stringifying never leaks nodes into the ambient
//! capture scope.
//!
//! Slot bookkeeping is built entirely on the public capture-scope protocol
//! ([`crate::scope`]); the node core has no awareness of components.

use std::cell::RefCell;
use std::rc::Rc;

use compact_str::CompactString;

use crate::error::WeaveResult;
use crate::node::{Content, Element, HasNodes, Node, NodeId};
use crate::render::render_nodes;
use crate::scope;

// =============================================================================
// Slots
// =============================================================================

/// The slot table of one component instance.
///
/// The empty name refers to the default slot: the declared default if one
/// was named, otherwise the implicit single slot of a component declared
/// without slots.
pub struct Slots {
    slots: Vec<(CompactString, Vec<Content>)>,
    default: CompactString,
}

impl Slots {
    fn new(names: &[&str], default: Option<&str>) -> Self {
        if let Some(default) = default {
            assert!(
                !names.is_empty(),
                "can't set a default without slots: {default:?}"
            );
            assert!(
                names.contains(&default),
                "invalid default slot {default:?}; available slots: {}",
                names.join(", ")
            );
        }
        let mut slots: Vec<(CompactString, Vec<Content>)> = names
            .iter()
            .map(|name| (CompactString::from(*name), Vec::new()))
            .collect();
        if slots.is_empty() {
            slots.push((CompactString::const_new(""), Vec::new()));
        }
        Slots {
            slots,
            default: default.unwrap_or("").into(),
        }
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if name.is_empty() { &self.default } else { name }
    }

    fn entry(&self, name: &str) -> &Vec<Content> {
        let resolved = self.resolve(name);
        self.slots
            .iter()
            .find(|(slot, _)| slot == resolved)
            .map(|(_, content)| content)
            .unwrap_or_else(|| panic!("unknown slot {resolved:?}"))
    }

    fn add_content(&mut self, name: &str, content: Vec<Content>) {
        let resolved = if name.is_empty() {
            self.default.clone()
        } else {
            CompactString::from(name)
        };
        self.slots
            .iter_mut()
            .find(|(slot, _)| *slot == resolved)
            .unwrap_or_else(|| panic!("unknown slot {resolved:?}"))
            .1
            .extend(content);
    }

    /// Emit the filled content of a slot into the ambient capture scope.
    ///
    /// The empty name addresses the default slot.
    ///
    /// # Panics
    ///
    /// Panics if `name` does not address a declared slot.
    pub fn slot(&self, name: &str) {
        for content in self.entry(name) {
            scope::register(content);
        }
    }

    /// Like [`slot`](Slots::slot), but runs `fallback` when the slot was
    /// left unfilled.
    pub fn slot_or(&self, name: &str, fallback: impl FnOnce()) {
        if self.is_filled(name) {
            self.slot(name);
        } else {
            fallback();
        }
    }

    /// Whether the slot has been filled with content.
    pub fn is_filled(&self, name: &str) -> bool {
        !self.entry(name).is_empty()
    }
}

// =============================================================================
// Component
// =============================================================================

/// A reusable subtree builder with slot-based content injection.
///
/// Cheap-clone shared handle; clones refer to the same instance, including
/// its slot table and expansion cache.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

struct ComponentInner {
    body: Box<dyn Fn(&Slots) -> Content>,
    slots: RefCell<Slots>,
    cached: RefCell<Option<Vec<Node>>>,
}

impl Component {
    /// Create a component instance and register it with the ambient
    /// capture scope.
    ///
    /// `slot_names` declares the slots the body may read; a component
    /// declared without slots gets a single implicit default slot.
    ///
    /// # Panics
    ///
    /// Panics if `default` is set without declared slots, or names a slot
    /// that was not declared.
    pub fn new<F, C>(slot_names: &[&str], default: Option<&str>, body: F) -> Self
    where
        F: Fn(&Slots) -> C + 'static,
        C: Into<Content>,
    {
        let component = Component {
            inner: Rc::new(ComponentInner {
                body: Box::new(move |slots| body(slots).into()),
                slots: RefCell::new(Slots::new(slot_names, default)),
                cached: RefCell::new(None),
            }),
        };
        scope::register(&Content::from(component.clone()));
        component
    }

    /// Attach style nodes rendered once per document by
    /// [`component_styles`](crate::template::component_styles).
    ///
    /// The nodes are claimed from the ambient capture scope and handed to
    /// the active template context; without one this is a no-op.
    pub fn styles<I>(self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let nodes: Vec<Node> = nodes.into_iter().map(Into::into).collect();
        for node in &nodes {
            scope::deregister(&Content::from(node.clone()));
        }
        crate::template::register_styles(nodes);
        self
    }

    /// Attach script nodes rendered once per document by
    /// [`component_scripts`](crate::template::component_scripts).
    pub fn scripts<I>(self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let nodes: Vec<Node> = nodes.into_iter().map(Into::into).collect();
        for node in &nodes {
            scope::deregister(&Content::from(node.clone()));
        }
        crate::template::register_scripts(nodes);
        self
    }

    /// Fill the default slot from a scoped-construction block.
    ///
    /// Unclaimed nodes created inside the closure become slot content, in
    /// creation order. A closure that creates nothing leaves the slot
    /// unfilled.
    pub fn fill(&self, f: impl FnOnce()) -> &Self {
        self.fill_impl("", f);
        self
    }

    /// Fill a named slot from a scoped-construction block.
    ///
    /// # Panics
    ///
    /// Panics if `name` does not address a declared slot.
    pub fn fill_slot(&self, name: &str, f: impl FnOnce()) -> &Self {
        self.fill_impl(name, f);
        self
    }

    fn fill_impl(&self, name: &str, f: impl FnOnce()) {
        let capture = Element::new("__capture__", false);
        scope::push_scope(capture.clone());
        let guard = scope::ScopeGuard::new();
        f();
        guard.disarm();
        let (parent, content) = scope::pop_scope();
        assert!(
            parent.ptr_eq(&capture),
            "slot capture scope exited out of order"
        );
        if !content.is_empty() {
            self.inner.slots.borrow_mut().add_content(name, content);
        }
    }

    /// Identity used by capture-scope bookkeeping.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.inner)
    }

    /// Render the expanded subtree as a top-level sequence.
    pub fn render(&self) -> WeaveResult<String> {
        render_nodes(&self.get_nodes())
    }
}

impl HasNodes for ComponentInner {
    fn get_nodes(&self) -> Vec<Node> {
        if let Some(nodes) = self.cached.borrow().as_ref() {
            return nodes.clone();
        }
        // Run the body inside a throwaway capture scope so its stray
        // registrations never reach the caller's scope; only the returned
        // content counts.
        let capture = Element::new("__capture__", false);
        scope::push_scope(capture.clone());
        let guard = scope::ScopeGuard::new();
        let result = (self.body)(&self.slots.borrow());
        guard.disarm();
        let (parent, _) = scope::pop_scope();
        assert!(
            parent.ptr_eq(&capture),
            "component body exited a capture scope out of order"
        );
        let mut nodes = Vec::new();
        result.collect_into(&mut nodes);
        *self.cached.borrow_mut() = Some(nodes.clone());
        nodes
    }
}

impl HasNodes for Component {
    fn get_nodes(&self) -> Vec<Node> {
        self.inner.get_nodes()
    }
}

impl From<Component> for Content {
    fn from(c: Component) -> Self {
        Content::lazy(c.inner)
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Component(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{body, div, h2, head, html, img, main, p, title};

    fn my_card(name: &'static str) -> Component {
        Component::new(&[], None, move |slots| {
            div().attr("name", name).unwrap().scope(|| slots.slot(""))
        })
    }

    #[test]
    fn test_basic_component() {
        let elem = div().classes("container").scope(|| {
            my_card("component-name").fill(|| {
                p().text("slot content");
            });
        });

        assert_eq!(
            elem.render().unwrap(),
            "<div class=\"container\">\n  <div name=\"component-name\">\n    \
             <p>slot content</p>\n  </div>\n</div>"
        );
    }

    fn page_shell() -> Component {
        Component::new(&["head", "main"], None, |slots| {
            html().scope(|| {
                head().scope(|| slots.slot("head"));
                body().scope(|| {
                    main().scope(|| slots.slot("main"));
                });
            })
        })
    }

    #[test]
    fn test_named_slots() {
        let comp = page_shell();
        comp.fill_slot("head", || {
            title().text("My website");
        })
        .fill_slot("main", || {
            p().text("My article");
        });

        assert_eq!(
            comp.render().unwrap(),
            "<html>\n  <head>\n    <title>My website</title>\n  </head>\n  \
             <body>\n    <main>\n      <p>My article</p>\n    </main>\n  </body>\n</html>"
        );
    }

    fn page_shell_with_default() -> Component {
        Component::new(&["head", "main"], Some("main"), |slots| {
            html().scope(|| {
                head().scope(|| slots.slot("head"));
                body().scope(|| {
                    main().scope(|| slots.slot(""));
                });
            })
        })
    }

    #[test]
    fn test_default_slot_receives_unnamed_fill() {
        let comp1 = page_shell_with_default();
        comp1
            .fill_slot("head", || {
                title().text("My website");
            })
            .fill(|| {
                p().text("My article");
            });

        let comp2 = page_shell_with_default();
        comp2
            .fill_slot("head", || {
                title().text("My website");
            })
            .fill_slot("main", || {
                p().text("My article");
            });

        assert_eq!(comp1.render().unwrap(), comp2.render().unwrap());
    }

    fn card_with_icon() -> Component {
        Component::new(&["icon", "main"], Some("main"), |slots| {
            div().classes("my-component").scope(|| {
                if slots.is_filled("icon") {
                    div().classes("icon").scope(|| slots.slot("icon"));
                }
                if slots.is_filled("") {
                    div().classes("main").scope(|| slots.slot(""));
                }
            })
        })
    }

    #[test]
    fn test_is_filled_drives_conditional_markup() {
        let comp1 = card_with_icon();
        comp1.fill(|| {
            p().text("My article");
        });
        assert_eq!(
            comp1.render().unwrap(),
            "<div class=\"my-component\">\n  <div class=\"main\">\n    \
             <p>My article</p>\n  </div>\n</div>"
        );

        let comp2 = card_with_icon();
        comp2.fill_slot("icon", || {
            let _ = img().attr("src", "icon.png").unwrap();
        });
        assert_eq!(
            comp2.render().unwrap(),
            "<div class=\"my-component\">\n  \
             <div class=\"icon\"><img src=\"icon.png\"></div>\n</div>"
        );
    }

    fn titled_section() -> Component {
        Component::new(&["title", "content"], Some("content"), |slots| {
            crate::Fragment::new().scope(|| {
                slots.slot_or("title", || {
                    h2().text("Default title");
                });
                slots.slot_or("", || {
                    p().text("Default content");
                });
            })
        })
    }

    #[test]
    fn test_unfilled_slots_fall_back_to_default_content() {
        let comp1 = titled_section();
        assert_eq!(
            comp1.render().unwrap(),
            "<h2>Default title</h2>\n<p>Default content</p>"
        );

        let comp2 = titled_section();
        comp2
            .fill_slot("title", || {
                h2().text("My title");
            })
            .fill(|| {
                p().text("My content");
            });
        assert_eq!(comp2.render().unwrap(), "<h2>My title</h2>\n<p>My content</p>");
    }

    #[test]
    #[should_panic(expected = "can't set a default without slots")]
    fn test_default_without_slots_panics() {
        let _ = Component::new(&[], Some("x"), |_| div());
    }

    #[test]
    #[should_panic(expected = "invalid default slot")]
    fn test_default_must_name_a_declared_slot() {
        let _ = Component::new(&["a", "b"], Some("x"), |_| div());
    }

    #[test]
    #[should_panic(expected = "unknown slot")]
    fn test_filling_an_undeclared_slot_panics() {
        let comp = page_shell();
        comp.fill_slot("sidebar", || {
            p().text("content");
        });
    }

    #[test]
    fn test_stringifying_component_has_no_side_effect() {
        let comp = my_card("c1");

        let elem = div().scope(|| {
            let _ = comp.render();
        });

        assert_eq!(elem.render().unwrap(), "<div></div>");
    }

    #[test]
    fn test_expansion_is_cached_per_instance() {
        let comp = my_card("c1");
        comp.fill(|| {
            p().text("once");
        });
        let first = comp.render().unwrap();
        assert_eq!(first, comp.render().unwrap());
    }

    #[test]
    fn test_nested_components() {
        fn inner() -> Component {
            Component::new(&[], None, |slots| {
                div().classes("inner").scope(|| slots.slot(""))
            })
        }
        fn outer() -> Component {
            Component::new(&[], None, |slots| {
                div().classes("outer").scope(|| {
                    inner().fill(|| slots.slot(""));
                })
            })
        }

        let elem = div().classes("container").scope(|| {
            outer().fill(|| {
                p().text("content");
            });
        });

        assert_eq!(
            elem.render().unwrap(),
            "<div class=\"container\">\n  <div class=\"outer\">\n    \
             <div class=\"inner\">\n      <p>content</p>\n    </div>\n  </div>\n</div>"
        );
    }

    #[test]
    fn test_styles_and_scripts_have_no_effect_outside_a_template() {
        use crate::tags::{script, style};

        let comp = Component::new(&[], None, |_| div().classes("my-component"))
            .styles([style().text(".my-component { background: #ccc }")])
            .scripts([script().text("// script goes here")]);

        assert_eq!(comp.render().unwrap(), "<div class=\"my-component\"></div>");
    }
}
