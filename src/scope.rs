//! The capture-scope stack: the "current build target" mechanism.
//!
//! A capture scope records every node created while it is active and, on
//! exit, hands the ones nobody claimed to its designated parent element.
//! This is what lets deeply nested construction code attach nodes to an
//! enclosing element without threading parent references around.
//!
//! The stack is thread-local: concurrent builds on separate threads never
//! observe each other's scopes. Within one thread, scopes nest strictly
//! LIFO; [`pop_scope`] on an empty stack is a contract violation and
//! panics.
//!
//! The four functions here - [`push_scope`], [`pop_scope`], [`register`],
//! [`deregister`] - are the complete boundary the component/slot layer is
//! built on; the core has no awareness of slots.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use crate::node::{Content, Element, NodeId};

// =============================================================================
// Capture scopes
// =============================================================================

/// Bookkeeping record for one nested construction block.
struct CaptureScope {
    /// The element this scope will attach its unclaimed content to.
    parent: Element,
    /// Content registered while the scope was active, in creation order.
    collected: Vec<Content>,
    /// Everything ever registered; keeps registration idempotent and stops
    /// a claimed node from being re-added by a later lookup.
    seen: FxHashSet<NodeId>,
    /// Still eligible for implicit attachment on scope exit.
    unclaimed: FxHashSet<NodeId>,
}

impl CaptureScope {
    fn new(parent: Element) -> Self {
        Self {
            parent,
            collected: Vec::new(),
            seen: FxHashSet::default(),
            unclaimed: FxHashSet::default(),
        }
    }
}

thread_local! {
    static STACK: RefCell<Vec<CaptureScope>> = const { RefCell::new(Vec::new()) };
}

/// Push a new empty capture scope for `parent`.
pub fn push_scope(parent: Element) {
    STACK.with(|stack| {
        stack.borrow_mut().push(CaptureScope::new(parent));
    });
}

/// Pop the top scope; return its parent and the collected content that is
/// still unclaimed, in registration order.
///
/// # Panics
///
/// Panics if no scope is active.
pub fn pop_scope() -> (Element, Vec<Content>) {
    STACK.with(|stack| {
        let scope = stack
            .borrow_mut()
            .pop()
            .expect("pop_scope called with no active capture scope");
        let unclaimed = scope
            .collected
            .into_iter()
            .filter(|content| scope.unclaimed.contains(&content.id()))
            .collect();
        (scope.parent, unclaimed)
    })
}

/// Record `content` with the innermost scope, if one is active.
///
/// Idempotent: registering the same identity twice keeps a single entry,
/// and registering after a claim does not resurrect the node.
pub fn register(content: &Content) {
    STACK.with(|stack| {
        if let Some(scope) = stack.borrow_mut().last_mut() {
            let id = content.id();
            if scope.seen.insert(id) {
                scope.unclaimed.insert(id);
                scope.collected.push(content.clone());
            }
        }
    });
}

/// Mark `content` as claimed in the innermost scope, if one is active.
///
/// The entry stays in the scope's history, so later registrations of the
/// same identity remain no-ops.
pub fn deregister(content: &Content) {
    STACK.with(|stack| {
        if let Some(scope) = stack.borrow_mut().last_mut() {
            scope.unclaimed.remove(&content.id());
        }
    });
}

/// Current nesting depth; used by tests and the unwind guard.
pub(crate) fn depth() -> usize {
    STACK.with(|stack| stack.borrow().len())
}

// =============================================================================
// Unwind guard
// =============================================================================

/// Restores the scope stack when a construction closure unwinds.
///
/// Created right after a push; `disarm` on the success path. On unwind the
/// guard discards the scope it protects along with any stale inner scopes,
/// so a caught panic leaves the stack balanced.
pub(crate) struct ScopeGuard {
    target_depth: usize,
    armed: bool,
}

impl ScopeGuard {
    pub(crate) fn new() -> Self {
        Self {
            target_depth: depth(),
            armed: true,
        }
    }

    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if self.armed {
            STACK.with(|stack| {
                let mut stack = stack.borrow_mut();
                let len = stack.len().min(self.target_depth.saturating_sub(1));
                stack.truncate(len);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, Text};

    fn text_content(s: &str) -> Content {
        Content::from(Node::Text(Text::new(s)))
    }

    #[test]
    fn test_push_pop_returns_parent_and_collected() {
        let parent = Element::new("div", false);
        push_scope(parent.clone());

        let a = text_content("a");
        let b = text_content("b");
        register(&a);
        register(&b);

        let (popped, content) = pop_scope();
        assert!(popped.ptr_eq(&parent));
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].id(), a.id());
        assert_eq!(content[1].id(), b.id());
    }

    #[test]
    fn test_registration_is_idempotent() {
        push_scope(Element::new("div", false));

        let a = text_content("a");
        register(&a);
        register(&a);

        let (_, content) = pop_scope();
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn test_deregistered_content_is_not_collected_or_readded() {
        push_scope(Element::new("div", false));

        let a = text_content("a");
        let b = text_content("b");
        register(&a);
        register(&b);
        deregister(&a);
        // A later lookup must not resurrect a claimed node.
        register(&a);

        let (_, content) = pop_scope();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].id(), b.id());
    }

    #[test]
    fn test_register_without_scope_is_a_noop() {
        register(&text_content("dangling"));
        deregister(&text_content("dangling"));
        assert_eq!(depth(), 0);
    }

    #[test]
    #[should_panic(expected = "no active capture scope")]
    fn test_pop_without_scope_panics() {
        let _ = pop_scope();
    }

    #[test]
    fn test_scopes_nest_lifo() {
        let outer = Element::new("section", false);
        let inner = Element::new("div", false);
        push_scope(outer.clone());
        push_scope(inner.clone());

        let (first, _) = pop_scope();
        let (second, _) = pop_scope();
        assert!(first.ptr_eq(&inner));
        assert!(second.ptr_eq(&outer));
    }

    #[test]
    fn test_guard_restores_stack_on_unwind() {
        let before = depth();
        let result = std::panic::catch_unwind(|| {
            push_scope(Element::new("div", false));
            let _guard = ScopeGuard::new();
            // A stale inner scope the panicking closure never cleaned up.
            push_scope(Element::new("span", true));
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(depth(), before);
    }
}
