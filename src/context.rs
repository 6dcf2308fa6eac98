//! Ambient, type-keyed context values.
//!
//! A context type is any `'static` type that opts in with
//! `impl Context for MyType {}`. Entering a value pushes it on a
//! thread-local stack keyed by [`TypeId`]; the innermost value of each
//! type is the current one, and the returned guard pops it on drop.
//! Template bodies read contexts at render time, which is what makes
//! [`crate::template::Template`] lazy with respect to ambient state.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

thread_local! {
    static CONTEXTS: RefCell<FxHashMap<TypeId, Vec<Rc<dyn Any>>>> =
        RefCell::new(FxHashMap::default());
}

// =============================================================================
// Context
// =============================================================================

/// Opt-in trait for ambient context values.
///
/// All methods are provided; implementors write `impl Context for T {}`.
pub trait Context: Sized + 'static {
    /// Push `self` as the current value of its type.
    ///
    /// The value stays current until the returned guard is dropped;
    /// entering the same type again shadows the outer value until the
    /// inner guard drops.
    fn enter(self) -> ContextGuard<Self> {
        let value = Rc::new(self);
        CONTEXTS.with(|contexts| {
            contexts
                .borrow_mut()
                .entry(TypeId::of::<Self>())
                .or_default()
                .push(value.clone());
        });
        ContextGuard { value }
    }

    /// The innermost active value of this type.
    ///
    /// # Panics
    ///
    /// Panics if no value of this type is active on the current thread.
    fn current() -> Rc<Self> {
        match Self::try_current() {
            Some(value) => value,
            None => panic!("no active context of type {}", type_name::<Self>()),
        }
    }

    /// The innermost active value of this type, if any.
    fn try_current() -> Option<Rc<Self>> {
        CONTEXTS.with(|contexts| {
            contexts
                .borrow()
                .get(&TypeId::of::<Self>())
                .and_then(|stack| stack.last())
                .and_then(|value| value.clone().downcast::<Self>().ok())
        })
    }
}

// =============================================================================
// ContextGuard
// =============================================================================

/// Keeps a context value current; pops it on drop.
///
/// Dereferences to the entered value.
pub struct ContextGuard<T: Context> {
    value: Rc<T>,
}

impl<T: Context> Deref for ContextGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Context> Drop for ContextGuard<T> {
    fn drop(&mut self) {
        CONTEXTS.with(|contexts| {
            if let Some(stack) = contexts.borrow_mut().get_mut(&TypeId::of::<T>()) {
                stack.pop();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        name: &'static str,
    }
    impl Context for User {}

    struct Server {
        port: u16,
    }
    impl Context for Server {}

    #[test]
    #[should_panic(expected = "no active context")]
    fn test_current_without_active_value_panics() {
        let _ = User::current();
    }

    #[test]
    fn test_entered_value_becomes_current() {
        let guard = User { name: "fred" }.enter();
        assert_eq!(User::current().name, "fred");
        assert_eq!(guard.name, "fred");
    }

    #[test]
    fn test_multiple_context_types_coexist() {
        let _user = User { name: "barney" }.enter();
        let _server = Server { port: 80 }.enter();
        assert_eq!(User::current().name, "barney");
        assert_eq!(Server::current().port, 80);
    }

    #[test]
    fn test_inner_value_shadows_outer() {
        let _outer = User { name: "fred" }.enter();
        assert_eq!(User::current().name, "fred");
        {
            let _inner = User { name: "barney" }.enter();
            assert_eq!(User::current().name, "barney");
        }
        assert_eq!(User::current().name, "fred");
    }

    #[test]
    fn test_value_is_unset_when_guard_drops() {
        let _server = Server { port: 80 }.enter();
        {
            let _user = User { name: "barney" }.enter();
        }
        assert!(User::try_current().is_none());
        assert_eq!(Server::current().port, 80);
    }
}
