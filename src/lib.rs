//! htmlweave - programmatic HTML construction with capture scopes.
//!
//! Build HTML trees in plain Rust: tag factories create elements, builder
//! methods set attributes and children, and [`Element::scope`] blocks
//! collect everything created inside them as child content, so nested
//! markup reads like nested code.
//!
//! ## Core Concepts
//!
//! **Capture scopes**: a scope block records every node created while it
//! runs; on exit, nodes nobody claimed become children of the scope's
//! element, in creation order. Explicitly attached nodes are claimed and
//! never duplicated. Scopes are thread-local and nest strictly LIFO.
//!
//! **Cheap-clone handles**: elements, text nodes, fragments, and
//! components are `Rc`-backed handles. Cloning shares identity; the same
//! node can appear in several places of a tree, and the serializer
//! rejects genuine cycles at render time.
//!
//! **Layout-aware rendering**: block elements put children on indented
//! lines, inline elements and runs of inline children stay flat.
//!
//! ## Modules
//! - `tags`: factory functions for the standard HTML tags
//! - `node`: `Node`/`Element`/`Text` types and the `Content` argument type
//! - `scope`: the capture-scope stack
//! - `fragment`: unwrapped node groups
//! - `component`: reusable subtrees with named slots
//! - `template`: document rendering with style/script collection
//! - `context`: ambient, type-keyed context values
//! - `attr`: attribute names, values, and normalization
//!
//! ## Usage
//!
//! ```
//! use htmlweave::prelude::*;
//!
//! let page = div().classes("content").scope(|| {
//!     h1().text("hello, world!");
//!     p().text("Welcome");
//! });
//!
//! assert_eq!(
//!     page.render().unwrap(),
//!     "<div class=\"content\">\n  <h1>hello, world!</h1>\n  <p>Welcome</p>\n</div>"
//! );
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Attribute names, values, and normalization
pub mod attr;

/// Reusable subtrees with named slots
pub mod component;

/// Ambient, type-keyed context values
pub mod context;

/// Error types
pub mod error;

/// Unwrapped node groups
pub mod fragment;

/// Node types: Element, Text, Content
pub mod node;

/// Prelude for common imports
pub mod prelude;

/// HTML rendering
mod render;

/// The capture-scope stack
pub mod scope;

/// Tag factory functions
pub mod tags;

/// Document templates and resource collection
pub mod template;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Content, Element, HasNodes, Node, NodeId, Text, raw, text};

// Grouping and reuse
pub use component::{Component, Slots};
pub use fragment::{Fragment, fragment};

// Templates
pub use template::{Resource, Template, component_scripts, component_styles, document};

// Ambient context
pub use context::{Context, ContextGuard};

// Attribute types
pub use attr::{AttrEntry, AttrValue, Attrs};

// Rendering
pub use render::render_nodes;

// Error types
pub use error::{WeaveError, WeaveResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use static_assertions::assert_not_impl_any;

    use crate::prelude::*;

    assert_not_impl_any!(Element: Send, Sync);
    assert_not_impl_any!(Node: Send, Sync);
    assert_not_impl_any!(Fragment: Send, Sync);
    assert_not_impl_any!(Component: Send, Sync);

    #[test]
    fn test_example_page() {
        let document = html().scope(|| {
            head().scope(|| {
                title().text("Website Example");
            });
            body().scope(|| {
                h1().text("This is an example");
                p().scope(|| {
                    text("Please visit ");
                    let _ = a()
                        .attr("href", "https://trendels.name")
                        .unwrap()
                        .text("my website");
                    text(".");
                });
            });
        });

        assert_eq!(
            document.render().unwrap(),
            "<html>\n  \
               <head>\n    \
                 <title>Website Example</title>\n  \
               </head>\n  \
               <body>\n    \
                 <h1>This is an example</h1>\n    \
                 <p>Please visit <a href=\"https://trendels.name\">my website</a>.</p>\n  \
               </body>\n\
             </html>"
        );
    }

    #[test]
    fn test_explicitly_attached_nodes_are_not_duplicated() {
        let elem = div().scope(|| {
            let inner = span().text("x");
            let _ = p().child(inner);
        });

        assert_eq!(elem.render().unwrap(), "<div>\n  <p><span>x</span></p>\n</div>");
    }

    #[test]
    fn test_builds_on_separate_threads_are_isolated() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let elem = div().scope(|| {
                        p().text(format!("thread {i}"));
                    });
                    elem.render().unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                format!("<div>\n  <p>thread {i}</p>\n</div>")
            );
        }
    }
}
