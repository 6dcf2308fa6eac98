//! Prelude module for common imports.
//!
//! ```
//! use htmlweave::prelude::*;
//!
//! let elem = div().scope(|| {
//!     p().text("hello");
//! });
//! assert_eq!(elem.render().unwrap(), "<div>\n  <p>hello</p>\n</div>");
//! ```

// Node types
pub use crate::node::{Content, Element, HasNodes, Node, Text, raw, text};

// Tag factories
pub use crate::tags::*;

// Grouping and reuse
pub use crate::component::{Component, Slots};
pub use crate::fragment::{Fragment, fragment};

// Templates and resources
pub use crate::template::{
    Resource, Template, component_scripts, component_styles, document, register_scripts,
    register_styles,
};

// Ambient context
pub use crate::context::{Context, ContextGuard};

// Attributes
pub use crate::attr::{AttrEntry, AttrValue};

// Error types
pub use crate::error::{WeaveError, WeaveResult};
