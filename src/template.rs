//! Templates: whole-document rendering with per-document resource
//! collection.
//!
//! A [`Template`] holds the document body as a closure and re-runs it on
//! every [`Template::render`] call, so ambient state (see
//! [`crate::context`]) is read at render time, not at definition time.
//! While a render is in flight, a thread-local template context collects
//! the style and script nodes components registered; the
//! [`component_styles`] and [`component_scripts`] placeholders resolve
//! against it when the serializer reaches them.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::component::Component;
use crate::error::WeaveResult;
use crate::node::{Content, Node, NodeId};
use crate::render::render_nodes;
use crate::scope;

// =============================================================================
// Resource placeholders
// =============================================================================

/// Kind of deferred resource a [`Resource`] node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceKind {
    Styles,
    Scripts,
}

/// Placeholder node that expands to the collected component styles or
/// scripts of the active template context at render time.
///
/// Outside a template render it expands to nothing.
#[derive(Clone)]
pub struct Resource {
    inner: Rc<ResourceInner>,
}

struct ResourceInner {
    kind: ResourceKind,
}

impl Resource {
    fn new(kind: ResourceKind) -> Self {
        Resource {
            inner: Rc::new(ResourceInner { kind }),
        }
    }

    pub(crate) fn kind(&self) -> ResourceKind {
        self.inner.kind
    }

    /// Node identity for bookkeeping.
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.inner)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.kind {
            ResourceKind::Styles => f.write_str("Resource(styles)"),
            ResourceKind::Scripts => f.write_str("Resource(scripts)"),
        }
    }
}

/// Placeholder for the style nodes of every component used in the
/// document, deduplicated, in first-registration order.
pub fn component_styles() -> Resource {
    let resource = Resource::new(ResourceKind::Styles);
    scope::register(&Content::from(resource.clone()));
    resource
}

/// Placeholder for the script nodes of every component used in the
/// document, deduplicated, in first-registration order.
pub fn component_scripts() -> Resource {
    let resource = Resource::new(ResourceKind::Scripts);
    scope::register(&Content::from(resource.clone()));
    resource
}

// =============================================================================
// Template context
// =============================================================================

/// Per-render collection of component styles and scripts, deduplicated by
/// node identity.
#[derive(Default)]
struct TemplateCtx {
    styles: Vec<Node>,
    style_ids: FxHashSet<NodeId>,
    scripts: Vec<Node>,
    script_ids: FxHashSet<NodeId>,
}

impl TemplateCtx {
    fn add(&mut self, kind: ResourceKind, node: Node) {
        let (seen, nodes) = match kind {
            ResourceKind::Styles => (&mut self.style_ids, &mut self.styles),
            ResourceKind::Scripts => (&mut self.script_ids, &mut self.scripts),
        };
        if seen.insert(node.id()) {
            nodes.push(node);
        }
    }
}

thread_local! {
    static TEMPLATE_STACK: RefCell<Vec<TemplateCtx>> = const { RefCell::new(Vec::new()) };
}

fn register_nodes<I>(kind: ResourceKind, nodes: I)
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    TEMPLATE_STACK.with(|stack| {
        if let Some(ctx) = stack.borrow_mut().last_mut() {
            for node in nodes {
                ctx.add(kind, node.into());
            }
        }
    });
}

/// Hand style nodes to the active template context.
///
/// A no-op when no template render is in flight.
pub fn register_styles<I>(nodes: I)
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    register_nodes(ResourceKind::Styles, nodes);
}

/// Hand script nodes to the active template context.
///
/// A no-op when no template render is in flight.
pub fn register_scripts<I>(nodes: I)
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    register_nodes(ResourceKind::Scripts, nodes);
}

/// Snapshot of the collected nodes of the given kind; empty without an
/// active template context.
pub(crate) fn resource_nodes(kind: ResourceKind) -> Vec<Node> {
    TEMPLATE_STACK.with(|stack| {
        stack
            .borrow()
            .last()
            .map(|ctx| match kind {
                ResourceKind::Styles => ctx.styles.clone(),
                ResourceKind::Scripts => ctx.scripts.clone(),
            })
            .unwrap_or_default()
    })
}

struct TemplateCtxGuard;

impl TemplateCtxGuard {
    fn enter() -> Self {
        TEMPLATE_STACK.with(|stack| stack.borrow_mut().push(TemplateCtx::default()));
        TemplateCtxGuard
    }
}

impl Drop for TemplateCtxGuard {
    fn drop(&mut self) {
        TEMPLATE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

// =============================================================================
// Template
// =============================================================================

enum TemplateBody {
    Plain(Box<dyn Fn() -> Content>),
    Layout(Box<dyn Fn() -> Component>, Box<dyn Fn(&Component)>),
}

/// A lazily rendered document.
///
/// The body closure runs on every render, inside a fresh template context;
/// with a layout, the layout factory is also re-invoked per render, so a
/// template never serves stale component state.
pub struct Template {
    body: TemplateBody,
}

impl Template {
    /// Template whose body produces the document root directly.
    pub fn new<F, C>(body: F) -> Self
    where
        F: Fn() -> C + 'static,
        C: Into<Content>,
    {
        Template {
            body: TemplateBody::Plain(Box::new(move || body().into())),
        }
    }

    /// Template wrapped in a layout component.
    ///
    /// Per render, `layout` builds a fresh component instance and `body`
    /// fills it: unclaimed nodes the body creates go to the layout's
    /// default slot, and the body may fill named slots through the handle
    /// it receives.
    pub fn with_layout<L, F>(layout: L, body: F) -> Self
    where
        L: Fn() -> Component + 'static,
        F: Fn(&Component) + 'static,
    {
        Template {
            body: TemplateBody::Layout(Box::new(layout), Box::new(body)),
        }
    }

    /// Render with a `<!doctype html>` line and a trailing newline.
    pub fn render(&self) -> WeaveResult<String> {
        self.render_impl(true)
    }

    /// Render without the doctype line (trailing newline kept).
    pub fn render_bare(&self) -> WeaveResult<String> {
        self.render_impl(false)
    }

    fn render_impl(&self, doctype: bool) -> WeaveResult<String> {
        let _ctx = TemplateCtxGuard::enter();
        let content = match &self.body {
            TemplateBody::Plain(body) => body(),
            TemplateBody::Layout(layout, fill) => {
                let component = layout();
                component.fill(|| fill(&component));
                Content::from(component)
            }
        };
        let mut nodes = Vec::new();
        content.collect_into(&mut nodes);
        let rendered = render_nodes(&nodes)?;

        let mut out = String::with_capacity(rendered.len() + 18);
        if doctype {
            out.push_str("<!doctype html>\n");
        }
        out.push_str(&rendered);
        out.push('\n');
        Ok(out)
    }
}

/// Render `content` as a complete document: doctype line, content,
/// trailing newline.
pub fn document(content: impl Into<Content>) -> WeaveResult<String> {
    let mut nodes = Vec::new();
    content.into().collect_into(&mut nodes);
    let rendered = render_nodes(&nodes)?;
    Ok(format!("<!doctype html>\n{rendered}\n"))
}
