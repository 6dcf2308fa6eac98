//! Tag catalog: the standard HTML tags and their layout classification.
//!
//! Each factory function builds a fresh element with the tag's fixed
//! `{inline, void, omit_end_tag}` configuration and registers it with the
//! ambient capture scope. The classification data follows the HTML standard
//! and carries no logic of its own.
//!
//! Custom tags go through [`TagDef`] directly:
//!
//! ```
//! use htmlweave::tags::TagDef;
//!
//! const ICON: TagDef = TagDef::content("x-icon", true);
//! let elem = ICON.el();
//! assert_eq!(elem.render().unwrap(), "<x-icon></x-icon>");
//! ```

use crate::node::{Content, Element};
use crate::scope;

// =============================================================================
// TagDef
// =============================================================================

/// A tag prototype: produces fresh elements of a fixed tag/inline/void
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDef {
    /// Tag name written to output.
    pub name: &'static str,
    /// Whether elements of this tag may share a line with siblings.
    pub inline: bool,
    /// Whether elements of this tag are void (no child content).
    pub void: bool,
    /// For void tags, whether the end tag is omitted (`<img>` vs.
    /// `<iframe></iframe>`).
    pub omit_end_tag: bool,
}

impl TagDef {
    /// Define a content-bearing tag.
    pub const fn content(name: &'static str, inline: bool) -> Self {
        Self {
            name,
            inline,
            void: false,
            omit_end_tag: false,
        }
    }

    /// Define a void tag.
    pub const fn void(name: &'static str, inline: bool, omit_end_tag: bool) -> Self {
        Self {
            name,
            inline,
            void: true,
            omit_end_tag,
        }
    }

    /// Build a fresh element and register it with the ambient capture scope.
    pub fn el(&self) -> Element {
        let elem = if self.void {
            Element::new_void(self.name, self.inline, self.omit_end_tag)
        } else {
            Element::new(self.name, self.inline)
        };
        scope::register(&Content::from(elem.clone()));
        elem
    }
}

// =============================================================================
// Factory functions
// =============================================================================

macro_rules! content_tags {
    ($($name:ident => $tag:literal, inline: $inline:literal;)*) => {
        $(
            #[doc = concat!("`<", $tag, ">` element factory.")]
            pub fn $name() -> Element {
                TagDef::content($tag, $inline).el()
            }
        )*
    };
}

macro_rules! void_tags {
    ($($name:ident => $tag:literal, inline: $inline:literal, omit_end_tag: $omit:literal;)*) => {
        $(
            #[doc = concat!("`<", $tag, ">` element factory (void).")]
            pub fn $name() -> Element {
                TagDef::void($tag, $inline, $omit).el()
            }
        )*
    };
}

content_tags! {
    html => "html", inline: false;
    head => "head", inline: false;
    title => "title", inline: false;
    style => "style", inline: false;
    body => "body", inline: false;
    article => "article", inline: false;
    section => "section", inline: false;
    nav => "nav", inline: false;
    aside => "aside", inline: false;
    h1 => "h1", inline: false;
    h2 => "h2", inline: false;
    h3 => "h3", inline: false;
    h4 => "h4", inline: false;
    h5 => "h5", inline: false;
    h6 => "h6", inline: false;
    hgroup => "hgroup", inline: false;
    header => "header", inline: false;
    footer => "footer", inline: false;
    address => "address", inline: false;
    p => "p", inline: false;
    pre => "pre", inline: false;
    blockquote => "blockquote", inline: false;
    ol => "ol", inline: false;
    ul => "ul", inline: false;
    menu => "menu", inline: false;
    li => "li", inline: false;
    dl => "dl", inline: false;
    dt => "dt", inline: false;
    dd => "dd", inline: false;
    figure => "figure", inline: false;
    figcaption => "figcaption", inline: false;
    main => "main", inline: false;
    search => "search", inline: false;
    div => "div", inline: false;
    a => "a", inline: true;
    em => "em", inline: true;
    strong => "strong", inline: true;
    small => "small", inline: true;
    s => "s", inline: true;
    cite => "cite", inline: true;
    q => "q", inline: true;
    dfn => "dfn", inline: true;
    abbr => "abbr", inline: true;
    ruby => "ruby", inline: true;
    rt => "rt", inline: true;
    rp => "rp", inline: true;
    data => "data", inline: true;
    time => "time", inline: true;
    code => "code", inline: true;
    var => "var", inline: true;
    samp => "samp", inline: true;
    kbd => "kbd", inline: true;
    sub => "sub", inline: true;
    sup => "sup", inline: true;
    i => "i", inline: true;
    b => "b", inline: true;
    u => "u", inline: true;
    mark => "mark", inline: true;
    bdi => "bdi", inline: true;
    bdo => "bdo", inline: true;
    span => "span", inline: true;
    ins => "ins", inline: true;
    del => "del", inline: true;
    picture => "picture", inline: false;
    object => "object", inline: false;
    video => "video", inline: false;
    audio => "audio", inline: false;
    map => "map", inline: false;
    table => "table", inline: false;
    caption => "caption", inline: false;
    colgroup => "colgroup", inline: false;
    tbody => "tbody", inline: false;
    thead => "thead", inline: false;
    tfoot => "tfoot", inline: false;
    tr => "tr", inline: false;
    td => "td", inline: false;
    th => "th", inline: false;
    form => "form", inline: false;
    label => "label", inline: false;
    button => "button", inline: false;
    select => "select", inline: false;
    datalist => "datalist", inline: false;
    optgroup => "optgroup", inline: false;
    option => "option", inline: false;
    textarea => "textarea", inline: false;
    output => "output", inline: false;
    progress => "progress", inline: false;
    meter => "meter", inline: false;
    fieldset => "fieldset", inline: false;
    legend => "legend", inline: false;
    details => "details", inline: false;
    summary => "summary", inline: false;
    dialog => "dialog", inline: false;
    script => "script", inline: false;
    noscript => "noscript", inline: false;
    template => "template", inline: false;
    slot => "slot", inline: false;
    canvas => "canvas", inline: false;
}

void_tags! {
    base => "base", inline: false, omit_end_tag: true;
    link => "link", inline: false, omit_end_tag: true;
    meta => "meta", inline: false, omit_end_tag: true;
    hr => "hr", inline: false, omit_end_tag: true;
    br => "br", inline: true, omit_end_tag: true;
    wbr => "wbr", inline: true, omit_end_tag: true;
    source => "source", inline: false, omit_end_tag: true;
    img => "img", inline: true, omit_end_tag: true;
    iframe => "iframe", inline: false, omit_end_tag: false;
    embed => "embed", inline: false, omit_end_tag: true;
    track => "track", inline: false, omit_end_tag: true;
    area => "area", inline: false, omit_end_tag: true;
    col => "col", inline: false, omit_end_tag: true;
    input => "input", inline: false, omit_end_tag: true;
}
