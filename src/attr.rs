//! Attribute codec: name normalization, validation, and value storage.
//!
//! Attribute names go through two steps before they are stored:
//!
//! 1. **Normalization** - a trailing run of underscores is stripped and the
//!    remaining underscores become hyphens, so callers can write `class_` or
//!    `data_foo` without colliding with keywords. The literal name `_` is
//!    passed through unchanged.
//! 2. **Validation** - the normalized name must match the HTML
//!    attribute-name grammar. Violations fail with
//!    [`WeaveError::InvalidAttributeName`] at the call site, never at render
//!    time.
//!
//! Values are stored unescaped; escaping happens once, in the serializer.

use compact_str::{CompactString, ToCompactString};

use crate::error::{WeaveError, WeaveResult};

// =============================================================================
// Attrs
// =============================================================================

/// Stored attribute value: a quoted string or a bare (minimized) attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrEntry {
    /// Regular `name="value"` attribute; escaped on write.
    Value(CompactString),
    /// Minimized boolean attribute, written as the bare name.
    Bare,
}

/// Element attributes as ordered key-value pairs.
///
/// Insertion order is preserved for output; last write wins per name while
/// keeping the first-write position.
pub type Attrs = Vec<(CompactString, AttrEntry)>;

/// Extension trait for attribute operations on [`Attrs`].
pub trait AttrsExt {
    /// Get an attribute entry by name.
    fn get_attr(&self, name: &str) -> Option<&AttrEntry>;

    /// Check if an attribute exists.
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute entry (insert or update in place).
    fn set_attr(&mut self, name: CompactString, entry: AttrEntry);

    /// Remove an attribute by name, returning the old entry if present.
    fn remove_attr(&mut self, name: &str) -> Option<AttrEntry>;
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&AttrEntry> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: CompactString, entry: AttrEntry) {
        if let Some(attr) = self.iter_mut().find(|(k, _)| *k == name) {
            attr.1 = entry;
        } else {
            self.push((name, entry));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<AttrEntry> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// AttrValue (caller-supplied values)
// =============================================================================

/// A value accepted by [`Element::attr`](crate::Element::attr).
///
/// Strings and scalars coerce to text. Booleans carry add/remove semantics:
/// `true` stores a bare minimized attribute, `false` removes any previously
/// stored entry for that name.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Text value, written as `name="value"`.
    Text(CompactString),
    /// Boolean flag; `true` adds a bare attribute, `false` removes it.
    Flag(bool),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(CompactString::from(s))
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(CompactString::from(s))
    }
}

impl From<CompactString> for AttrValue {
    fn from(s: CompactString) -> Self {
        AttrValue::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        AttrValue::Flag(flag)
    }
}

macro_rules! attr_value_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(v: $ty) -> Self {
                    AttrValue::Text(v.to_compact_string())
                }
            }
        )*
    };
}

attr_value_from_scalar!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

// =============================================================================
// Name normalization & validation
// =============================================================================

/// Characters forbidden anywhere in an attribute name.
///
/// The HTML attribute-name grammar excludes the syntax-significant
/// punctuation below along with whitespace and control characters.
const FORBIDDEN: &[char] = &['&', '<', '>', ';', '"', '\'', '/', '='];

/// Normalize a caller-supplied attribute name and validate the result.
///
/// A trailing run of underscores is stripped and internal underscores become
/// hyphens. The literal name `_` is the escape hatch for the actual `_`
/// attribute and passes through untouched.
pub fn normalize_name(name: &str) -> WeaveResult<CompactString> {
    let normalized = if name == "_" {
        CompactString::const_new("_")
    } else {
        let stripped = name.trim_end_matches('_');
        if stripped.contains('_') {
            CompactString::from(stripped.replace('_', "-"))
        } else {
            CompactString::from(stripped)
        }
    };

    if !is_valid_name(&normalized) {
        return Err(WeaveError::invalid_name(name));
    }
    Ok(normalized)
}

/// Check a normalized name against the attribute-name grammar.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !FORBIDDEN.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_operations() {
        let mut attrs: Attrs = Vec::new();

        attrs.set_attr("id".into(), AttrEntry::Value("main".into()));
        attrs.set_attr("class".into(), AttrEntry::Value("container".into()));
        assert_eq!(attrs.len(), 2);

        assert_eq!(attrs.get_attr("id"), Some(&AttrEntry::Value("main".into())));
        assert!(attrs.has_attr("class"));
        assert!(!attrs.has_attr("href"));

        // Update keeps position
        attrs.set_attr("id".into(), AttrEntry::Value("other".into()));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].0, "id");

        let removed = attrs.remove_attr("id");
        assert_eq!(removed, Some(AttrEntry::Value("other".into())));
        assert!(!attrs.has_attr("id"));
    }

    #[test]
    fn test_normalize_strips_trailing_underscores() {
        assert_eq!(normalize_name("class_").unwrap(), "class");
        assert_eq!(normalize_name("for__").unwrap(), "for");
    }

    #[test]
    fn test_normalize_maps_inner_underscores_to_hyphens() {
        assert_eq!(normalize_name("data_foo").unwrap(), "data-foo");
        assert_eq!(normalize_name("data_foo_bar_").unwrap(), "data-foo-bar");
    }

    #[test]
    fn test_single_underscore_passes_through() {
        assert_eq!(normalize_name("_").unwrap(), "_");
    }

    #[test]
    fn test_valid_names_survive_normalization() {
        for name in ["href", "data-x", "aria-label", "x:y", "@click", "?cond"] {
            let normalized = normalize_name(name).unwrap();
            assert!(is_valid_name(&normalized), "{name} should stay valid");
        }
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for name in ["", "__", "a b", "a\"b", "a'b", "a/b", "a=b", "a<b", "a>b", "a&b", "a;b"] {
            let err = normalize_name(name).unwrap_err();
            assert_eq!(err, WeaveError::invalid_name(name));
        }
    }

    #[test]
    fn test_scalar_values_coerce_to_text() {
        assert_eq!(AttrValue::from(42), AttrValue::Text("42".into()));
        assert_eq!(AttrValue::from(1.5), AttrValue::Text("1.5".into()));
        assert_eq!(AttrValue::from("x"), AttrValue::Text("x".into()));
        assert_eq!(AttrValue::from(true), AttrValue::Flag(true));
    }
}
