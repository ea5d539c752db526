//! Attribute index derivation and implicit type naming.
//!
//! The attribute index is the identity key used to deduplicate attributes
//! across transactions. Every caller must derive it through
//! [`attribute_index`] so that equal (type, value) pairs agree on the key.

use crate::{Label, Value};

/// Prefix of every attribute index.
pub const ATTRIBUTE_INDEX_PREFIX: &str = "ATTRIBUTE";

/// Prefix shared by implicit ownership types.
pub const HAS_PREFIX: &str = "@has-";

/// Prefix shared by implicit key types.
pub const KEY_PREFIX: &str = "@key-";

const OWNER_SUFFIX: &str = "-owner";
const VALUE_SUFFIX: &str = "-value";

/// Derive the attribute index of a value of the given attribute type.
pub fn attribute_index(label: &Label, value: &Value) -> String {
    index_for_canonical(label, &value.canonical())
}

/// Derive the attribute index from an already canonical value string.
pub fn index_for_canonical(label: &Label, canonical_value: &str) -> String {
    format!("{}-{}-{}", ATTRIBUTE_INDEX_PREFIX, label, canonical_value)
}

/// System-generated schema concepts backing attribute ownership and keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplicitType {
    /// Relation type `@has-<attr>`.
    Has,
    /// Role `@has-<attr>-owner`.
    HasOwner,
    /// Role `@has-<attr>-value`.
    HasValue,
    /// Relation type `@key-<attr>`.
    Key,
    /// Role `@key-<attr>-owner`.
    KeyOwner,
    /// Role `@key-<attr>-value`.
    KeyValue,
}

impl ImplicitType {
    /// Label of this implicit concept for the given attribute type.
    pub fn label(self, attribute_type: &Label) -> Label {
        let label = match self {
            ImplicitType::Has => format!("{}{}", HAS_PREFIX, attribute_type),
            ImplicitType::HasOwner => format!("{}{}{}", HAS_PREFIX, attribute_type, OWNER_SUFFIX),
            ImplicitType::HasValue => format!("{}{}{}", HAS_PREFIX, attribute_type, VALUE_SUFFIX),
            ImplicitType::Key => format!("{}{}", KEY_PREFIX, attribute_type),
            ImplicitType::KeyOwner => format!("{}{}{}", KEY_PREFIX, attribute_type, OWNER_SUFFIX),
            ImplicitType::KeyValue => format!("{}{}{}", KEY_PREFIX, attribute_type, VALUE_SUFFIX),
        };
        Label::new(label)
    }

    /// Whether the label names a key type or one of its roles.
    pub fn is_key(label: &Label) -> bool {
        label.as_str().starts_with(KEY_PREFIX)
    }

    /// Recover the attribute type label from an implicit label.
    ///
    /// Returns `None` for labels that are not implicit.
    pub fn explicit_label(label: &Label) -> Option<Label> {
        let raw = label.as_str();
        let rest = raw
            .strip_prefix(KEY_PREFIX)
            .or_else(|| raw.strip_prefix(HAS_PREFIX))?;
        let explicit = rest
            .strip_suffix(VALUE_SUFFIX)
            .or_else(|| rest.strip_suffix(OWNER_SUFFIX))
            .unwrap_or(rest);
        Some(Label::from(explicit))
    }
}
