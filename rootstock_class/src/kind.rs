// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property type tags and grouping metadata.

use crate::value::Value;

/// One choice of an enumerated property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnumItem {
    /// The stored identifier.
    pub id: &'static str,
    /// An optional display label; falls back to `id` when absent.
    pub label: Option<&'static str>,
}

impl EnumItem {
    /// Creates an item whose label is its identifier.
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self { id, label: None }
    }

    /// Creates an item with a distinct display label.
    #[must_use]
    pub const fn labeled(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label: Some(label),
        }
    }
}

/// A property-grid grouping tag.
///
/// Groups are application-defined constants; `position` orders them in a
/// grid, lower first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Group {
    /// Stable identifier.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Sort position among groups.
    pub position: i32,
}

/// The type tag of a property.
///
/// Container kinds ([`PropertyKind::Object`] and [`PropertyKind::Array`])
/// carry the *name* of their element class; the registry resolves it on
/// demand. Carrying the name in the variant makes "container kinds always
/// have an element type" a structural invariant rather than a validation
/// rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// A string scalar.
    String,
    /// A numeric scalar.
    Number,
    /// A boolean scalar.
    Boolean,
    /// One of a fixed set of choices, stored as the item's id string.
    Enum(&'static [EnumItem]),
    /// A by-name reference to an entity in another collection.
    Reference {
        /// Path of the referenced collection, from the project root.
        collection: &'static [&'static str],
    },
    /// A nested entity of the named class.
    Object(&'static str),
    /// An ordered sequence of entities of the named class.
    Array(&'static str),
    /// An opaque JSON document, stored as text.
    Json,
}

impl PropertyKind {
    /// Returns `true` for the kinds whose value is a child node rather than
    /// a stored scalar.
    #[must_use]
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    /// Returns the element class name for container kinds.
    #[must_use]
    #[inline]
    pub fn element_class(self) -> Option<&'static str> {
        match self {
            Self::Object(name) | Self::Array(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if `value` is an acceptable scalar for this kind.
    ///
    /// Container kinds accept no scalar at all. Enumerated and reference
    /// kinds store strings; [`PropertyKind::Json`] stores its document text.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String | Self::Enum(_) | Self::Reference { .. } => {
                matches!(value, Value::Str(_))
            }
            Self::Number => matches!(value, Value::Number(_)),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Json => matches!(value, Value::Json(_) | Value::Str(_)),
            Self::Object(_) | Self::Array(_) => false,
        }
    }
}
