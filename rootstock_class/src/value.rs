// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar and structured values exchanged with descriptors and loaders.
//!
//! [`Value`] is an explicit tagged union: scalar variants are what object
//! nodes store per property, while [`Value::Map`] and [`Value::List`] carry
//! the raw structured data a loader consumes. "Unset" is always represented
//! by absence (`Option<Value>` or a missing map entry), never by a null
//! variant.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// A dynamically typed property value.
///
/// # Example
///
/// ```rust
/// use rootstock_class::Value;
///
/// let v = Value::from("classic");
/// assert_eq!(v.as_str(), Some("classic"));
/// assert_eq!(v.as_number(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A number. All numeric properties share one representation.
    Number(f64),
    /// A string.
    Str(String),
    /// An opaque JSON document, kept as text and never interpreted.
    Json(String),
    /// An ordered sequence. Produced and consumed at the loader boundary.
    List(Vec<Value>),
    /// A keyed map. Produced and consumed at the loader boundary.
    Map(HashMap<String, Value>),
}

impl Value {
    /// Returns the boolean content, if this is a [`Value::Bool`].
    #[must_use]
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric content, if this is a [`Value::Number`].
    #[must_use]
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string content, if this is a [`Value::Str`].
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained sequence, if this is a [`Value::List`].
    #[must_use]
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the contained map, if this is a [`Value::Map`].
    #[must_use]
    #[inline]
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the contained map mutably, if this is a [`Value::Map`].
    #[must_use]
    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut HashMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` for the scalar variants an object node can store
    /// directly (everything except [`Value::List`] and [`Value::Map`]).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
