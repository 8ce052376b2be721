// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rootstock Class: Class and property descriptor metadata.
//!
//! This crate is the metadata half of the Rootstock object model: it knows
//! what entity kinds exist and what fields they carry, but nothing about any
//! particular object graph. The graph, selection, and inheritance crates
//! build on the descriptors registered here.
//!
//! ## Core Concepts
//!
//! ### Descriptors
//!
//! A [`PropertyDescriptor`] describes one field of an entity kind: its
//! [`PropertyKind`] tag, default value, visibility rules, and grid grouping.
//! A [`ClassDescriptor`] is the ordered property table for one kind plus its
//! behavior hooks (label formatting, pre-load transforms, inherit link,
//! default data). Hooks are plain `fn` pointers, so descriptors stay `Clone`.
//!
//! ### Registry
//!
//! [`ClassRegistry`] assigns each registered class a compact [`ClassId`]
//! handle and answers name lookups and subclass queries. Derived classes are
//! built with [`ClassRegistry::derive`]: the base's property table and the
//! overrides are merged order-preservingly by [`merge_properties`], and the
//! base is recorded as the parent for [`ClassRegistry::is_subclass_of`].
//!
//! ## Quick Start
//!
//! ```rust
//! use rootstock_class::{
//!     ClassDescriptor, ClassOverrides, ClassRegistry, PropertyDescriptor, PropertyKind, Value,
//! };
//!
//! let mut registry = ClassRegistry::new();
//!
//! let widget = registry.register(
//!     ClassDescriptor::new("Widget")
//!         .with_property(PropertyDescriptor::new("name", PropertyKind::String).unique())
//!         .with_property(PropertyDescriptor::new("width", PropertyKind::Number)),
//! );
//!
//! let button = registry.derive(
//!     widget,
//!     ClassOverrides::new("Button")
//!         .with_property(PropertyDescriptor::new("text", PropertyKind::String)),
//! );
//!
//! // The derived table keeps the base's order and appends new properties.
//! let descriptor = registry.get(button).unwrap();
//! let (slot, text) = descriptor.property("text").unwrap();
//! assert_eq!(slot, 2);
//! assert_eq!(text.display_label(), "Text");
//!
//! assert!(registry.is_subclass_of(button, widget));
//! assert_eq!(registry.lookup("Button"), Some(button));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod derive;
mod descriptor;
mod kind;
mod registry;
mod value;

pub use derive::{ClassOverrides, merge_properties};
pub use descriptor::{
    BeforeLoadHook, ClassDescriptor, DefaultFactory, LabelHook, Predicate, PredicateFn,
    PropertyAccess, PropertyDescriptor, humanize,
};
pub use kind::{EnumItem, Group, PropertyKind};
pub use registry::{ClassId, ClassRegistry};
pub use value::Value;
