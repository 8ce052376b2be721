// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived classes and property-table merging.
//!
//! A derived class is built from a base [`ClassDescriptor`] plus a
//! [`ClassOverrides`]: the base's property table is merged with the
//! overrides in an order-preserving way, behavior hooks are replaced or
//! kept per field, and pre-load hooks are concatenated so base transforms
//! run before derived ones. [`ClassRegistry::derive`] performs the merge
//! and registers the result in one step, recording the base as the new
//! class's parent for subclass queries.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::descriptor::{
    BeforeLoadHook, ClassDescriptor, DefaultFactory, LabelHook, PropertyDescriptor,
};
use crate::registry::{ClassId, ClassRegistry};

/// The overriding half of a class derivation.
///
/// Every field except the name is optional; `None` keeps the base's value.
/// Property overrides are merged by name via [`merge_properties`].
///
/// # Example
///
/// ```rust
/// use rootstock_class::{
///     ClassDescriptor, ClassOverrides, ClassRegistry, PropertyDescriptor, PropertyKind, Value,
/// };
///
/// let mut registry = ClassRegistry::new();
/// let widget = registry.register(
///     ClassDescriptor::new("Widget")
///         .with_property(PropertyDescriptor::new("width", PropertyKind::Number)),
/// );
/// let button = registry.derive(
///     widget,
///     ClassOverrides::new("Button")
///         .with_property(PropertyDescriptor::new("width", PropertyKind::Number).default(Value::Number(80.0)))
///         .with_property(PropertyDescriptor::new("text", PropertyKind::String)),
/// );
///
/// let table = registry.get(button).unwrap().property_table();
/// assert_eq!(table[0].name(), "width");
/// assert_eq!(table[1].name(), "text");
/// assert!(registry.is_proper_subclass_of(button, widget));
/// ```
#[derive(Debug)]
pub struct ClassOverrides {
    name: &'static str,
    properties: Vec<PropertyDescriptor>,
    label: Option<LabelHook>,
    before_load: SmallVec<[BeforeLoadHook; 2]>,
    inherit_link: Option<&'static str>,
    default_value: Option<DefaultFactory>,
}

impl ClassOverrides {
    /// Creates an override set that changes nothing but the class name.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            properties: Vec::new(),
            label: None,
            before_load: SmallVec::new(),
            inherit_link: None,
            default_value: None,
        }
    }

    /// Adds a property that overrides a same-named base property in place,
    /// or is appended after the base table otherwise.
    #[must_use]
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Replaces the base's label hook.
    #[must_use]
    pub fn label(mut self, hook: LabelHook) -> Self {
        self.label = Some(hook);
        self
    }

    /// Appends a pre-load hook that runs after all base hooks.
    #[must_use]
    pub fn before_load(mut self, hook: BeforeLoadHook) -> Self {
        self.before_load.push(hook);
        self
    }

    /// Replaces the base's inherit-link property name.
    #[must_use]
    pub const fn inherit_link(mut self, property_name: &'static str) -> Self {
        self.inherit_link = Some(property_name);
        self
    }

    /// Replaces the base's default-data factory.
    #[must_use]
    pub fn default_factory(mut self, factory: DefaultFactory) -> Self {
        self.default_value = Some(factory);
        self
    }
}

/// Merges a base property table with override descriptors.
///
/// The result preserves the base's order: a same-named override replaces
/// the base descriptor in its original slot, and override-only descriptors
/// are appended afterward in the order given. Base descriptors without an
/// override are kept unchanged, so a property's slot index is stable across
/// derivation unless the base itself changes.
#[must_use]
pub fn merge_properties(
    base: &[PropertyDescriptor],
    overrides: Vec<PropertyDescriptor>,
) -> Vec<PropertyDescriptor> {
    let mut merged: Vec<PropertyDescriptor> = Vec::with_capacity(base.len() + overrides.len());
    let mut overrides = overrides;

    for p in base {
        match overrides.iter().position(|o| o.name() == p.name()) {
            Some(i) => merged.push(overrides.remove(i)),
            None => merged.push(p.clone()),
        }
    }
    merged.append(&mut overrides);
    merged
}

impl ClassRegistry {
    /// Derives a new class from `base` and registers it.
    ///
    /// The new class's property table is [`merge_properties`] of the base's
    /// table and the overrides. The label hook, inherit link, and default
    /// factory are taken from the overrides when present, otherwise kept
    /// from the base. Pre-load hooks are concatenated, base first. The base
    /// becomes the new class's parent.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not a class of this registry, or under the same
    /// conditions as [`ClassRegistry::register`].
    pub fn derive(&mut self, base: ClassId, overrides: ClassOverrides) -> ClassId {
        let Some(base_descriptor) = self.get(base) else {
            panic!("derive from unknown class {base}");
        };
        let (base_props, base_label, base_hooks, base_link, base_default) =
            base_descriptor.parts();

        let properties = merge_properties(base_props, overrides.properties);

        let mut descriptor = ClassDescriptor::new(overrides.name).properties(properties);
        if let Some(hook) = overrides.label.or(base_label) {
            descriptor = descriptor.label(hook);
        }
        for hook in base_hooks.iter().chain(&overrides.before_load) {
            descriptor = descriptor.before_load(*hook);
        }
        if let Some(link) = overrides.inherit_link.or(base_link) {
            descriptor = descriptor.inherit_link(link);
        }
        if let Some(factory) = overrides.default_value.or(base_default) {
            descriptor = descriptor.default_factory(factory);
        }
        descriptor.set_parent(base);

        self.register(descriptor)
    }
}
