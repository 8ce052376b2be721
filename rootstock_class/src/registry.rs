// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class registry and subclass queries.
//!
//! [`ClassRegistry`] maps class names to [`ClassDescriptor`]s and hands out
//! compact [`ClassId`] handles. It is an explicit object with no global
//! state: tests and embedders may hold as many independent registries as
//! they need.

use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

use crate::descriptor::ClassDescriptor;

/// A runtime class identifier.
///
/// A lightweight handle (u16) that uniquely identifies a class within one
/// [`ClassRegistry`]. Handles from different registries must not be mixed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u16);

impl ClassId {
    /// Creates a class ID from a raw index.
    ///
    /// Typically called by [`ClassRegistry::register`] rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassId").field(&self.0).finish()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// A registry of class descriptors.
///
/// Classes are registered once at startup; the registry then answers name
/// lookups and subclass-chain queries. Lookup misses are `None`, never a
/// panic. Registration misuse (duplicate names, duplicate property names,
/// handle overflow) panics, since those are programming errors in the
/// descriptor tables.
///
/// # Example
///
/// ```rust
/// use rootstock_class::{ClassDescriptor, ClassRegistry, PropertyDescriptor, PropertyKind};
///
/// let mut registry = ClassRegistry::new();
/// let widget = registry.register(
///     ClassDescriptor::new("Widget")
///         .with_property(PropertyDescriptor::new("name", PropertyKind::String)),
/// );
///
/// assert_eq!(registry.lookup("Widget"), Some(widget));
/// assert_eq!(registry.lookup("Gadget"), None);
/// assert!(registry.is_subclass_of(widget, widget));
/// ```
#[derive(Default)]
pub struct ClassRegistry {
    classes: Vec<ClassDescriptor>,
    by_name: HashMap<&'static str, ClassId>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class descriptor under its unique name.
    ///
    /// # Panics
    ///
    /// Panics if a class with the same name is already registered, if the
    /// descriptor's property names are not unique, or if more than 65,535
    /// classes are registered.
    pub fn register(&mut self, descriptor: ClassDescriptor) -> ClassId {
        let name = descriptor.name();
        assert!(
            !self.by_name.contains_key(name),
            "class `{name}` is already registered"
        );
        assert!(
            self.classes.len() < usize::from(u16::MAX),
            "too many classes registered (max {})",
            u16::MAX
        );
        assert!(
            u16::try_from(descriptor.property_table().len()).is_ok(),
            "class `{name}` has too many properties"
        );
        let table = descriptor.property_table();
        for (i, p) in table.iter().enumerate() {
            assert!(
                !table[..i].iter().any(|q| q.name() == p.name()),
                "class `{name}` declares property `{}` twice",
                p.name()
            );
        }

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = ClassId::new(self.classes.len() as u16);
        self.classes.push(descriptor);
        self.by_name.insert(name, id);
        id
    }

    /// Returns the number of registered classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Returns the descriptor for `id`.
    #[must_use]
    pub fn get(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(usize::from(id.index()))
    }

    /// Returns the name of a class.
    #[must_use]
    pub fn name(&self, id: ClassId) -> Option<&'static str> {
        self.get(id).map(ClassDescriptor::name)
    }

    /// Returns `true` if `class` is `base` or derives from it, walking the
    /// parent chain.
    #[must_use]
    pub fn is_subclass_of(&self, class: ClassId, base: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == base {
                return true;
            }
            current = self.get(id).and_then(ClassDescriptor::parent);
        }
        false
    }

    /// Returns `true` if `class` strictly derives from `base`.
    #[must_use]
    pub fn is_proper_subclass_of(&self, class: ClassId, base: ClassId) -> bool {
        match self.get(class).and_then(ClassDescriptor::parent) {
            Some(parent) => self.is_subclass_of(parent, base),
            None => false,
        }
    }

    /// Returns every class that strictly derives from `base`, in
    /// registration order.
    #[must_use]
    pub fn subclasses_of(&self, base: ClassId) -> Vec<ClassId> {
        self.iter()
            .filter(|(id, _)| self.is_proper_subclass_of(*id, base))
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns an iterator over all registered classes.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDescriptor)> {
        self.classes.iter().enumerate().map(|(i, c)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            let id = ClassId::new(i as u16);
            (id, c)
        })
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("count", &self.classes.len())
            .field("classes", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}
