// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property and class descriptors.
//!
//! A [`PropertyDescriptor`] is the static metadata for one field of an
//! entity kind: its [`PropertyKind`] tag, default, visibility rules, and
//! grouping. A [`ClassDescriptor`] is the ordered table of property
//! descriptors for one entity kind plus its behavior hooks. Descriptors are
//! built once at startup and registered in a
//! [`ClassRegistry`](crate::ClassRegistry).
//!
//! All hooks are plain `fn` pointers, so descriptors stay `Clone` and the
//! dispatch tables remain explicit.

use alloc::string::String;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::kind::{Group, PropertyKind};
use crate::registry::ClassId;
use crate::value::Value;

/// Read access to an entity's scalar property values.
///
/// This is the seam that lets visibility predicates and label hooks inspect
/// an entity without this crate depending on any particular object-graph
/// representation. The graph crate implements it for its node views.
pub trait PropertyAccess {
    /// Returns the locally stored scalar value of `name`, if set.
    fn scalar(&self, name: &str) -> Option<&Value>;
}

/// A visibility predicate evaluated against a live entity.
pub type PredicateFn = fn(&dyn PropertyAccess, &PropertyDescriptor) -> bool;

/// A conditional yes/no rule, optionally consulting the entity.
#[derive(Copy, Clone, Debug)]
pub enum Predicate {
    /// Unconditionally true.
    Always,
    /// Unconditionally false.
    Never,
    /// Decided per entity.
    When(PredicateFn),
}

impl Predicate {
    /// Evaluates the predicate for `entity` and `property`.
    #[must_use]
    pub fn evaluate(&self, entity: &dyn PropertyAccess, property: &PropertyDescriptor) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::When(f) => f(entity, property),
        }
    }
}

/// Formats a display label for an entity.
pub type LabelHook = fn(&dyn PropertyAccess) -> Option<String>;

/// Transforms raw loader data before an entity is constructed from it.
pub type BeforeLoadHook = fn(&mut Value);

/// Produces the initial raw data for a newly created entity.
pub type DefaultFactory = fn() -> Value;

/// Static metadata for one field of an entity kind.
///
/// # Example
///
/// ```rust
/// use rootstock_class::{PropertyDescriptor, PropertyKind, Value};
///
/// let opacity = PropertyDescriptor::new("opacity", PropertyKind::Number)
///     .inheritable()
///     .default(Value::Number(1.0));
///
/// assert_eq!(opacity.name(), "opacity");
/// assert!(opacity.is_inheritable());
/// assert_eq!(opacity.display_label(), "Opacity");
/// ```
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    name: &'static str,
    kind: PropertyKind,
    display_name: Option<&'static str>,
    default_value: Option<Value>,
    is_unique: bool,
    is_optional: bool,
    is_inheritable: bool,
    group: Option<Group>,
    hidden: Predicate,
    enumerable: Predicate,
    always_show_container: bool,
}

impl PropertyDescriptor {
    /// Creates a descriptor with the given name and kind.
    ///
    /// Defaults: visible, enumerable, not unique, not optional, not
    /// inheritable, no default value, no group.
    #[must_use]
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            display_name: None,
            default_value: None,
            is_unique: false,
            is_optional: false,
            is_inheritable: false,
            group: None,
            hidden: Predicate::Never,
            enumerable: Predicate::Always,
            always_show_container: false,
        }
    }

    /// Sets an explicit display name.
    #[must_use]
    pub const fn display_name(mut self, display_name: &'static str) -> Self {
        self.display_name = Some(display_name);
        self
    }

    /// Sets the default value callers fall back to when nothing is set and
    /// no inherited value resolves.
    #[must_use]
    pub fn default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Marks the property as unique among its siblings (typically a name).
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Marks the property as optional for loaders.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Marks the property as participating in inherited-value resolution.
    #[must_use]
    pub const fn inheritable(mut self) -> Self {
        self.is_inheritable = true;
        self
    }

    /// Assigns the property to a grid group.
    #[must_use]
    pub const fn group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    /// Hides the property from grids unconditionally.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = Predicate::Always;
        self
    }

    /// Hides the property from grids when `f` returns `true`.
    #[must_use]
    pub const fn hide_when(mut self, f: PredicateFn) -> Self {
        self.hidden = Predicate::When(f);
        self
    }

    /// Excludes the property from tree-children computation unconditionally.
    #[must_use]
    pub const fn not_enumerable(mut self) -> Self {
        self.enumerable = Predicate::Never;
        self
    }

    /// Includes the property in tree-children computation only when `f`
    /// returns `true`.
    #[must_use]
    pub const fn enumerable_when(mut self, f: PredicateFn) -> Self {
        self.enumerable = Predicate::When(f);
        self
    }

    /// Keeps the container node visible even when it is an entity's only
    /// array property (suppresses single-array container elision).
    #[must_use]
    pub const fn show_container(mut self) -> Self {
        self.always_show_container = true;
        self
    }

    /// The property name, unique within its owning class.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The property's type tag.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// The default value, if one is declared.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Whether the value must be unique among siblings.
    #[must_use]
    #[inline]
    pub const fn is_unique(&self) -> bool {
        self.is_unique
    }

    /// Whether loaders may omit the property.
    #[must_use]
    #[inline]
    pub const fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// Whether the property participates in inherited-value resolution.
    #[must_use]
    #[inline]
    pub const fn is_inheritable(&self) -> bool {
        self.is_inheritable
    }

    /// The grid group, if assigned.
    #[must_use]
    #[inline]
    pub const fn group_tag(&self) -> Option<Group> {
        self.group
    }

    /// Whether container elision is suppressed for this property.
    #[must_use]
    #[inline]
    pub const fn always_show_container(&self) -> bool {
        self.always_show_container
    }

    /// Evaluates the grid-visibility rule for `entity`.
    #[must_use]
    pub fn is_hidden(&self, entity: &dyn PropertyAccess) -> bool {
        self.hidden.evaluate(entity, self)
    }

    /// Evaluates the tree-children rule for `entity`.
    #[must_use]
    pub fn is_enumerable(&self, entity: &dyn PropertyAccess) -> bool {
        self.enumerable.evaluate(entity, self)
    }

    /// The label shown for this property: the explicit display name when
    /// set, otherwise the humanized property name.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.display_name {
            Some(name) => String::from(name),
            None => humanize(self.name),
        }
    }
}

/// Turns a `snake_case` identifier into a sentence-cased label.
#[must_use]
pub fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, ch) in name.chars().enumerate() {
        if ch == '_' {
            out.push(' ');
        } else if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Static metadata for one entity kind: an ordered property table plus
/// behavior hooks.
///
/// Properties are addressed by their `u16` slot index within the class,
/// assigned in declaration order. Derived classes get a merged table via
/// [`ClassRegistry::derive`](crate::ClassRegistry::derive).
///
/// # Example
///
/// ```rust
/// use rootstock_class::{ClassDescriptor, PropertyDescriptor, PropertyKind};
///
/// let style = ClassDescriptor::new("Style")
///     .with_property(PropertyDescriptor::new("name", PropertyKind::String).unique())
///     .with_property(PropertyDescriptor::new("color", PropertyKind::String).inheritable())
///     .inherit_link("inherit_from");
///
/// let (slot, color) = style.property("color").unwrap();
/// assert_eq!(slot, 1);
/// assert!(color.is_inheritable());
/// ```
#[derive(Clone, Debug)]
pub struct ClassDescriptor {
    name: &'static str,
    properties: Vec<PropertyDescriptor>,
    parent: Option<ClassId>,
    label: Option<LabelHook>,
    before_load: SmallVec<[BeforeLoadHook; 2]>,
    inherit_link: Option<&'static str>,
    default_value: Option<DefaultFactory>,
}

impl ClassDescriptor {
    /// Creates an empty descriptor for the named entity kind.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            properties: Vec::new(),
            parent: None,
            label: None,
            before_load: SmallVec::new(),
            inherit_link: None,
            default_value: None,
        }
    }

    /// Appends one property descriptor.
    #[must_use]
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Replaces the property table wholesale.
    #[must_use]
    pub fn properties(mut self, properties: Vec<PropertyDescriptor>) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the label formatter hook.
    #[must_use]
    pub fn label(mut self, hook: LabelHook) -> Self {
        self.label = Some(hook);
        self
    }

    /// Appends a pre-load transform hook.
    ///
    /// Hooks run in list order against the raw data before construction;
    /// derived classes append their hooks after the base's, so base
    /// transformations are visible to derived ones.
    #[must_use]
    pub fn before_load(mut self, hook: BeforeLoadHook) -> Self {
        self.before_load.push(hook);
        self
    }

    /// Declares the property whose string value names the entity this one
    /// inherits unset values from.
    #[must_use]
    pub const fn inherit_link(mut self, property_name: &'static str) -> Self {
        self.inherit_link = Some(property_name);
        self
    }

    /// Sets the factory producing raw data for a newly created entity.
    #[must_use]
    pub fn default_factory(mut self, factory: DefaultFactory) -> Self {
        self.default_value = Some(factory);
        self
    }

    /// The class name, unique within a registry.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The ordered property table.
    #[must_use]
    #[inline]
    pub fn property_table(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Finds a property by name, returning its slot index and descriptor.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<(u16, &PropertyDescriptor)> {
        let idx = self.properties.iter().position(|p| p.name() == name)?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "table length is checked on registration"
        )]
        let slot = idx as u16;
        Some((slot, &self.properties[idx]))
    }

    /// Returns the property at `slot`, if any.
    #[must_use]
    pub fn property_at(&self, slot: u16) -> Option<&PropertyDescriptor> {
        self.properties.get(usize::from(slot))
    }

    /// The base class this descriptor was derived from, if any.
    #[must_use]
    #[inline]
    pub const fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// Formats the entity label via the label hook, if one is set.
    #[must_use]
    pub fn label_for(&self, entity: &dyn PropertyAccess) -> Option<String> {
        self.label.and_then(|hook| hook(entity))
    }

    /// Runs the pre-load hook list, in order, against `raw`.
    pub fn run_before_load(&self, raw: &mut Value) {
        for hook in &self.before_load {
            hook(raw);
        }
    }

    /// The name of the inherit-from property, if the class declares one.
    #[must_use]
    #[inline]
    pub const fn inherit_link_property(&self) -> Option<&'static str> {
        self.inherit_link
    }

    /// Produces raw data for a new entity via the default factory.
    #[must_use]
    pub fn default_raw(&self) -> Option<Value> {
        self.default_value.map(|factory| factory())
    }

    pub(crate) fn set_parent(&mut self, parent: ClassId) {
        self.parent = Some(parent);
    }

    pub(crate) fn parts(
        &self,
    ) -> (
        &[PropertyDescriptor],
        Option<LabelHook>,
        &SmallVec<[BeforeLoadHook; 2]>,
        Option<&'static str>,
        Option<DefaultFactory>,
    ) {
        (
            &self.properties,
            self.label,
            &self.before_load,
            self.inherit_link,
            self.default_value,
        )
    }
}
