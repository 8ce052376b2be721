// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rootstock Inherit: inherited-value resolution along named override
//! chains.
//!
//! Some entity kinds let an instance name another instance of the same
//! family to inherit unset values from: a style that says
//! `inherit_from = "base"` picks up every property it does not set locally
//! from the style named `base`, which may in turn inherit further. The
//! class declares *which* property carries the link
//! ([`ClassDescriptor::inherit_link`](rootstock_class::ClassDescriptor::inherit_link));
//! how a name maps to a node is the caller's business, supplied here as a
//! [`NamedLookup`] collaborator.
//!
//! [`resolve_value`] walks that chain: a locally set value wins
//! immediately, otherwise the link is followed until some node has the
//! value or the chain ends. [`effective_value`] adds the final fallback to
//! the property's declared default.
//!
//! Chains are expected to be acyclic (the naming collaborator enforces
//! name uniqueness), but a revisited node still terminates the walk as
//! "not found" rather than looping.
//!
//! ## Example
//!
//! ```rust
//! use rootstock_class::{ClassDescriptor, ClassRegistry, PropertyDescriptor, PropertyKind, Value};
//! use rootstock_graph::Graph;
//! use rootstock_inherit::{Resolved, resolve_value};
//!
//! let mut registry = ClassRegistry::new();
//! let style = registry.register(
//!     ClassDescriptor::new("Style")
//!         .with_property(PropertyDescriptor::new("name", PropertyKind::String).unique())
//!         .with_property(PropertyDescriptor::new("inherit_from", PropertyKind::String).optional())
//!         .with_property(PropertyDescriptor::new("color", PropertyKind::String).inheritable())
//!         .inherit_link("inherit_from"),
//! );
//!
//! let mut graph = Graph::new();
//! let base = graph.insert_root(style, "styles.base");
//! graph.set_scalar(base, "color", Value::from("#000000"), &registry);
//! let derived = graph.insert_root(style, "styles.derived");
//! graph.set_scalar(derived, "inherit_from", Value::from("base"), &registry);
//!
//! let by_name = |name: &str| (name == "base").then_some(base);
//! let resolved = resolve_value(&graph, &registry, derived, "color", &by_name).unwrap();
//! assert_eq!(resolved.value, Value::from("#000000"));
//! assert_eq!(resolved.source, base);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use smallvec::SmallVec;

use rootstock_class::{ClassRegistry, Value};
use rootstock_graph::{Graph, NodeId};

/// Maps an entity name to its node.
///
/// This is the external naming collaborator: typically a lookup into the
/// collection that owns the family (all styles of a project, say). The
/// trait is implemented for closures, so a capture of that collection is
/// enough:
///
/// ```rust
/// use rootstock_inherit::NamedLookup;
/// use rootstock_graph::NodeId;
///
/// fn chain_end(lookup: &dyn NamedLookup) -> Option<NodeId> {
///     lookup.find("base")
/// }
///
/// let nobody = |_name: &str| -> Option<NodeId> { None };
/// assert_eq!(chain_end(&nobody), None);
/// ```
pub trait NamedLookup {
    /// Returns the node registered under `name`, if any.
    fn find(&self, name: &str) -> Option<NodeId>;
}

impl<F> NamedLookup for F
where
    F: Fn(&str) -> Option<NodeId>,
{
    fn find(&self, name: &str) -> Option<NodeId> {
        self(name)
    }
}

/// A resolved value and the node it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The effective value.
    pub value: Value,
    /// The node whose local value was used. Equals the queried node for
    /// local values.
    pub source: NodeId,
}

/// Where an effective value came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueSource {
    /// Set locally on the queried node.
    Local,
    /// Inherited from the named node along the override chain.
    Inherited(NodeId),
    /// Fell back to the property's declared default.
    Default,
}

/// Resolves `property` on `node`, following the class's inherit link
/// while the value is unset locally.
///
/// Returns `None` when the chain ends without a value: no link property,
/// no link value set, a link name `lookup` cannot resolve, or a property
/// that is not declared inheritable on a node without a local value. A
/// node seen twice ends the walk the same way. Callers fall back to the
/// property's default, which is what [`effective_value`] does.
#[must_use]
pub fn resolve_value(
    graph: &Graph,
    registry: &ClassRegistry,
    node: NodeId,
    property: &str,
    lookup: &dyn NamedLookup,
) -> Option<Resolved> {
    let mut visited: SmallVec<[NodeId; 8]> = SmallVec::new();
    let mut current = node;
    loop {
        if visited.contains(&current) {
            return None;
        }
        visited.push(current);

        if let Some(value) = graph.scalar(current, property, registry) {
            return Some(Resolved {
                value: value.clone(),
                source: current,
            });
        }

        let class = registry.get(graph.class_of(current)?)?;
        let (_, descriptor) = class.property(property)?;
        if !descriptor.is_inheritable() {
            return None;
        }
        let link = class.inherit_link_property()?;
        let target = graph.scalar(current, link, registry)?.as_str()?;
        current = lookup.find(target)?;
    }
}

/// Like [`resolve_value`], but falls back to the property's declared
/// default when the chain ends without a value.
#[must_use]
pub fn effective_value(
    graph: &Graph,
    registry: &ClassRegistry,
    node: NodeId,
    property: &str,
    lookup: &dyn NamedLookup,
) -> Option<Value> {
    if let Some(resolved) = resolve_value(graph, registry, node, property, lookup) {
        return Some(resolved.value);
    }
    registry
        .get(graph.class_of(node)?)?
        .property(property)
        .and_then(|(_, d)| d.default_value().cloned())
}

/// Classifies where [`effective_value`] would take its result from.
///
/// `None` means the property has no effective value at all.
#[must_use]
pub fn value_source(
    graph: &Graph,
    registry: &ClassRegistry,
    node: NodeId,
    property: &str,
    lookup: &dyn NamedLookup,
) -> Option<ValueSource> {
    if let Some(resolved) = resolve_value(graph, registry, node, property, lookup) {
        return Some(if resolved.source == node {
            ValueSource::Local
        } else {
            ValueSource::Inherited(resolved.source)
        });
    }
    let has_default = registry
        .get(graph.class_of(node)?)?
        .property(property)
        .is_some_and(|(_, d)| d.default_value().is_some());
    has_default.then_some(ValueSource::Default)
}
