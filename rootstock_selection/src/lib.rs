// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rootstock Selection: multi-node selection sets over an object graph.
//!
//! This crate tracks *which* nodes are selected and answers the structural
//! questions multi-selection UIs ask: collapse a selection to its unique
//! top-level members, find the single shared parent a paste or drop should
//! target, and compute the properties a grid can edit across every
//! selected node at once. It never mutates the graph.
//!
//! The core type is [`Selection`], a compact container tracking:
//! - The set of selected [`NodeId`]s, unique by equality.
//! - An optional **primary** node (typically the most recently
//!   interacted-with item).
//! - A monotonically increasing **revision** counter that bumps when the
//!   selection changes.
//!
//! ## Minimal example
//!
//! ```rust
//! use rootstock_class::{ClassDescriptor, ClassRegistry, PropertyDescriptor, PropertyKind};
//! use rootstock_graph::Graph;
//! use rootstock_selection::{Selection, reduce_to_common_parent};
//!
//! let mut registry = ClassRegistry::new();
//! registry.register(ClassDescriptor::new("Widget"));
//! let page = registry.register(
//!     ClassDescriptor::new("Page")
//!         .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
//! );
//!
//! let mut graph = Graph::new();
//! let root = graph.insert_root(page, "main");
//! let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
//! let a = graph.push_element(widgets, &registry).unwrap();
//! let b = graph.push_element(widgets, &registry).unwrap();
//!
//! let mut selection = Selection::new();
//! selection.select_only(a);
//! selection.add(b);
//! assert_eq!(selection.len(), 2);
//!
//! // Two siblings share one parent: the array node.
//! assert_eq!(
//!     reduce_to_common_parent(&graph, selection.items()),
//!     vec![a, b]
//! );
//! ```
//!
//! ## Reduction
//!
//! A selection with both a node and one of its descendants is ambiguous
//! for structural commands (delete, move, copy). [`unique_top`] removes
//! every member that has another member as a proper ancestor, and
//! [`reduce_to_common_parent`] walks the survivors' parents upward until
//! they agree on a single container, which is the natural target for a
//! paste or drop.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use rootstock_class::{ClassRegistry, PropertyKind};
use rootstock_graph::{Graph, NodeId};

/// A selection container tracking a set of nodes plus a primary and a
/// revision.
///
/// Nodes are stored in insertion order with uniqueness enforced by
/// equality. Handles are not validated on insertion; [`Selection::retain_attached`]
/// drops members whose nodes have since been removed from the graph.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<NodeId>,
    primary: Option<usize>,
    revision: u64,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            primary: None,
            revision: 0,
        }
    }

    /// Returns `true` if the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of selected nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the selected nodes in insertion order.
    #[must_use]
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    /// Returns an iterator over the selected nodes.
    pub fn iter(&self) -> core::slice::Iter<'_, NodeId> {
        self.items.iter()
    }

    /// Returns `true` if the selection contains `node`.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.items.contains(&node)
    }

    /// Returns the primary node, if any.
    ///
    /// The primary is typically the most recently interacted-with item and
    /// is what keyboard commands act on.
    #[must_use]
    pub fn primary(&self) -> Option<NodeId> {
        self.primary.map(|idx| self.items[idx])
    }

    /// Returns the current revision counter.
    ///
    /// The revision bumps only when a mutation changes the semantic
    /// contents, so observers get a cheap "did anything actually change?"
    /// marker without comparing contents.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes all nodes and clears the primary.
    pub fn clear(&mut self) {
        if self.items.is_empty() && self.primary.is_none() {
            return;
        }
        self.items.clear();
        self.primary = None;
        self.bump_revision();
    }

    /// Replaces the selection with a single node, which becomes primary.
    pub fn select_only(&mut self, node: NodeId) {
        if self.items.len() == 1 && self.items.first() == Some(&node) && self.primary == Some(0) {
            return;
        }
        self.items.clear();
        self.items.push(node);
        self.primary = Some(0);
        self.bump_revision();
    }

    /// Adds a node to the selection and makes it primary. A no-op when the
    /// node is already selected and primary.
    pub fn add(&mut self, node: NodeId) {
        if let Some(idx) = self.position_of(node) {
            if self.primary == Some(idx) {
                return;
            }
            self.primary = Some(idx);
        } else {
            self.items.push(node);
            self.primary = Some(self.items.len() - 1);
        }
        self.bump_revision();
    }

    /// Removes a node from the selection, if present.
    pub fn remove(&mut self, node: NodeId) {
        let Some(idx) = self.position_of(node) else {
            return;
        };
        self.items.remove(idx);
        self.primary = match self.primary {
            Some(p) if p == idx => None,
            Some(p) if p > idx => Some(p - 1),
            other => other,
        };
        self.bump_revision();
    }

    /// Toggles membership of a node: removes it when selected, otherwise
    /// adds it as primary.
    pub fn toggle(&mut self, node: NodeId) {
        if self.contains(node) {
            self.remove(node);
        } else {
            self.add(node);
        }
    }

    /// Replaces the selection with a batch of nodes.
    ///
    /// Duplicates in the input are ignored. The first unique node becomes
    /// primary, if any nodes are present.
    pub fn replace_with<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut new_items: Vec<NodeId> = Vec::new();
        for node in nodes {
            if !new_items.contains(&node) {
                new_items.push(node);
            }
        }
        if new_items == self.items {
            return;
        }
        self.primary = if new_items.is_empty() { None } else { Some(0) };
        self.items = new_items;
        self.bump_revision();
    }

    /// Makes an already selected node the primary. Returns `false` if the
    /// node is not selected.
    pub fn set_primary(&mut self, node: NodeId) -> bool {
        let Some(idx) = self.position_of(node) else {
            return false;
        };
        if self.primary != Some(idx) {
            self.primary = Some(idx);
            self.bump_revision();
        }
        true
    }

    /// Drops members whose nodes are no longer attached to `graph`.
    ///
    /// Call after structural edits; a stale primary is cleared.
    pub fn retain_attached(&mut self, graph: &Graph) {
        let primary_node = self.primary();
        let before = self.items.len();
        self.items.retain(|node| graph.is_attached(*node));
        if self.items.len() == before {
            return;
        }
        self.primary = primary_node.and_then(|p| self.position_of(p));
        self.bump_revision();
    }

    /// The selection collapsed to its unique top-level members, in
    /// insertion order. See [`unique_top`].
    #[must_use]
    pub fn reduced(&self, graph: &Graph) -> Vec<NodeId> {
        unique_top(graph, &self.items)
    }

    fn position_of(&self, node: NodeId) -> Option<usize> {
        self.items.iter().position(|n| *n == node)
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a NodeId;
    type IntoIter = core::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collapses `nodes` to its unique top-level members.
///
/// A node is dropped when another member of the set is its proper
/// ancestor; duplicates are dropped after their first occurrence. The
/// result preserves the input order of the survivors.
#[must_use]
pub fn unique_top(graph: &Graph, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::with_capacity(nodes.len());
    for &node in nodes {
        if out.contains(&node) {
            continue;
        }
        let covered = nodes
            .iter()
            .any(|&other| other != node && graph.is_proper_ancestor(node, other));
        if !covered {
            out.push(node);
        }
    }
    out
}

/// Returns `true` when every node in `nodes` has the same (existing)
/// parent.
#[must_use]
pub fn same_parent(graph: &Graph, nodes: &[NodeId]) -> bool {
    let mut shared = None;
    for &node in nodes {
        let Some(parent) = graph.parent(node) else {
            return false;
        };
        match shared {
            None => shared = Some(parent),
            Some(p) if p == parent => {}
            Some(_) => return false,
        }
    }
    shared.is_some()
}

/// Reduces a heterogeneous selection toward a single shared parent.
///
/// First collapses `nodes` with [`unique_top`]. If the survivors all hang
/// under one parent, they are returned as-is; otherwise the reduction
/// recurses on the set of distinct parents. When the walk reaches nodes
/// without parents while still disagreeing, there is no shared container
/// and the result is empty. This is how a paste or drop target is chosen
/// for a multi-selection spanning different subtrees.
#[must_use]
pub fn reduce_to_common_parent(graph: &Graph, nodes: &[NodeId]) -> Vec<NodeId> {
    let top = unique_top(graph, nodes);
    if top.len() <= 1 {
        return top;
    }

    let mut parents: Vec<NodeId> = Vec::new();
    for &node in &top {
        let Some(parent) = graph.parent(node) else {
            // A root among disagreeing members: nothing above can agree.
            return Vec::new();
        };
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }
    if parents.len() == 1 {
        top
    } else {
        reduce_to_common_parent(graph, &parents)
    }
}

/// Computes the property names editable across every node in `nodes`.
///
/// The candidates are the first node's class properties, filtered to
/// those that exist (by name) on every other node's class and are not
/// hidden for any of the selected entities. For a multi-node selection,
/// array properties and unique properties are excluded as well, since
/// neither can meaningfully be edited in bulk.
#[must_use]
pub fn common_properties(
    graph: &Graph,
    registry: &ClassRegistry,
    nodes: &[NodeId],
) -> Vec<&'static str> {
    let Some((&first, rest)) = nodes.split_first() else {
        return Vec::new();
    };
    let Some(class) = graph.class_of(first).and_then(|c| registry.get(c)) else {
        return Vec::new();
    };
    let multi = !rest.is_empty();

    let mut out: Vec<&'static str> = Vec::new();
    'candidates: for property in class.property_table() {
        if multi && (matches!(property.kind(), PropertyKind::Array(_)) || property.is_unique()) {
            continue;
        }
        for &other in rest {
            let Some(other_class) = graph.class_of(other).and_then(|c| registry.get(c)) else {
                continue 'candidates;
            };
            if other_class.property(property.name()).is_none() {
                continue 'candidates;
            }
        }
        for &node in nodes {
            let entity = graph.entity(node, registry);
            if property.is_hidden(&entity) {
                continue 'candidates;
            }
        }
        out.push(property.name());
    }
    out
}
