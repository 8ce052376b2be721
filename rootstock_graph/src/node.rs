// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node handles, keys, and path segments.

use alloc::string::String;
use core::fmt;

use rootstock_class::Value;

/// A generational handle to a node in a [`Graph`](crate::Graph).
///
/// Handles stay cheap to copy and compare; the generation detects use of a
/// handle whose node has been removed. A stale handle never aliases a newer
/// node: every accessor checks liveness and answers `None` (or `false`)
/// instead.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) const fn idx(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

/// The key under which a node hangs from its parent.
///
/// Object children hang under a property name; array elements hang under a
/// numeric key handed out by the owning array. Element keys are allocation
/// order, not position: they never change when earlier siblings are removed,
/// which is what keeps node ids stable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// A property name of the parent object node.
    Field(&'static str),
    /// A stable per-array key of an element.
    Item(u64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Item(key) => write!(f, "{key}"),
        }
    }
}

/// One step of a structural path, as consumed by
/// [`Graph::resolve`](crate::Graph::resolve).
///
/// Unlike [`Key`], the index variant is *positional*: it addresses whatever
/// element currently sits at that position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// A property name, valid against an object node.
    Field(&'a str),
    /// A position, valid against an array node.
    Index(usize),
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A transient wrapper presenting one scalar property as an addressable
/// node.
///
/// Value nodes are constructed on demand by
/// [`Graph::value_node`](crate::Graph::value_node) and never stored in the
/// graph; they exist so tree consumers can address scalars uniformly with
/// real nodes. The wrapped value is a snapshot taken at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueNode {
    /// The dotted-path id, `parent id + "." + property name`.
    pub id: String,
    /// The property name this wrapper stands for.
    pub key: &'static str,
    /// The owning object node.
    pub parent: NodeId,
    /// The property's slot index within the owner's class.
    pub slot: u16,
    /// The locally stored scalar, if set.
    pub value: Option<Value>,
}

/// One resolved child of a node, as returned by
/// [`Graph::child`](crate::Graph::child).
///
/// Container properties and array elements resolve to stored nodes;
/// scalar properties resolve to a transient [`ValueNode`] wrapper.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    /// A stored object or array node.
    Node(NodeId),
    /// A transient scalar wrapper.
    Value(ValueNode),
}
