// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rootstock Graph: An arena-based object graph with stable dotted-path
//! ids.
//!
//! This crate holds the runtime half of the Rootstock object model: trees
//! of entity instances shaped by the classes registered in
//! `rootstock_class`. It provides construction and mutation, tree
//! addressing, and a loader from raw structured data.
//!
//! ## Core Concepts
//!
//! ### Ownership and handles
//!
//! [`Graph`] is a generational arena. Containers own their children; the
//! parent link on each node is a non-owning back-reference for upward
//! traversal. A [`NodeId`] is a cheap generational handle: once its node
//! (or any ancestor) is removed the handle goes stale, [`Graph::is_attached`]
//! answers `false`, and every accessor treats it as a miss.
//!
//! ### Identity
//!
//! Every non-root node's id is its parent's id plus `"."` plus its key.
//! Array elements are keyed by a per-array counter rather than their
//! position, so ids never change when siblings are removed. The id format
//! is a compatibility contract: stored references use it, and
//! [`Graph::find_by_id`] uses the prefix structure to prune its search.
//!
//! ### Addressing
//!
//! [`Graph::path`] and [`Graph::resolve`] convert between nodes and
//! structural paths; [`Graph::children`] computes display children from
//! property metadata (with single-array container elision); ancestor
//! queries ([`Graph::is_ancestor`], [`Graph::ancestor_of_class`]) walk the
//! parent chain.
//!
//! ## Quick Start
//!
//! ```rust
//! use rootstock_class::{ClassDescriptor, ClassRegistry, PropertyDescriptor, PropertyKind, Value};
//! use rootstock_graph::{Graph, load};
//!
//! let mut registry = ClassRegistry::new();
//! registry.register(
//!     ClassDescriptor::new("Widget")
//!         .with_property(PropertyDescriptor::new("name", PropertyKind::String)),
//! );
//! let page = registry.register(
//!     ClassDescriptor::new("Page")
//!         .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
//! );
//!
//! let mut graph = Graph::new();
//! let root = graph.insert_root(page, "main");
//! let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
//! let button = graph.push_element(widgets, &registry).unwrap();
//! graph.set_scalar(button, "name", Value::from("button1"), &registry);
//!
//! assert_eq!(graph.id(button), Some("main.widgets.0"));
//! assert_eq!(graph.find_by_id(root, "main.widgets.0"), Some(button));
//! // The page's only container is an array, so its elements surface
//! // directly as the page's children.
//! assert_eq!(graph.children(root, &registry), vec![button]);
//! ```
//!
//! ## Error Handling
//!
//! Lookup misses are `None`. Addressing or mutation misuse is reported on
//! the `log` channel and treated as a miss, never a panic. The loader
//! returns [`LoadError`] for raw data it cannot interpret at an entity
//! boundary and logs-and-skips everything recoverable.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod graph;
mod loader;
mod node;
mod query;

pub use graph::{EntityRef, Graph};
pub use loader::{LoadError, load};
pub use node::{Child, Key, NodeId, PathSegment, ValueNode};
