// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building a graph from raw structured data.
//!
//! The loader consumes the map/list/scalar shape a deserializer produces
//! ([`Value::Map`] at every entity boundary) and constructs a node tree
//! honoring the class's property kinds. Each class's pre-load hooks run
//! against the raw data before its node is populated, base hooks first.
//!
//! Malformed entries inside an otherwise loadable document — a value of
//! the wrong kind, an unknown key, a non-map array element — are logged
//! and skipped so the rest of the document still loads. Only a raw value
//! that is not a map at an entity boundary fails the load outright.

use alloc::string::String;
use hashbrown::HashMap;
use thiserror::Error;

use rootstock_class::{ClassDescriptor, ClassId, ClassRegistry, PropertyKind, Value};

use crate::graph::Graph;
use crate::node::NodeId;

/// Why a document could not be loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The raw data for an entity of the named class was not a map.
    #[error("expected a map for class `{0}`")]
    NotAMap(&'static str),
    /// A container property named an element class missing from the
    /// registry.
    #[error("class `{0}` is not registered")]
    UnknownClass(&'static str),
}

/// Loads `raw` as a new tree rooted at a node of `class` with id
/// `root_id`, returning the root.
///
/// # Errors
///
/// Fails with [`LoadError::NotAMap`] if `raw` (or any nested entity's raw
/// data) is not a [`Value::Map`], and with [`LoadError::UnknownClass`] if
/// a container property's element class is unregistered.
///
/// # Panics
///
/// Panics if `class` is not a class of `registry`.
pub fn load(
    graph: &mut Graph,
    registry: &ClassRegistry,
    class: ClassId,
    root_id: &str,
    raw: Value,
) -> Result<NodeId, LoadError> {
    let Some(descriptor) = registry.get(class) else {
        panic!("load with unknown class {class}");
    };
    let map = prepare(descriptor, raw)?;
    let root = graph.insert_root(class, root_id);
    fill(graph, registry, root, descriptor, map)?;
    Ok(root)
}

/// Runs the class's pre-load hooks and unwraps the map shape.
fn prepare(
    descriptor: &ClassDescriptor,
    mut raw: Value,
) -> Result<HashMap<String, Value>, LoadError> {
    descriptor.run_before_load(&mut raw);
    match raw {
        Value::Map(map) => Ok(map),
        other => {
            log::warn!("expected a map for `{}`, got {other:?}", descriptor.name());
            Err(LoadError::NotAMap(descriptor.name()))
        }
    }
}

fn fill(
    graph: &mut Graph,
    registry: &ClassRegistry,
    node: NodeId,
    descriptor: &ClassDescriptor,
    mut map: HashMap<String, Value>,
) -> Result<(), LoadError> {
    // Property-table order keeps diagnostics deterministic.
    for property in descriptor.property_table() {
        let name = property.name();
        let Some(entry) = map.remove(name) else {
            if !property.is_optional()
                && property.default_value().is_none()
                && !property.kind().is_container()
            {
                log::warn!("`{}.{name}` is missing from raw data", descriptor.name());
            }
            continue;
        };
        match property.kind() {
            PropertyKind::Object(element) => {
                let element_descriptor = registry
                    .lookup(element)
                    .and_then(|id| registry.get(id))
                    .ok_or(LoadError::UnknownClass(element))?;
                let nested = prepare(element_descriptor, entry)?;
                if let Some(child) = graph.insert_object(node, name, registry) {
                    fill(graph, registry, child, element_descriptor, nested)?;
                }
            }
            PropertyKind::Array(element) => {
                let element_descriptor = registry
                    .lookup(element)
                    .and_then(|id| registry.get(id))
                    .ok_or(LoadError::UnknownClass(element))?;
                let Value::List(items) = entry else {
                    log::warn!(
                        "`{}.{name}` expects a list, got {entry:?}",
                        descriptor.name()
                    );
                    continue;
                };
                let Some(array) = graph.insert_array(node, name, registry) else {
                    continue;
                };
                for item in items {
                    let nested = prepare(element_descriptor, item)?;
                    if let Some(child) = graph.push_element(array, registry) {
                        fill(graph, registry, child, element_descriptor, nested)?;
                    }
                }
            }
            _ => {
                // `set_scalar` logs and skips values of the wrong kind.
                graph.set_scalar(node, name, entry, registry);
            }
        }
    }

    for key in map.keys() {
        log::warn!("`{}` has no property `{key}`; entry ignored", descriptor.name());
    }
    Ok(())
}
