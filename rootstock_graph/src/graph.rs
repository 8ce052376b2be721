// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The arena-backed object graph.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use smallvec::SmallVec;

use rootstock_class::{ClassId, ClassRegistry, PropertyAccess, PropertyKind, Value};

use crate::node::{Key, NodeId};

#[derive(Clone, Debug, Default)]
pub(crate) struct ObjectData {
    /// Locally set scalar values, sorted by property slot.
    pub(crate) scalars: SmallVec<[(u16, Value); 8]>,
    /// Container children, sorted by property slot.
    pub(crate) children: SmallVec<[(u16, NodeId); 2]>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ArrayData {
    /// Elements in display order. Order is authoritative and is never
    /// resorted by this crate.
    pub(crate) elements: Vec<NodeId>,
    /// The next stable element key. Keys are never reused within an array,
    /// so element ids survive sibling removal unchanged.
    pub(crate) next_key: u64,
}

#[derive(Clone, Debug)]
pub(crate) enum NodeData {
    Object(ObjectData),
    Array(ArrayData),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// Dotted-path id: the parent's id, a `.`, and this node's key.
    pub(crate) id: String,
    pub(crate) key: Option<Key>,
    pub(crate) parent: Option<NodeId>,
    /// For object nodes, the node's own class; for array nodes, the class
    /// of the elements.
    pub(crate) class: ClassId,
    pub(crate) data: NodeData,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A tree of entity instances with stable dotted-path ids.
///
/// The graph is an arena: containers own their children, and the parent
/// link on each node is a non-owning back-reference used only for upward
/// traversal. Removing a subtree frees every node in it and invalidates
/// their [`NodeId`] handles; [`Graph::is_attached`] distinguishes live
/// handles from stale ones, and every accessor treats a stale handle as a
/// miss rather than a panic.
///
/// Mutation misuse (a property that is not a container, an out-of-range
/// index, a class name the registry does not know) is reported on the `log`
/// channel and answered with `None` or `false`; it is never fatal.
///
/// # Example
///
/// ```rust
/// use rootstock_class::{ClassDescriptor, ClassRegistry, PropertyDescriptor, PropertyKind, Value};
/// use rootstock_graph::Graph;
///
/// let mut registry = ClassRegistry::new();
/// registry.register(
///     ClassDescriptor::new("Widget")
///         .with_property(PropertyDescriptor::new("name", PropertyKind::String)),
/// );
/// let page = registry.register(
///     ClassDescriptor::new("Page")
///         .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
/// );
///
/// let mut graph = Graph::new();
/// let root = graph.insert_root(page, "main");
/// let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
/// let button = graph.push_element(widgets, &registry).unwrap();
/// graph.set_scalar(button, "name", Value::from("button1"), &registry);
///
/// assert_eq!(graph.id(button), Some("main.widgets.0"));
/// assert_eq!(
///     graph.scalar(button, "name", &registry),
///     Some(&Value::from("button1"))
/// );
/// ```
#[derive(Default)]
pub struct Graph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live nodes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the graph has no live nodes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `node` refers to a live node of this graph.
    ///
    /// A handle goes stale when its node (or any ancestor) is removed.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or_else(|_| {
            panic!("graph arena exhausted");
        });
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    /// Frees `node` and everything below it. Stale handles into the
    /// subtree stop resolving.
    fn free_subtree(&mut self, node: NodeId) {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.push(node);
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.idx()) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(freed) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            self.len -= 1;
            match freed.data {
                NodeData::Object(data) => {
                    stack.extend(data.children.iter().map(|(_, child)| *child));
                }
                NodeData::Array(data) => stack.extend(data.elements),
            }
        }
    }

    /// Creates a root object node with an externally supplied id.
    pub fn insert_root(&mut self, class: ClassId, id: &str) -> NodeId {
        self.alloc(Node {
            id: String::from(id),
            key: None,
            parent: None,
            class,
            data: NodeData::Object(ObjectData::default()),
        })
    }

    /// Looks up a container property of `parent`, returning the slot, the
    /// element class, and whether the kind is an array.
    fn container_slot(
        &self,
        parent: NodeId,
        property: &str,
        registry: &ClassRegistry,
    ) -> Option<(u16, ClassId, bool)> {
        let node = self.node(parent)?;
        if !matches!(node.data, NodeData::Object(_)) {
            log::warn!("`{property}`: parent {} is not an object node", node.id);
            return None;
        }
        let Some(class) = registry.get(node.class) else {
            log::warn!("node {} has an unknown class", node.id);
            return None;
        };
        let Some((slot, descriptor)) = class.property(property) else {
            log::warn!("class `{}` has no property `{property}`", class.name());
            return None;
        };
        let (element_name, is_array) = match descriptor.kind() {
            PropertyKind::Object(name) => (name, false),
            PropertyKind::Array(name) => (name, true),
            _ => {
                log::warn!(
                    "`{}.{property}` is not a container property",
                    class.name()
                );
                return None;
            }
        };
        let Some(element_class) = registry.lookup(element_name) else {
            log::warn!("element class `{element_name}` is not registered");
            return None;
        };
        Some((slot, element_class, is_array))
    }

    fn attach_child(&mut self, parent: NodeId, slot: u16, child: Node) -> Option<NodeId> {
        let id = self.alloc(child);
        let Some(NodeData::Object(data)) = self.node_mut(parent).map(|n| &mut n.data) else {
            return None;
        };
        match data.children.binary_search_by_key(&slot, |(s, _)| *s) {
            Ok(_) => {
                log::warn!("container property already populated");
                self.free_subtree(id);
                None
            }
            Err(at) => {
                data.children.insert(at, (slot, id));
                Some(id)
            }
        }
    }

    /// Creates the nested object node for an object-kind property of
    /// `parent`.
    ///
    /// Answers `None` (with a logged diagnostic) if `parent` is stale or
    /// not an object node, the property is missing or not object-kind, the
    /// element class is unregistered, or the property is already populated.
    pub fn insert_object(
        &mut self,
        parent: NodeId,
        property: &'static str,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let (slot, element_class, is_array) = self.container_slot(parent, property, registry)?;
        if is_array {
            log::warn!("`{property}` is an array property; use `insert_array`");
            return None;
        }
        let parent_id = &self.node(parent)?.id;
        let child = Node {
            id: format!("{parent_id}.{property}"),
            key: Some(Key::Field(property)),
            parent: Some(parent),
            class: element_class,
            data: NodeData::Object(ObjectData::default()),
        };
        self.attach_child(parent, slot, child)
    }

    /// Creates the (empty) array node for an array-kind property of
    /// `parent`. Elements are added with [`Graph::push_element`].
    pub fn insert_array(
        &mut self,
        parent: NodeId,
        property: &'static str,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let (slot, element_class, is_array) = self.container_slot(parent, property, registry)?;
        if !is_array {
            log::warn!("`{property}` is an object property; use `insert_object`");
            return None;
        }
        let parent_id = &self.node(parent)?.id;
        let child = Node {
            id: format!("{parent_id}.{property}"),
            key: Some(Key::Field(property)),
            parent: Some(parent),
            class: element_class,
            data: NodeData::Array(ArrayData::default()),
        };
        self.attach_child(parent, slot, child)
    }

    /// Appends a new element of the array's declared element class.
    pub fn push_element(&mut self, array: NodeId, registry: &ClassRegistry) -> Option<NodeId> {
        let class = self.node(array)?.class;
        self.push_element_as(array, class, registry)
    }

    /// Appends a new element of `class`, which must be the array's element
    /// class or a subclass of it.
    pub fn push_element_as(
        &mut self,
        array: NodeId,
        class: ClassId,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let len = match &self.node(array)?.data {
            NodeData::Array(data) => data.elements.len(),
            NodeData::Object(_) => {
                log::warn!("push_element on a non-array node");
                return None;
            }
        };
        self.insert_element_as(array, len, class, registry)
    }

    /// Inserts a new element at `index`, shifting later elements up.
    ///
    /// The element's id is minted from the array's key counter, not from
    /// `index`, so ids of existing elements are unaffected.
    pub fn insert_element(
        &mut self,
        array: NodeId,
        index: usize,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let class = self.node(array)?.class;
        self.insert_element_as(array, index, class, registry)
    }

    /// Inserts a new element of `class` at `index`, shifting later
    /// elements up.
    pub fn insert_element_as(
        &mut self,
        array: NodeId,
        index: usize,
        class: ClassId,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let node = self.node(array)?;
        let NodeData::Array(data) = &node.data else {
            log::warn!("insert_element on a non-array node {}", node.id);
            return None;
        };
        if index > data.elements.len() {
            log::warn!(
                "index {index} out of bounds for array {} of length {}",
                node.id,
                data.elements.len()
            );
            return None;
        }
        if !registry.is_subclass_of(class, node.class) {
            log::warn!(
                "element class {class} is not a subclass of the array's element class {}",
                node.class
            );
            return None;
        }
        let key = data.next_key;
        let element = Node {
            id: format!("{}.{key}", node.id),
            key: Some(Key::Item(key)),
            parent: Some(array),
            class,
            data: NodeData::Object(ObjectData::default()),
        };
        let id = self.alloc(element);
        let Some(NodeData::Array(data)) = self.node_mut(array).map(|n| &mut n.data) else {
            return None;
        };
        data.elements.insert(index, id);
        data.next_key = key + 1;
        Some(id)
    }

    /// Removes the element at `index`, freeing its subtree.
    ///
    /// Later elements shift down positionally; their ids do not change.
    pub fn remove_element(&mut self, array: NodeId, index: usize) -> bool {
        let Some(node) = self.node_mut(array) else {
            return false;
        };
        let NodeData::Array(data) = &mut node.data else {
            log::warn!("remove_element on a non-array node {}", node.id);
            return false;
        };
        if index >= data.elements.len() {
            log::warn!(
                "index {index} out of bounds for array {} of length {}",
                node.id,
                data.elements.len()
            );
            return false;
        }
        let removed = data.elements.remove(index);
        self.free_subtree(removed);
        true
    }

    /// Removes the container child stored under `property`, freeing its
    /// subtree.
    pub fn remove_child(
        &mut self,
        parent: NodeId,
        property: &str,
        registry: &ClassRegistry,
    ) -> bool {
        let Some(node) = self.node(parent) else {
            return false;
        };
        let Some((slot, _)) = registry.get(node.class).and_then(|c| c.property(property)) else {
            log::warn!("no property `{property}` on node {}", node.id);
            return false;
        };
        let Some(NodeData::Object(data)) = self.node_mut(parent).map(|n| &mut n.data) else {
            return false;
        };
        match data.children.binary_search_by_key(&slot, |(s, _)| *s) {
            Ok(at) => {
                let (_, child) = data.children.remove(at);
                self.free_subtree(child);
                true
            }
            Err(_) => false,
        }
    }

    /// Sets the locally stored scalar for `property` on an object node.
    ///
    /// Answers `false` (with a logged diagnostic) when the property is
    /// unknown, is a container, or `value` does not fit its kind.
    pub fn set_scalar(
        &mut self,
        node: NodeId,
        property: &str,
        value: Value,
        registry: &ClassRegistry,
    ) -> bool {
        let Some(n) = self.node(node) else {
            return false;
        };
        let Some(class) = registry.get(n.class) else {
            log::warn!("node {} has an unknown class", n.id);
            return false;
        };
        let Some((slot, descriptor)) = class.property(property) else {
            log::warn!("class `{}` has no property `{property}`", class.name());
            return false;
        };
        if !descriptor.kind().accepts(&value) {
            log::warn!(
                "value {value:?} does not fit `{}.{property}`",
                class.name()
            );
            return false;
        }
        let Some(NodeData::Object(data)) = self.node_mut(node).map(|n| &mut n.data) else {
            log::warn!("set_scalar on a non-object node");
            return false;
        };
        match data.scalars.binary_search_by_key(&slot, |(s, _)| *s) {
            Ok(at) => data.scalars[at].1 = value,
            Err(at) => data.scalars.insert(at, (slot, value)),
        }
        true
    }

    /// Returns the locally stored scalar for `property`, if set.
    #[must_use]
    pub fn scalar(
        &self,
        node: NodeId,
        property: &str,
        registry: &ClassRegistry,
    ) -> Option<&Value> {
        let n = self.node(node)?;
        let (slot, _) = registry.get(n.class)?.property(property)?;
        self.scalar_at(node, slot)
    }

    /// Returns the locally stored scalar at `slot`, if set.
    #[must_use]
    pub fn scalar_at(&self, node: NodeId, slot: u16) -> Option<&Value> {
        match &self.node(node)?.data {
            NodeData::Object(data) => data
                .scalars
                .binary_search_by_key(&slot, |(s, _)| *s)
                .ok()
                .map(|at| &data.scalars[at].1),
            NodeData::Array(_) => None,
        }
    }

    /// Clears and returns the locally stored scalar for `property`.
    pub fn clear_scalar(
        &mut self,
        node: NodeId,
        property: &str,
        registry: &ClassRegistry,
    ) -> Option<Value> {
        let n = self.node(node)?;
        let (slot, _) = registry.get(n.class)?.property(property)?;
        let Some(NodeData::Object(data)) = self.node_mut(node).map(|n| &mut n.data) else {
            return None;
        };
        data.scalars
            .binary_search_by_key(&slot, |(s, _)| *s)
            .ok()
            .map(|at| data.scalars.remove(at).1)
    }

    /// The node's dotted-path id.
    #[must_use]
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.id.as_str())
    }

    /// The key under which the node hangs from its parent. Roots have none.
    #[must_use]
    pub fn key(&self, node: NodeId) -> Option<Key> {
        self.node(node)?.key
    }

    /// The node's parent. Roots have none.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// The class governing the node's shape. For array nodes this is the
    /// element class.
    #[must_use]
    pub fn class_of(&self, node: NodeId) -> Option<ClassId> {
        self.node(node).map(|n| n.class)
    }

    /// Returns `true` if `node` is an array node.
    #[must_use]
    pub fn is_array(&self, node: NodeId) -> bool {
        matches!(self.node(node).map(|n| &n.data), Some(NodeData::Array(_)))
    }

    /// A [`PropertyAccess`] view of one node, for descriptor hooks and
    /// predicates.
    #[must_use]
    pub fn entity<'a>(&'a self, node: NodeId, registry: &'a ClassRegistry) -> EntityRef<'a> {
        EntityRef {
            graph: self,
            registry,
            node,
        }
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Read access to one node's scalar values, by property name.
///
/// This is what gets handed to label hooks and visibility predicates.
#[derive(Copy, Clone)]
pub struct EntityRef<'a> {
    graph: &'a Graph,
    registry: &'a ClassRegistry,
    node: NodeId,
}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl PropertyAccess for EntityRef<'_> {
    fn scalar(&self, name: &str) -> Option<&Value> {
        self.graph.scalar(self.node, name, self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootstock_class::{ClassDescriptor, PropertyDescriptor};

    fn fixture() -> (ClassRegistry, ClassId) {
        let mut registry = ClassRegistry::new();
        registry.register(
            ClassDescriptor::new("Widget")
                .with_property(PropertyDescriptor::new("name", PropertyKind::String))
                .with_property(PropertyDescriptor::new("width", PropertyKind::Number))
                .with_property(PropertyDescriptor::new("style", PropertyKind::Object("Style"))),
        );
        registry.register(
            ClassDescriptor::new("Style")
                .with_property(PropertyDescriptor::new("color", PropertyKind::String)),
        );
        let page = registry.register(
            ClassDescriptor::new("Page")
                .with_property(PropertyDescriptor::new("name", PropertyKind::String))
                .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
        );
        (registry, page)
    }

    #[test]
    fn root_has_external_id() {
        let (_, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");

        assert_eq!(graph.id(root), Some("main"));
        assert_eq!(graph.parent(root), None);
        assert_eq!(graph.key(root), None);
        assert_eq!(graph.class_of(root), Some(page));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn child_ids_are_parent_dot_key() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        let first = graph.push_element(widgets, &registry).unwrap();
        let style = graph.insert_object(first, "style", &registry).unwrap();

        assert_eq!(graph.id(widgets), Some("main.widgets"));
        assert_eq!(graph.id(first), Some("main.widgets.0"));
        assert_eq!(graph.id(style), Some("main.widgets.0.style"));
        assert_eq!(graph.key(first), Some(Key::Item(0)));
        assert_eq!(graph.key(style), Some(Key::Field("style")));
    }

    #[test]
    fn scalars_round_trip_with_kind_checks() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");

        assert!(graph.set_scalar(root, "name", Value::from("Main"), &registry));
        assert_eq!(graph.scalar(root, "name", &registry), Some(&Value::from("Main")));

        // Wrong kind and unknown name are rejected, not stored.
        assert!(!graph.set_scalar(root, "name", Value::Number(3.0), &registry));
        assert!(!graph.set_scalar(root, "nope", Value::from("x"), &registry));
        assert_eq!(graph.scalar(root, "name", &registry), Some(&Value::from("Main")));

        assert_eq!(
            graph.clear_scalar(root, "name", &registry),
            Some(Value::from("Main"))
        );
        assert_eq!(graph.scalar(root, "name", &registry), None);
    }

    #[test]
    fn container_misuse_is_a_miss() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");

        // `name` is a scalar, `widgets` is an array.
        assert!(graph.insert_object(root, "name", &registry).is_none());
        assert!(graph.insert_object(root, "widgets", &registry).is_none());
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        // Already populated.
        assert!(graph.insert_array(root, "widgets", &registry).is_none());
        // Elements only go into arrays.
        assert!(graph.push_element(root, &registry).is_none());
        assert!(graph.insert_element(widgets, 5, &registry).is_none());
    }

    #[test]
    fn removal_detaches_whole_subtree() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        let first = graph.push_element(widgets, &registry).unwrap();
        let style = graph.insert_object(first, "style", &registry).unwrap();
        assert_eq!(graph.len(), 4);

        assert!(graph.remove_element(widgets, 0));
        assert!(!graph.is_attached(first));
        assert!(!graph.is_attached(style));
        assert!(graph.is_attached(widgets));
        assert_eq!(graph.len(), 2);

        // Stale handles answer misses everywhere.
        assert_eq!(graph.id(first), None);
        assert_eq!(graph.scalar(style, "color", &registry), None);
        assert!(!graph.remove_element(first, 0));
    }

    #[test]
    fn element_ids_stable_under_removal() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        let a = graph.push_element(widgets, &registry).unwrap();
        let b = graph.push_element(widgets, &registry).unwrap();
        let c = graph.push_element(widgets, &registry).unwrap();

        assert_eq!(graph.id(b), Some("main.widgets.1"));
        assert!(graph.remove_element(widgets, 1));

        // Survivors keep their ids; a new element gets a fresh key, not a
        // reused one.
        assert_eq!(graph.id(a), Some("main.widgets.0"));
        assert_eq!(graph.id(c), Some("main.widgets.2"));
        let d = graph.push_element(widgets, &registry).unwrap();
        assert_eq!(graph.id(d), Some("main.widgets.3"));
    }

    #[test]
    fn array_accepts_subclass_elements() {
        let (mut registry, page) = fixture();
        let widget = registry.lookup("Widget").unwrap();
        let button = registry.derive(
            widget,
            rootstock_class::ClassOverrides::new("Button")
                .with_property(PropertyDescriptor::new("text", PropertyKind::String)),
        );
        let style = registry.lookup("Style").unwrap();

        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();

        let b = graph.push_element_as(widgets, button, &registry).unwrap();
        assert_eq!(graph.class_of(b), Some(button));
        assert!(graph.set_scalar(b, "text", Value::from("OK"), &registry));

        // An unrelated class is rejected.
        assert!(graph.push_element_as(widgets, style, &registry).is_none());
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        let old = graph.push_element(widgets, &registry).unwrap();
        assert!(graph.remove_element(widgets, 0));

        let new = graph.push_element(widgets, &registry).unwrap();
        // The arena may reuse the slot, but the old handle stays dead.
        assert_ne!(old, new);
        assert!(!graph.is_attached(old));
        assert!(graph.is_attached(new));
    }

    #[test]
    fn remove_child_frees_object_property() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        let w = graph.push_element(widgets, &registry).unwrap();
        let style = graph.insert_object(w, "style", &registry).unwrap();

        assert!(graph.remove_child(w, "style", &registry));
        assert!(!graph.is_attached(style));
        assert!(!graph.remove_child(w, "style", &registry));
        // The property can be repopulated afterwards.
        assert!(graph.insert_object(w, "style", &registry).is_some());
    }

    #[test]
    fn entity_view_exposes_scalars() {
        let (registry, page) = fixture();
        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        graph.set_scalar(root, "name", Value::from("Main"), &registry);

        let entity = graph.entity(root, &registry);
        assert_eq!(entity.scalar("name"), Some(&Value::from("Main")));
        assert_eq!(entity.scalar("width"), None);
    }
}
