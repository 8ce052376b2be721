// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree addressing and queries.
//!
//! Everything in this module is read-only: paths, id lookup, ancestor
//! tests, and the metadata-driven children computation. Lookup misses are
//! `None`; malformed addressing input is logged and treated as a miss.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use rootstock_class::{ClassId, ClassRegistry, PropertyKind, humanize};

use crate::graph::{Graph, NodeData};
use crate::node::{Child, Key, NodeId, PathSegment, ValueNode};

impl Graph {
    /// Returns the container child stored under `property`, if populated.
    #[must_use]
    pub fn child_by_name(
        &self,
        node: NodeId,
        property: &str,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let n = self.node(node)?;
        let NodeData::Object(data) = &n.data else {
            return None;
        };
        let (slot, _) = registry.get(n.class)?.property(property)?;
        data.children
            .binary_search_by_key(&slot, |(s, _)| *s)
            .ok()
            .map(|at| data.children[at].1)
    }

    /// Returns the element at `index` of an array node.
    #[must_use]
    pub fn element(&self, array: NodeId, index: usize) -> Option<NodeId> {
        match &self.node(array)?.data {
            NodeData::Array(data) => data.elements.get(index).copied(),
            NodeData::Object(_) => None,
        }
    }

    /// Returns an array node's elements in display order.
    #[must_use]
    pub fn elements(&self, array: NodeId) -> &[NodeId] {
        match self.node(array).map(|n| &n.data) {
            Some(NodeData::Array(data)) => &data.elements,
            _ => &[],
        }
    }

    /// Computes the node's visible tree children.
    ///
    /// Candidates are the node's container properties that pass their
    /// enumerable rule and are currently populated, in property-table
    /// order. When exactly one candidate remains, it is an array, and the
    /// property is not flagged to always show its container, the array's
    /// elements are surfaced directly instead of the array node (container
    /// elision). Array nodes list their elements.
    #[must_use]
    pub fn children(&self, node: NodeId, registry: &ClassRegistry) -> Vec<NodeId> {
        let Some(n) = self.node(node) else {
            return Vec::new();
        };
        let data = match &n.data {
            NodeData::Array(data) => return data.elements.clone(),
            NodeData::Object(data) => data,
        };
        let Some(class) = registry.get(n.class) else {
            return Vec::new();
        };

        let entity = self.entity(node, registry);
        let mut visible: Vec<(NodeId, bool, bool)> = Vec::new();
        for (slot, child) in &data.children {
            let Some(descriptor) = class.property_at(*slot) else {
                continue;
            };
            if !descriptor.is_enumerable(&entity) {
                continue;
            }
            let is_array = matches!(descriptor.kind(), PropertyKind::Array(_));
            visible.push((*child, is_array, descriptor.always_show_container()));
        }

        if let [(only, true, false)] = visible[..] {
            return self.children(only, registry);
        }
        visible.into_iter().map(|(child, _, _)| child).collect()
    }

    /// Builds the transient value node for one scalar property.
    ///
    /// The result is a snapshot; it is never stored in the graph.
    #[must_use]
    pub fn value_node(
        &self,
        node: NodeId,
        property: &str,
        registry: &ClassRegistry,
    ) -> Option<ValueNode> {
        let n = self.node(node)?;
        let (slot, descriptor) = registry.get(n.class)?.property(property)?;
        if descriptor.kind().is_container() {
            return None;
        }
        Some(ValueNode {
            id: format!("{}.{}", n.id, descriptor.name()),
            key: descriptor.name(),
            parent: node,
            slot,
            value: self.scalar_at(node, slot).cloned(),
        })
    }

    /// Resolves one addressing step against a node.
    ///
    /// On an object node, `key` names a property: containers resolve to
    /// their stored child (when populated), scalars to a transient
    /// [`ValueNode`]. On an array node, `key` must parse as a position.
    /// A key of the wrong flavor is logged and answered with `None`.
    #[must_use]
    pub fn child(&self, node: NodeId, key: &str, registry: &ClassRegistry) -> Option<Child> {
        let n = self.node(node)?;
        match &n.data {
            NodeData::Array(data) => {
                let Ok(index) = key.parse::<usize>() else {
                    log::warn!("`{key}` is not a position in array {}", n.id);
                    return None;
                };
                data.elements.get(index).copied().map(Child::Node)
            }
            NodeData::Object(_) => {
                let class = registry.get(n.class)?;
                let Some((_, descriptor)) = class.property(key) else {
                    log::warn!("class `{}` has no property `{key}`", class.name());
                    return None;
                };
                if descriptor.kind().is_container() {
                    self.child_by_name(node, key, registry).map(Child::Node)
                } else {
                    self.value_node(node, key, registry).map(Child::Value)
                }
            }
        }
    }

    /// Computes the structural path from the node's root down to `node`.
    ///
    /// The root itself contributes nothing, so its path is empty. Array
    /// elements contribute their current position, not their stable key.
    #[must_use]
    pub fn path(&self, node: NodeId) -> Vec<PathSegment<'_>> {
        let mut segments: Vec<PathSegment<'_>> = Vec::new();
        let mut current = node;
        while let Some(n) = self.node(current) {
            let Some(parent) = n.parent else {
                break;
            };
            match n.key {
                Some(Key::Field(name)) => segments.push(PathSegment::Field(name)),
                Some(Key::Item(_)) => {
                    let index = match self.node(parent).map(|p| &p.data) {
                        Some(NodeData::Array(data)) => {
                            data.elements.iter().position(|e| *e == current)
                        }
                        _ => None,
                    };
                    let Some(index) = index else {
                        break;
                    };
                    segments.push(PathSegment::Index(index));
                }
                None => break,
            }
            current = parent;
        }
        segments.reverse();
        segments
    }

    /// The structural path joined with `/`, for diagnostics and stored
    /// references. The root's path string is empty.
    #[must_use]
    pub fn path_string(&self, node: NodeId) -> String {
        let mut out = String::new();
        for (i, segment) in self.path(node).iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.push_str(&format!("{segment}"));
        }
        out
    }

    /// Walks `path` down from `root`.
    ///
    /// Each field segment resolves against an object node and each index
    /// segment against an array node; a segment of the wrong flavor for
    /// its node is logged and answered with `None`.
    #[must_use]
    pub fn resolve(
        &self,
        root: NodeId,
        path: &[PathSegment<'_>],
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let mut current = root;
        for segment in path {
            let next = match (segment, self.node(current).map(|n| &n.data)) {
                (PathSegment::Field(name), Some(NodeData::Object(_))) => {
                    self.child_by_name(current, name, registry)
                }
                (PathSegment::Index(index), Some(NodeData::Array(_))) => {
                    self.element(current, *index)
                }
                (segment, Some(_)) => {
                    log::warn!("segment `{segment}` does not fit node {:?}", self.id(current));
                    None
                }
                (_, None) => None,
            };
            current = next?;
        }
        Some(current)
    }

    /// Resolves a path given as string segments; segments that parse as
    /// numbers address array positions.
    #[must_use]
    pub fn resolve_names<'a>(
        &self,
        root: NodeId,
        segments: impl IntoIterator<Item = &'a str>,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let mut current = root;
        for segment in segments {
            let step = match segment.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Field(segment),
            };
            current = self.resolve(current, &[step], registry)?;
        }
        Some(current)
    }

    /// Finds the node whose id is exactly `id`, searching the subtree
    /// under `root`.
    ///
    /// The search descends into a child only when `id` extends the child's
    /// id with a `.` separator, so only the one relevant branch is walked.
    /// A bare prefix match (`"a.b"` against `"a.bb"`) is a miss.
    #[must_use]
    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let root_id = &self.node(root)?.id;
        if id == root_id {
            return Some(root);
        }
        if !Self::id_is_under(id, root_id) {
            return None;
        }
        let mut stack: Vec<NodeId> = Vec::new();
        stack.push(root);
        while let Some(current) = stack.pop() {
            let Some(n) = self.node(current) else {
                continue;
            };
            let mut step = |child: NodeId| -> Option<NodeId> {
                let child_id = self.id(child)?;
                if child_id == id {
                    return Some(child);
                }
                if Self::id_is_under(id, child_id) {
                    stack.push(child);
                }
                None
            };
            let found = match &n.data {
                NodeData::Object(data) => {
                    data.children.iter().find_map(|(_, c)| step(*c))
                }
                NodeData::Array(data) => data.elements.iter().find_map(|e| step(*e)),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// `true` when `id` addresses a proper descendant of the node whose id
    /// is `ancestor_id`.
    fn id_is_under(id: &str, ancestor_id: &str) -> bool {
        id.len() > ancestor_id.len()
            && id.starts_with(ancestor_id)
            && id[ancestor_id.len()..].starts_with('.')
    }

    /// Walks up from `node` (inclusive) to the nearest node whose class is
    /// `base` or a subclass of it.
    #[must_use]
    pub fn ancestor_of_class(
        &self,
        node: NodeId,
        base: ClassId,
        registry: &ClassRegistry,
    ) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.node(id)?;
            if matches!(n.data, NodeData::Object(_)) && registry.is_subclass_of(n.class, base) {
                return Some(id);
            }
            current = n.parent;
        }
        None
    }

    /// Reflexive ancestor test: `true` when `ancestor` is `node` itself or
    /// appears on its parent chain.
    #[must_use]
    pub fn is_ancestor(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Strict ancestor test: like [`Graph::is_ancestor`] but `false` for
    /// the node itself.
    #[must_use]
    pub fn is_proper_ancestor(&self, node: NodeId, ancestor: NodeId) -> bool {
        match self.parent(node) {
            Some(parent) => self.is_ancestor(parent, ancestor),
            None => false,
        }
    }

    /// The root of the tree containing `node`.
    #[must_use]
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// The node's ancestors from its parent up to the root.
    #[must_use]
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(id) = current {
            out.push(id);
            current = self.parent(id);
        }
        out
    }

    /// Formats a display label for the node.
    ///
    /// Object nodes try the class's label hook, then a `name` scalar, then
    /// fall back to the node id. Array nodes are labeled by their owning
    /// property's display label.
    #[must_use]
    pub fn label(&self, node: NodeId, registry: &ClassRegistry) -> String {
        let Some(n) = self.node(node) else {
            return String::new();
        };
        if let NodeData::Array(_) = n.data {
            if let Some(Key::Field(name)) = n.key {
                let descriptor = n
                    .parent
                    .and_then(|p| self.class_of(p))
                    .and_then(|c| registry.get(c))
                    .and_then(|c| c.property(name));
                return match descriptor {
                    Some((_, d)) => d.display_label(),
                    None => humanize(name),
                };
            }
            return n.id.clone();
        }

        let entity = self.entity(node, registry);
        if let Some(label) = registry.get(n.class).and_then(|c| c.label_for(&entity)) {
            return label;
        }
        if let Some(name) = self.scalar(node, "name", registry).and_then(|v| v.as_str()) {
            return String::from(name);
        }
        n.id.clone()
    }

    /// Joins the labels from the root down to `node` with `" / "`.
    #[must_use]
    pub fn display_path(&self, node: NodeId, registry: &ClassRegistry) -> String {
        let mut chain = self.ancestors(node);
        chain.reverse();
        chain.push(node);
        let mut out = String::new();
        for (i, id) in chain.iter().enumerate() {
            if i > 0 {
                out.push_str(" / ");
            }
            out.push_str(&self.label(*id, registry));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rootstock_class::{ClassDescriptor, ClassRegistry, PropertyDescriptor, Value};

    struct Fixture {
        registry: ClassRegistry,
        graph: Graph,
        root: NodeId,
        widgets: NodeId,
    }

    /// A `Page` with a `widgets` array as its only container property, so
    /// the array is elided from the page's children.
    fn fixture() -> Fixture {
        let mut registry = ClassRegistry::new();
        registry.register(
            ClassDescriptor::new("Style")
                .with_property(PropertyDescriptor::new("color", PropertyKind::String)),
        );
        registry.register(
            ClassDescriptor::new("Widget")
                .with_property(PropertyDescriptor::new("name", PropertyKind::String))
                .with_property(PropertyDescriptor::new("style", PropertyKind::Object("Style"))),
        );
        let page = registry.register(
            ClassDescriptor::new("Page")
                .with_property(PropertyDescriptor::new("name", PropertyKind::String))
                .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
        );

        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        Fixture {
            registry,
            graph,
            root,
            widgets,
        }
    }

    fn named(f: &mut Fixture, name: &str) -> NodeId {
        let w = f.graph.push_element(f.widgets, &f.registry).unwrap();
        f.graph
            .set_scalar(w, "name", Value::from(name), &f.registry);
        w
    }

    #[test]
    fn single_array_children_are_elided() {
        let mut f = fixture();
        let a = named(&mut f, "a");
        let b = named(&mut f, "b");

        // The page's only container property is an array, so its elements
        // surface directly, in array order.
        assert_eq!(f.graph.children(f.root, &f.registry), vec![a, b]);
        assert_eq!(f.graph.children(f.widgets, &f.registry), vec![a, b]);
    }

    #[test]
    fn show_container_suppresses_elision() {
        let mut registry = ClassRegistry::new();
        registry.register(ClassDescriptor::new("Widget"));
        let page = registry.register(ClassDescriptor::new("Page").with_property(
            PropertyDescriptor::new("widgets", PropertyKind::Array("Widget")).show_container(),
        ));

        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();
        graph.push_element(widgets, &registry).unwrap();

        assert_eq!(graph.children(root, &registry), vec![widgets]);
    }

    #[test]
    fn two_containers_are_both_shown() {
        let mut registry = ClassRegistry::new();
        registry.register(ClassDescriptor::new("Widget"));
        registry.register(
            ClassDescriptor::new("Style")
                .with_property(PropertyDescriptor::new("color", PropertyKind::String)),
        );
        let page = registry.register(
            ClassDescriptor::new("Page")
                .with_property(PropertyDescriptor::new("style", PropertyKind::Object("Style")))
                .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
        );

        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        let style = graph.insert_object(root, "style", &registry).unwrap();
        let widgets = graph.insert_array(root, "widgets", &registry).unwrap();

        assert_eq!(graph.children(root, &registry), vec![style, widgets]);
    }

    #[test]
    fn non_enumerable_containers_are_skipped() {
        let mut registry = ClassRegistry::new();
        registry.register(
            ClassDescriptor::new("Style")
                .with_property(PropertyDescriptor::new("color", PropertyKind::String)),
        );
        let page = registry.register(ClassDescriptor::new("Page").with_property(
            PropertyDescriptor::new("style", PropertyKind::Object("Style")).not_enumerable(),
        ));

        let mut graph = Graph::new();
        let root = graph.insert_root(page, "main");
        graph.insert_object(root, "style", &registry).unwrap();

        assert!(graph.children(root, &registry).is_empty());
    }

    #[test]
    fn value_node_wraps_scalar_property() {
        let mut f = fixture();
        let w = named(&mut f, "button1");

        let v = f.graph.value_node(w, "name", &f.registry).unwrap();
        assert_eq!(v.id, "main.widgets.0.name");
        assert_eq!(v.key, "name");
        assert_eq!(v.parent, w);
        assert_eq!(v.value, Some(Value::from("button1")));

        // Containers and unknown names have no value node.
        assert!(f.graph.value_node(w, "style", &f.registry).is_none());
        assert!(f.graph.value_node(w, "nope", &f.registry).is_none());
    }

    #[test]
    fn path_and_resolve_round_trip() {
        let mut f = fixture();
        let _a = named(&mut f, "a");
        let b = named(&mut f, "b");
        let style = f.graph.insert_object(b, "style", &f.registry).unwrap();

        let path = f.graph.path(style);
        assert_eq!(
            path,
            vec![
                PathSegment::Field("widgets"),
                PathSegment::Index(1),
                PathSegment::Field("style"),
            ]
        );
        assert_eq!(f.graph.resolve(f.root, &path, &f.registry), Some(style));
        assert!(f.graph.path(f.root).is_empty());
    }

    #[test]
    fn resolve_rejects_mismatched_segments() {
        let mut f = fixture();
        let a = named(&mut f, "a");

        // Index against an object node, field against an array node.
        assert_eq!(
            f.graph
                .resolve(f.root, &[PathSegment::Index(0)], &f.registry),
            None
        );
        assert_eq!(
            f.graph
                .resolve(f.widgets, &[PathSegment::Field("a")], &f.registry),
            None
        );
        assert_eq!(
            f.graph
                .resolve(f.widgets, &[PathSegment::Index(0)], &f.registry),
            Some(a)
        );
        // Out of range is a miss, not a panic.
        assert_eq!(
            f.graph
                .resolve(f.widgets, &[PathSegment::Index(9)], &f.registry),
            None
        );
    }

    #[test]
    fn child_resolves_nodes_and_values() {
        let mut f = fixture();
        let a = named(&mut f, "a");
        let style = f.graph.insert_object(a, "style", &f.registry).unwrap();

        assert_eq!(
            f.graph.child(f.root, "widgets", &f.registry),
            Some(Child::Node(f.widgets))
        );
        assert_eq!(
            f.graph.child(f.widgets, "0", &f.registry),
            Some(Child::Node(a))
        );
        assert_eq!(
            f.graph.child(a, "style", &f.registry),
            Some(Child::Node(style))
        );
        match f.graph.child(a, "name", &f.registry) {
            Some(Child::Value(v)) => {
                assert_eq!(v.id, "main.widgets.0.name");
                assert_eq!(v.value, Some(Value::from("a")));
            }
            other => panic!("expected a value child, got {other:?}"),
        }
        // Non-numeric key on an array, unknown property on an object.
        assert_eq!(f.graph.child(f.widgets, "first", &f.registry), None);
        assert_eq!(f.graph.child(a, "nope", &f.registry), None);
    }

    #[test]
    fn path_string_joins_segments() {
        let mut f = fixture();
        let _a = named(&mut f, "a");
        let b = named(&mut f, "b");
        let style = f.graph.insert_object(b, "style", &f.registry).unwrap();

        assert_eq!(f.graph.path_string(style), "widgets/1/style");
        assert_eq!(f.graph.path_string(f.root), "");
    }

    #[test]
    fn resolve_names_parses_indices() {
        let mut f = fixture();
        let b = {
            let _ = named(&mut f, "a");
            named(&mut f, "b")
        };
        let style = f.graph.insert_object(b, "style", &f.registry).unwrap();

        assert_eq!(
            f.graph
                .resolve_names(f.root, ["widgets", "1", "style"], &f.registry),
            Some(style)
        );
        assert_eq!(
            f.graph.resolve_names(f.root, ["widgets", "x"], &f.registry),
            None
        );
    }

    #[test]
    fn find_by_id_exact_and_pruned() {
        let mut f = fixture();
        let a = named(&mut f, "a");
        let b = named(&mut f, "b");
        let style = f.graph.insert_object(b, "style", &f.registry).unwrap();

        assert_eq!(f.graph.find_by_id(f.root, "main"), Some(f.root));
        assert_eq!(f.graph.find_by_id(f.root, "main.widgets.0"), Some(a));
        assert_eq!(f.graph.find_by_id(f.root, "main.widgets.1.style"), Some(style));
        assert_eq!(f.graph.find_by_id(f.root, "main.widgets.9"), None);
        assert_eq!(f.graph.find_by_id(f.root, "elsewhere"), None);
    }

    #[test]
    fn find_by_id_rejects_bare_prefix() {
        let mut registry = ClassRegistry::new();
        registry.register(
            ClassDescriptor::new("Style")
                .with_property(PropertyDescriptor::new("color", PropertyKind::String)),
        );
        let page = registry.register(
            ClassDescriptor::new("Page")
                .with_property(PropertyDescriptor::new("b", PropertyKind::Object("Style")))
                .with_property(PropertyDescriptor::new("bb", PropertyKind::Object("Style"))),
        );

        let mut graph = Graph::new();
        let root = graph.insert_root(page, "a");
        let b = graph.insert_object(root, "b", &registry).unwrap();
        let bb = graph.insert_object(root, "bb", &registry).unwrap();

        // "a.bb" must not match the node "a.b" by prefix.
        assert_eq!(graph.find_by_id(root, "a.b"), Some(b));
        assert_eq!(graph.find_by_id(root, "a.bb"), Some(bb));
        assert_eq!(graph.find_by_id(root, "a.bbb"), None);
    }

    #[test]
    fn ancestor_tests_reflexive_and_strict() {
        let mut f = fixture();
        let a = named(&mut f, "a");

        assert!(f.graph.is_ancestor(a, a));
        assert!(!f.graph.is_proper_ancestor(a, a));
        assert!(f.graph.is_ancestor(a, f.widgets));
        assert!(f.graph.is_proper_ancestor(a, f.widgets));
        assert!(f.graph.is_ancestor(a, f.root));
        assert!(!f.graph.is_ancestor(f.root, a));
    }

    #[test]
    fn ancestor_of_class_walks_subclasses() {
        let mut f = fixture();
        let b = named(&mut f, "b");
        let style = f.graph.insert_object(b, "style", &f.registry).unwrap();

        let page = f.registry.lookup("Page").unwrap();
        let widget = f.registry.lookup("Widget").unwrap();

        assert_eq!(
            f.graph.ancestor_of_class(style, widget, &f.registry),
            Some(b)
        );
        assert_eq!(
            f.graph.ancestor_of_class(style, page, &f.registry),
            Some(f.root)
        );
        assert_eq!(f.graph.ancestor_of_class(f.root, widget, &f.registry), None);
    }

    #[test]
    fn root_of_and_ancestors() {
        let mut f = fixture();
        let b = named(&mut f, "b");
        let style = f.graph.insert_object(b, "style", &f.registry).unwrap();

        assert_eq!(f.graph.root_of(style), f.root);
        assert_eq!(f.graph.ancestors(style), vec![b, f.widgets, f.root]);
        assert!(f.graph.ancestors(f.root).is_empty());
    }

    #[test]
    fn labels_prefer_hook_then_name_then_id() {
        let mut f = fixture();
        let w = named(&mut f, "button1");

        assert_eq!(f.graph.label(f.root, &f.registry), "main");
        assert_eq!(f.graph.label(w, &f.registry), "button1");
        // Array node labeled by its owning property.
        assert_eq!(f.graph.label(f.widgets, &f.registry), "Widgets");
        assert_eq!(
            f.graph.display_path(w, &f.registry),
            "main / Widgets / button1"
        );
    }
}
