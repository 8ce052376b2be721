// Copyright 2025 the Rootstock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for the `rootstock_graph` crate.
//!
//! These build a registry the way an application would, load a raw
//! document through the loader, and exercise addressing over the result.

use rootstock_class::{
    ClassDescriptor, ClassOverrides, ClassRegistry, PropertyDescriptor, PropertyKind, Value,
};
use rootstock_graph::{Graph, PathSegment, load};

fn map(pairs: &[(&str, Value)]) -> Value {
    Value::Map(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect(),
    )
}

fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    registry.register(
        ClassDescriptor::new("Style")
            .with_property(PropertyDescriptor::new("color", PropertyKind::String).optional()),
    );
    let widget = registry.register(
        ClassDescriptor::new("Widget")
            .with_property(PropertyDescriptor::new("name", PropertyKind::String).unique())
            .with_property(PropertyDescriptor::new("width", PropertyKind::Number).optional())
            .with_property(PropertyDescriptor::new("style", PropertyKind::Object("Style")).optional())
            .label(|e| e.scalar("name").and_then(|v| v.as_str()).map(String::from)),
    );
    registry.derive(
        widget,
        ClassOverrides::new("Button")
            .with_property(PropertyDescriptor::new("text", PropertyKind::String).optional()),
    );
    registry.register(
        ClassDescriptor::new("Page")
            .with_property(PropertyDescriptor::new("name", PropertyKind::String))
            .with_property(PropertyDescriptor::new("widgets", PropertyKind::Array("Widget"))),
    );
    registry
}

fn document() -> Value {
    map(&[
        ("name", Value::from("Main")),
        (
            "widgets",
            Value::List(vec![
                map(&[
                    ("name", Value::from("button1")),
                    ("width", Value::Number(80.0)),
                    ("style", map(&[("color", Value::from("#ff0000"))])),
                ]),
                map(&[("name", Value::from("label1"))]),
                map(&[("name", Value::from("label2"))]),
            ]),
        ),
    ])
}

#[test]
fn loaded_tree_is_fully_addressable() {
    let registry = registry();
    let page = registry.lookup("Page").unwrap();
    let mut graph = Graph::new();
    let root = load(&mut graph, &registry, page, "main", document()).unwrap();

    // Id-based addressing.
    let button = graph.find_by_id(root, "main.widgets.0").unwrap();
    let style = graph.find_by_id(root, "main.widgets.0.style").unwrap();
    assert_eq!(graph.parent(style), Some(button));

    // Structural paths round-trip.
    let path = graph.path(style);
    assert_eq!(
        path,
        vec![
            PathSegment::Field("widgets"),
            PathSegment::Index(0),
            PathSegment::Field("style"),
        ]
    );
    assert_eq!(graph.resolve(root, &path, &registry), Some(style));
    assert_eq!(
        graph.resolve_names(root, ["widgets", "0", "style"], &registry),
        Some(style)
    );

    // The page's single array is elided: its elements are the children.
    let children = graph.children(root, &registry);
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], button);

    // Labels come from the Widget label hook.
    assert_eq!(graph.label(button, &registry), "button1");
    assert_eq!(
        graph.display_path(style, &registry),
        "main / Widgets / button1 / main.widgets.0.style"
    );
}

#[test]
fn removal_keeps_sibling_ids_and_reports_detachment() {
    let registry = registry();
    let page = registry.lookup("Page").unwrap();
    let mut graph = Graph::new();
    let root = load(&mut graph, &registry, page, "main", document()).unwrap();

    let widgets = graph.child_by_name(root, "widgets", &registry).unwrap();
    let label1 = graph.find_by_id(root, "main.widgets.1").unwrap();
    let label2 = graph.find_by_id(root, "main.widgets.2").unwrap();

    assert!(graph.remove_element(widgets, 1));
    assert!(!graph.is_attached(label1));
    assert!(graph.is_attached(label2));

    // The survivor shifted position but kept its id, and stays findable.
    assert_eq!(graph.element(widgets, 1), Some(label2));
    assert_eq!(graph.id(label2), Some("main.widgets.2"));
    assert_eq!(graph.find_by_id(root, "main.widgets.2"), Some(label2));
    assert_eq!(graph.find_by_id(root, "main.widgets.1"), None);
}

#[test]
fn derived_class_loads_base_and_own_properties() {
    let registry = registry();
    let button = registry.lookup("Button").unwrap();
    let mut graph = Graph::new();
    let raw = map(&[
        ("name", Value::from("ok")),
        ("text", Value::from("OK")),
        ("width", Value::Number(64.0)),
    ]);

    let root = load(&mut graph, &registry, button, "btn", raw).unwrap();
    assert_eq!(graph.scalar(root, "text", &registry), Some(&Value::from("OK")));
    assert_eq!(
        graph.scalar(root, "width", &registry),
        Some(&Value::Number(64.0))
    );

    let widget = registry.lookup("Widget").unwrap();
    assert_eq!(graph.ancestor_of_class(root, widget, &registry), Some(root));
}
