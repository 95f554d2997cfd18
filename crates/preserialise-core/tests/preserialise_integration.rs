//! End-to-end tests for the pre-serialisation engine
//!
//! These tests exercise the engine against a small domain model with mutual
//! references, where each side bounds its own expansion through
//! caller-supplied args.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use preserialise_core::{args, Args, Error, Map, Preserialisable, Preserialiser, Result, Value};
use serde_json::json;

struct Parent {
    children: RefCell<Vec<Rc<Child>>>,
}

struct Child {
    parent: RefCell<Weak<Parent>>,
}

impl Parent {
    fn with_children(count: usize) -> Rc<Self> {
        let parent = Rc::new(Parent {
            children: RefCell::new(Vec::new()),
        });
        for _ in 0..count {
            let child = Rc::new(Child {
                parent: RefCell::new(Rc::downgrade(&parent)),
            });
            parent.children.borrow_mut().push(child);
        }
        parent
    }
}

impl Preserialisable for Parent {
    fn preserialise(&self, args: &Args) -> Result<Value> {
        let mut data = Map::new();
        data.insert("type".to_string(), Value::from("parent"));

        let include_children = args
            .get("include_children")
            .and_then(|flag| flag.as_bool())
            .unwrap_or(false);
        if include_children {
            let children: Vec<Value> = self
                .children
                .borrow()
                .iter()
                .cloned()
                .map(|child| Value::preserialisable(child))
                .collect();
            data.insert("children".to_string(), Value::Seq(children));
        }

        Ok(Value::Map(data))
    }
}

impl Preserialisable for Child {
    fn preserialise(&self, args: &Args) -> Result<Value> {
        let mut data = Map::new();
        data.insert("type".to_string(), Value::from("child"));

        let include_parent = args
            .get("include_parent")
            .and_then(|flag| flag.as_bool())
            .unwrap_or(false);
        if include_parent {
            if let Some(parent) = self.parent.borrow().upgrade() {
                data.insert("parent".to_string(), Value::preserialisable(parent));
            }
        }

        Ok(Value::Map(data))
    }
}

#[test]
fn test_parent_without_children_stays_flat() {
    let p = Preserialiser::new();
    let parent = Parent::with_children(2);

    // `include_parent` is on, but never consulted because we do not descend
    // into the child nodes
    let result = p
        .preserialise_with(
            Value::preserialisable(parent),
            args! { "include_parent" => true },
        )
        .unwrap();

    assert_eq!(result, json!({"type": "parent"}));
}

#[test]
fn test_parent_expands_children_on_request() {
    let p = Preserialiser::new();
    let parent = Parent::with_children(2);

    let result = p
        .preserialise_with(
            Value::preserialisable(parent),
            args! { "include_children" => true },
        )
        .unwrap();

    let children = result["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    // The children did not expand their parent back: one nested level, then
    // the graph terminates
    assert_eq!(children[0], json!({"type": "child"}));
}

#[test]
fn test_child_expands_parent_on_request() {
    let p = Preserialiser::new();
    let parent = Parent::with_children(2);
    let child = parent.children.borrow()[0].clone();

    let result = p
        .preserialise_with(
            Value::preserialisable(child),
            args! { "include_parent" => true },
        )
        .unwrap();

    assert_eq!(result["parent"]["type"], "parent");
}

#[test]
fn test_mutual_expansion_hits_the_depth_guard() {
    let mut p = Preserialiser::new();
    p.set_max_depth(10);
    let parent = Parent::with_children(2);

    // Rendering the relationship from both sides never terminates on its
    // own; the depth guard converts it into a reported failure
    let err = p
        .preserialise_with(
            Value::preserialisable(parent),
            args! { "include_children" => true, "include_parent" => true },
        )
        .unwrap_err();

    assert!(matches!(err, Error::MaxDepthExceeded { max_depth: 10 }));
}

#[test]
fn test_output_feeds_a_downstream_encoder() {
    let p = Preserialiser::new();
    let parent = Parent::with_children(1);

    let result = p
        .preserialise_with(
            Value::preserialisable(parent),
            args! { "include_children" => true },
        )
        .unwrap();

    let encoded = serde_json::to_string(&result).unwrap();
    assert_eq!(encoded, r#"{"type":"parent","children":[{"type":"child"}]}"#);
}

#[test]
fn test_effective_args_are_shared_across_the_whole_call() {
    // Both the parent and its children observe the same merged set
    struct Echo;

    impl Preserialisable for Echo {
        fn preserialise(&self, args: &Args) -> Result<Value> {
            Ok(Value::from(args.clone()))
        }
    }

    let p = Preserialiser::new().with_default_args(args! { "tenant" => "acme" });

    let pair = Value::Seq(vec![
        Value::preserialisable(Rc::new(Echo)),
        Value::preserialisable(Rc::new(Echo)),
    ]);
    let result = p
        .preserialise_with(pair, args! { "request_id" => 7 })
        .unwrap();

    let expected = json!({"tenant": "acme", "request_id": 7});
    assert_eq!(result, json!([expected.clone(), expected]));
}
