use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use serde_json::json;

use crate::derive::Reflect;
use crate::error::ErrorKind;
use crate::settings::{PreserveReferencesHandling, ReferenceLoopHandling};
use crate::{Settings, Shared, from_value, to_string, to_value};

#[derive(Reflect, Default)]
#[knot(default)]
struct Node {
    name: String,
    children: Vec<Shared<Node>>,
}

/// A node listing itself as its only child.
fn self_loop() -> Shared<Node> {
    let node = Shared::new(Node {
        name: String::from("a"),
        children: Vec::new(),
    });
    node.borrow_mut().children.push(node.clone());
    node
}

fn break_loop(node: &Shared<Node>) {
    node.borrow_mut().children.clear();
}

#[test]
fn ignored_loops_leave_empty_containers() {
    let node = self_loop();
    let settings = Settings::new().with_reference_loop_handling(ReferenceLoopHandling::Ignore);
    assert_eq!(
        to_value(&node, &settings).unwrap(),
        json!({"name": "a", "children": []})
    );
    break_loop(&node);
}

#[test]
fn loops_are_errors_by_default() {
    let node = self_loop();
    let error = to_value(&node, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ReferenceLoop { .. }));
    assert_eq!(error.path().to_string(), "children[0]");
    assert!(error.to_string().contains("Path 'children[0]'"));
    break_loop(&node);
}

#[test]
fn member_level_loop_handling_wins() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Parent {
        #[knot(item_reference_loop_handling = "ignore")]
        children: Vec<Shared<Parent>>,
    }

    let parent = Shared::new(Parent::default());
    parent.borrow_mut().children.push(parent.clone());
    assert_eq!(
        to_value(&parent, &Settings::new()).unwrap(),
        json!({"children": []})
    );
    parent.borrow_mut().children.clear();
}

#[test]
fn preserved_loops_round_trip() {
    let node = self_loop();
    let settings =
        Settings::new().with_preserve_references_handling(PreserveReferencesHandling::Objects);
    let text = to_string(&node, &settings).unwrap();
    assert_eq!(text, r#"{"$id":"1","name":"a","children":[{"$ref":"1"}]}"#);
    break_loop(&node);

    let node: Shared<Node> = crate::from_str(&text, &settings).unwrap();
    assert!(Shared::ptr_eq(&node, &node.borrow().children[0]));
    break_loop(&node);
}

#[derive(Reflect, Debug)]
#[knot(constructor(new(left, right)))]
struct Pair {
    left: Shared<Leaf>,
    right: Shared<Leaf>,
}

impl Pair {
    fn new(left: Shared<Leaf>, right: Shared<Leaf>) -> Self {
        Self { left, right }
    }
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Leaf {
    value: i32,
}

#[test]
fn diamonds_keep_their_aliasing() {
    let leaf = Shared::new(Leaf { value: 3 });
    let pair = Pair::new(leaf.clone(), leaf);
    let settings = Settings::new().with_preserve_references_handling(PreserveReferencesHandling::All);

    let node = to_value(&pair, &settings).unwrap();
    assert_eq!(
        node,
        json!({"left": {"$id": "1", "value": 3}, "right": {"$ref": "1"}})
    );

    let back: Pair = from_value(&node, &settings).unwrap();
    assert!(Shared::ptr_eq(&back.left, &back.right));
    assert_eq!(back.left.borrow().value, 3);

    // Without preservation both sides are written out.
    assert_eq!(
        to_value(&pair, &Settings::new()).unwrap(),
        json!({"left": {"value": 3}, "right": {"value": 3}})
    );
}

#[test]
fn forward_references_are_patched() {
    let node = json!({"left": {"$ref": "1"}, "right": {"$id": "1", "value": 4}});
    let pair: Pair = from_value(&node, &Settings::new()).unwrap();
    assert!(Shared::ptr_eq(&pair.left, &pair.right));
    assert_eq!(pair.left.borrow().value, 4);
}

#[test]
fn reference_errors() {
    let settings = Settings::new();

    let dangling = json!({"left": {"$ref": "9"}, "right": {"value": 1}});
    let error = from_value::<Pair>(&dangling, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::DanglingReference { id } if id == "9"));
    assert_eq!(error.path().to_string(), "left");

    let duplicate = json!({"left": {"$id": "1", "value": 1}, "right": {"$id": "1", "value": 2}});
    let error = from_value::<Pair>(&duplicate, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::DuplicateReference { .. }));

    let unshared = json!({"value": {"$ref": "1"}});
    let error = from_value::<Leaf>(&unshared, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnsupportedReference { .. }));
}

#[test]
fn arrays_built_from_their_items_cannot_carry_ids() {
    let node = json!({"$id": "1", "$values": [1, 2]});
    let error = from_value::<Shared<Box<[i32]>>>(&node, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnsupportedReference { .. }));

    let plain: Shared<Box<[i32]>> = from_value(&json!([1, 2]), &Settings::new()).unwrap();
    assert_eq!(&**plain.borrow(), &[1, 2]);
}

#[test]
fn ids_on_values_without_identity_are_ignored() {
    let leaf: Leaf = from_value(&json!({"$id": "5", "value": 2}), &Settings::new()).unwrap();
    assert_eq!(leaf, Leaf { value: 2 });
}

type Slots = Vec<Option<Box<dyn crate::Reflect>>>;

#[test]
fn self_containing_arrays_round_trip() {
    let settings = Settings::new().with_preserve_references_handling(PreserveReferencesHandling::All);
    let node = json!({"$id": "1", "$values": [null, {"$ref": "1"}]});

    let list: Shared<Slots> = from_value(&node, &settings).unwrap();
    {
        let items = list.borrow();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_none());
        let inner = items[1]
            .as_deref()
            .and_then(|value| value.downcast_ref::<Shared<Slots>>())
            .unwrap();
        assert!(Shared::ptr_eq(&list, inner));
    }

    assert_eq!(to_value(&list, &settings).unwrap(), node);
    list.borrow_mut().clear();
}

#[test]
fn shared_scalars_are_written_inline() {
    let settings = Settings::new().with_preserve_references_handling(PreserveReferencesHandling::All);
    let value = Shared::new(5_i32);
    let list = vec![value.clone(), value];
    assert_eq!(to_value(&list, &settings).unwrap(), json!([5, 5]));
}
