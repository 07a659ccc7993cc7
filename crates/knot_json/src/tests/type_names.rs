use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use serde_json::{Value, json};

use crate::derive::Reflect;
use crate::error::ErrorKind;
use crate::registry::TypeRegistry;
use crate::settings::TypeNameHandling;
use crate::{Settings, from_value, to_value};

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Circle {
    radius: f64,
}

#[derive(Reflect, Debug)]
#[knot(constructor(new(shape)))]
struct Drawing {
    shape: Box<dyn crate::Reflect>,
}

impl Drawing {
    fn new(shape: Box<dyn crate::Reflect>) -> Self {
        Self { shape }
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Circle>();
    registry
}

#[test]
fn boxed_values_carry_their_runtime_type() {
    let drawing = Drawing::new(Box::new(Circle { radius: 2.0 }));
    let settings = Settings::new().with_type_name_handling(TypeNameHandling::Auto);

    let node = to_value(&drawing, &settings).unwrap();
    assert_eq!(
        node,
        json!({"shape": {"$type": "knot_json::tests::type_names::Circle", "radius": 2.0}})
    );

    let settings = settings.with_registry(registry());
    let back: Drawing = from_value(&node, &settings).unwrap();
    assert_eq!(back.shape.downcast_ref::<Circle>(), Some(&Circle { radius: 2.0 }));

    let short = json!({"shape": {"$type": "Circle", "radius": 1.0}});
    let back: Drawing = from_value(&short, &settings).unwrap();
    assert_eq!(back.shape.downcast_ref::<Circle>(), Some(&Circle { radius: 1.0 }));
}

#[test]
fn unresolved_names_are_errors() {
    let node = json!({"shape": {"$type": "Circle", "radius": 1.0}});
    let settings = Settings::new().with_type_name_handling(TypeNameHandling::Auto);

    let error = from_value::<Drawing>(&node, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::TypeResolution { name, .. } if name == "Circle"));
    assert_eq!(error.path().to_string(), "shape");

    let settings = settings.with_registry(TypeRegistry::new());
    let error = from_value::<Drawing>(&node, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::TypeResolution { .. }));
}

#[test]
fn names_are_ignored_without_type_name_handling() {
    let settings = Settings::new().with_registry(registry());

    let node = json!({"shape": {"$type": "Circle", "radius": 1.0}});
    let drawing: Drawing = from_value(&node, &settings).unwrap();
    assert!(drawing.shape.downcast_ref::<Circle>().is_none());
    assert_eq!(drawing.shape.downcast_ref::<Value>(), Some(&node["shape"]));

    let wrong = json!({"$type": "demo::Square", "radius": 3.0});
    let circle: Circle = from_value(&wrong, &Settings::new()).unwrap();
    assert_eq!(circle, Circle { radius: 3.0 });
}

#[derive(Reflect, Default, Debug)]
#[knot(default)]
struct Frame {
    #[knot(type_name_handling = "auto")]
    shape: Option<Box<dyn crate::Reflect>>,
    #[knot(item_type_name_handling = "auto")]
    layers: Vec<Box<dyn crate::Reflect>>,
    untyped: Option<Box<dyn crate::Reflect>>,
}

#[test]
fn members_and_items_enable_names_on_their_own() {
    let settings = Settings::new().with_registry(registry());
    let node = json!({
        "shape": {"$type": "Circle", "radius": 1.0},
        "layers": [{"$type": "Circle", "radius": 2.0}],
        "untyped": {"$type": "Circle", "radius": 3.0},
    });

    let frame: Frame = from_value(&node, &settings).unwrap();
    let shape = frame.shape.as_deref().and_then(|shape| shape.downcast_ref::<Circle>());
    assert_eq!(shape, Some(&Circle { radius: 1.0 }));
    assert_eq!(frame.layers[0].downcast_ref::<Circle>(), Some(&Circle { radius: 2.0 }));

    let untyped = frame.untyped.as_deref().and_then(|value| value.downcast_ref::<Value>());
    assert_eq!(untyped, Some(&node["untyped"]));
}

#[test]
fn untyped_boxes_hold_the_node() {
    let node = json!({"shape": {"radius": 1.0}});
    let drawing: Drawing = from_value(&node, &Settings::new()).unwrap();
    assert_eq!(drawing.shape.downcast_ref::<Value>(), Some(&json!({"radius": 1.0})));

    // Written back as is, without a type name.
    let settings = Settings::new().with_type_name_handling(TypeNameHandling::Auto);
    assert_eq!(to_value(&drawing, &settings).unwrap(), node);
}

#[test]
fn boxed_scalars_are_wrapped() {
    let drawing = Drawing::new(Box::new(5_i32));
    let settings = Settings::new()
        .with_type_name_handling(TypeNameHandling::Auto)
        .with_registry(registry());

    let node = to_value(&drawing, &settings).unwrap();
    assert_eq!(node, json!({"shape": {"$type": "i32", "$value": 5}}));

    let back: Drawing = from_value(&node, &settings).unwrap();
    assert_eq!(back.shape.downcast_ref::<i32>(), Some(&5));
}

#[test]
fn static_slots_only_accept_their_own_type() {
    let settings = Settings::new().with_type_name_handling(TypeNameHandling::Objects);
    let circle = Circle { radius: 3.0 };

    let node = to_value(&circle, &settings).unwrap();
    assert_eq!(
        node,
        json!({"$type": "knot_json::tests::type_names::Circle", "radius": 3.0})
    );
    assert_eq!(from_value::<Circle>(&node, &settings).unwrap(), circle);

    let wrong = json!({"$type": "demo::Square", "radius": 3.0});
    let error = from_value::<Circle>(&wrong, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::TypeResolution { .. }));
}

#[test]
fn arrays_are_wrapped_when_named() {
    let settings = Settings::new().with_type_name_handling(TypeNameHandling::Arrays);
    let node = to_value(&vec![1_i32, 2], &settings).unwrap();
    assert_eq!(node["$values"], json!([1, 2]));
    assert!(node["$type"].is_string());

    let back: Vec<i32> = from_value(&node, &settings).unwrap();
    assert_eq!(back, [1, 2]);
}

#[cfg(feature = "auto_register")]
mod auto_register {
    use core::any::TypeId;

    use crate::derive::Reflect;
    use crate::registry::TypeRegistry;

    #[derive(Reflect, Default)]
    #[knot(default, auto_register)]
    struct Square {
        side: f64,
    }

    #[test]
    fn marked_types_are_collected() {
        let mut registry = TypeRegistry::empty();
        if registry.auto_register() {
            assert!(registry.contains(TypeId::of::<Square>()));
            assert!(registry.resolve_name("Square").is_some());
        }
    }
}
