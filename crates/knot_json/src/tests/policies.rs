use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::any::TypeId;

use serde_json::{Value, json};

use crate::de::DeserializeProcessor;
use crate::derive::Reflect;
use crate::error::ErrorKind;
use crate::info::TypeInfo;
use crate::ser::SerializeProcessor;
use crate::settings::{DefaultValueHandling, MetadataPropertyHandling, MissingMemberHandling};
use crate::settings::NullValueHandling;
use crate::{Error, Expando, Result, Settings, Shared, from_value, to_value};

#[derive(Reflect, Default, Debug)]
#[knot(default)]
struct Gauge {
    #[knot(default_value = 1000.0, default_value_handling = "ignore")]
    value: f64,
}

#[test]
fn float_defaults_compare_with_tolerance() {
    let settings = Settings::new();
    let near = Gauge {
        value: 1000.000_000_000_000_1,
    };
    assert_eq!(to_value(&near, &settings).unwrap(), json!({}));

    let far = Gauge {
        value: 1000.000_000_000_001,
    };
    assert_eq!(
        to_value(&far, &settings).unwrap(),
        json!({"value": 1000.000_000_000_001})
    );
}

#[test]
fn type_defaults_are_ignored_on_request() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Counter {
        hits: u32,
        label: Option<String>,
        tags: Vec<String>,
    }

    let settings = Settings::new().with_default_value_handling(DefaultValueHandling::IGNORE);
    assert_eq!(
        to_value(&Counter::default(), &settings).unwrap(),
        json!({"tags": []})
    );
}

#[test]
fn member_null_handling_overrides_settings() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Contact {
        #[knot(null_value_handling = "ignore")]
        email: Option<String>,
        phone: Option<String>,
    }

    assert_eq!(
        to_value(&Contact::default(), &Settings::new()).unwrap(),
        json!({"phone": null})
    );
}

#[derive(Reflect, Default, Debug)]
#[knot(default)]
struct Plain {
    a: i32,
}

#[derive(Reflect, Default, Debug)]
#[knot(default, missing_member = "error")]
struct Closed {
    a: i32,
}

#[test]
fn unknown_members() {
    let node = json!({"a": 1, "zz": 2});
    let plain: Plain = from_value(&node, &Settings::new()).unwrap();
    assert_eq!(plain.a, 1);

    let settings = Settings::new().with_missing_member_handling(MissingMemberHandling::Error);
    let error = from_value::<Plain>(&node, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnknownMember { member, .. } if member == "zz"));
    assert_eq!(error.path().to_string(), "zz");

    let error = from_value::<Closed>(&node, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnknownMember { .. }));
}

#[test]
fn nesting_depth_is_bounded() {
    let settings = Settings::new().with_max_depth(2);
    let nested = vec![vec![vec![1_i32]]];

    let error = to_value(&nested, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::NestingDepthExceeded { max: 2 }));
    assert_eq!(error.path().to_string(), "[0][0]");

    let error = from_value::<Vec<Vec<Vec<i32>>>>(&json!([[[1]]]), &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::NestingDepthExceeded { .. }));

    let shallow: Vec<Vec<i32>> = from_value(&json!([[1]]), &settings).unwrap();
    assert_eq!(shallow, [[1]]);
}

#[derive(Reflect, Default, Debug)]
#[knot(default)]
struct Cell {
    value: i32,
}

#[test]
fn trailing_metadata_needs_read_ahead() {
    let node = json!([{"value": 1, "$id": "1"}, {"$ref": "1"}]);

    let error = from_value::<Vec<Shared<Cell>>>(&node, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::DanglingReference { .. }));

    let settings =
        Settings::new().with_metadata_property_handling(MetadataPropertyHandling::ReadAhead);
    let cells: Vec<Shared<Cell>> = from_value(&node, &settings).unwrap();
    assert!(Shared::ptr_eq(&cells[0], &cells[1]));
    assert_eq!(cells[1].borrow().value, 1);
}

#[test]
fn ignored_metadata_reads_as_data() {
    let settings = Settings::new()
        .with_metadata_property_handling(MetadataPropertyHandling::Ignore)
        .with_missing_member_handling(MissingMemberHandling::Error);
    let error = from_value::<Cell>(&json!({"$id": "1", "value": 1}), &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnknownMember { member, .. } if member == "$id"));
}

#[test]
fn expando_members_are_dynamic() {
    let settings = Settings::new().with_null_value_handling(NullValueHandling::Ignore);
    let mut expando = Expando::new();
    expando.insert("count", 3_i32);
    expando.insert("gone", Value::Null);
    expando.insert("cell", Cell { value: 4 });

    assert_eq!(
        to_value(&expando, &settings).unwrap(),
        json!({"count": 3, "cell": {"value": 4}})
    );
}

/// Writes `f64` values as strings and reads them back.
struct FloatAsString;

impl SerializeProcessor for FloatAsString {
    fn serialize(&self, value: &dyn crate::Reflect, _: &Settings) -> Option<Result<Value>> {
        let value = value.downcast_ref::<f64>()?;
        Some(Ok(Value::String(value.to_string())))
    }
}

impl DeserializeProcessor for FloatAsString {
    fn deserialize(
        &self,
        node: &Value,
        info: &'static TypeInfo,
        _: &Settings,
    ) -> Option<Result<Box<dyn crate::Reflect>>> {
        if info.type_id() != TypeId::of::<f64>() {
            return None;
        }
        let text = node.as_str()?;
        Some(
            text.parse::<f64>()
                .map(|value| Box::new(value) as Box<dyn crate::Reflect>)
                .map_err(Error::custom),
        )
    }
}

#[test]
fn processors_take_over_values() {
    let settings = Settings::new()
        .with_serialize_processor(FloatAsString)
        .with_deserialize_processor(FloatAsString);

    let gauge = Gauge { value: 2.5 };
    let node = to_value(&gauge, &settings).unwrap();
    assert_eq!(node, json!({"value": "2.5"}));

    let back: Gauge = from_value(&node, &settings).unwrap();
    assert_eq!(back.value, 2.5);

    let error = from_value::<Gauge>(&json!({"value": "x"}), &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::Custom(_)));
    assert_eq!(error.path().to_string(), "value");
}
