use alloc::collections::BTreeMap;
use alloc::string::String;

use serde_json::{Value, json};

use crate::derive::Reflect;
use crate::error::ErrorKind;
use crate::{Settings, from_str, from_value, to_string, to_value};

#[derive(Reflect, Default)]
#[knot(default)]
struct Record {
    #[knot(rename = "Name")]
    name: String,
    #[knot(extension_data)]
    extra: BTreeMap<String, Value>,
}

#[test]
fn unmatched_members_round_trip() {
    let settings = Settings::new();
    let record: Record = from_str(r#"{"Name":"x","Extra1":1}"#, &settings).unwrap();
    assert_eq!(record.name, "x");
    assert_eq!(record.extra.get("Extra1"), Some(&json!(1)));

    assert_eq!(to_string(&record, &settings).unwrap(), r#"{"Name":"x","Extra1":1}"#);
}

#[test]
fn declared_members_shadow_extension_keys() {
    let mut record = Record {
        name: String::from("x"),
        extra: BTreeMap::new(),
    };
    record.extra.insert(String::from("Name"), json!("shadowed"));
    record.extra.insert(String::from("other"), json!(true));

    assert_eq!(
        to_value(&record, &Settings::new()).unwrap(),
        json!({"Name": "x", "other": true})
    );
}

#[derive(Reflect, Default, Debug)]
#[knot(default)]
struct Twice {
    #[knot(extension_data)]
    first: BTreeMap<String, Value>,
    #[knot(extension_data)]
    second: Option<BTreeMap<String, Value>>,
}

#[test]
fn only_the_first_extension_member_is_used() {
    let twice: Twice = from_str(r#"{"a":1}"#, &Settings::new()).unwrap();
    assert_eq!(twice.first.len(), 1);
    assert!(twice.second.is_none());

    let error = from_str::<Twice>(r#"{"a":1}"#, &Settings::new().with_strict_extension_data(true))
        .unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::Contract { .. }));
}

#[test]
fn absent_extension_dictionaries_are_created() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Lazy {
        #[knot(extension_data)]
        extra: Option<BTreeMap<String, i64>>,
    }

    let lazy: Lazy = from_value(&json!({"x": 1, "y": 2}), &Settings::new()).unwrap();
    let extra = lazy.extra.unwrap();
    assert_eq!(extra.get("y"), Some(&2));
}

#[test]
fn absent_extension_data_must_be_settable() {
    #[derive(Reflect, Default, Debug)]
    #[knot(default)]
    struct Frozen {
        #[knot(extension_data, read_only)]
        extra: Option<BTreeMap<String, Value>>,
    }

    let frozen: Frozen = from_str("{}", &Settings::new()).unwrap();
    assert!(frozen.extra.is_none());

    let error = from_str::<Frozen>(r#"{"x":1}"#, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::MemberAccess { member, .. } if member == "extra"));
}

#[test]
fn read_only_extension_data_is_not_written() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Inbox {
        id: i32,
        #[knot(extension_data = "read")]
        unknown: BTreeMap<String, Value>,
    }

    let inbox: Inbox = from_str(r#"{"id":1,"spam":[1,2]}"#, &Settings::new()).unwrap();
    assert_eq!(inbox.unknown.get("spam"), Some(&json!([1, 2])));
    assert_eq!(to_value(&inbox, &Settings::new()).unwrap(), json!({"id": 1}));
}

#[test]
fn extension_names_follow_the_strategy_on_request() {
    #[derive(Reflect, Default)]
    #[knot(default, naming(case = "camelCase", process_extension_data_names))]
    struct Tagged {
        #[knot(extension_data)]
        tags: BTreeMap<String, Value>,
    }

    let mut tagged = Tagged::default();
    tagged.tags.insert(String::from("ReleaseDate"), json!("today"));
    assert_eq!(
        to_value(&tagged, &Settings::new()).unwrap(),
        json!({"releaseDate": "today"})
    );
}
