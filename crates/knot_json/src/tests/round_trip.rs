use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::derive::Reflect;
use crate::naming::NamingStrategy;
use crate::settings::NullValueHandling;
use crate::{Settings, from_str, from_value, to_string, to_value};

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Sample {
    count: i32,
    label: String,
    ratio: f64,
    enabled: bool,
    values: Vec<u8>,
    note: Option<String>,
    scores: BTreeMap<String, i64>,
}

fn sample() -> Sample {
    Sample {
        count: -3,
        label: String::from("knot"),
        ratio: 0.25,
        enabled: true,
        values: vec![1, 2, 3],
        note: None,
        scores: BTreeMap::from([(String::from("a"), 1), (String::from("b"), 2)]),
    }
}

#[test]
fn struct_round_trip() {
    let settings = Settings::new();
    let node = to_value(&sample(), &settings).unwrap();
    assert_eq!(
        node,
        json!({
            "count": -3,
            "label": "knot",
            "ratio": 0.25,
            "enabled": true,
            "values": [1, 2, 3],
            "note": null,
            "scores": {"a": 1, "b": 2},
        })
    );
    assert_eq!(from_value::<Sample>(&node, &settings).unwrap(), sample());
}

#[test]
fn members_are_written_in_declaration_order() {
    let text = to_string(&sample(), &Settings::new()).unwrap();
    assert_eq!(
        text,
        r#"{"count":-3,"label":"knot","ratio":0.25,"enabled":true,"values":[1,2,3],"note":null,"scores":{"a":1,"b":2}}"#
    );
}

#[test]
fn null_members_can_be_ignored() {
    let settings = Settings::new().with_null_value_handling(NullValueHandling::Ignore);
    let node = to_value(&sample(), &settings).unwrap();
    assert!(node.get("note").is_none());
    assert_eq!(from_value::<Sample>(&node, &settings).unwrap(), sample());
}

// -----------------------------------------------------------------------------
// Naming

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Account {
    user_name: String,
    #[knot(rename = "ID")]
    id: u32,
}

#[derive(Reflect, Default)]
#[knot(default, rename_all = "kebab-case")]
struct Limits {
    max_depth: u32,
}

#[test]
fn naming_strategies() {
    let account = Account {
        user_name: String::from("ann"),
        id: 7,
    };

    let pascal = Settings::new().with_naming(NamingStrategy::pascal_case());
    let node = to_value(&account, &pascal).unwrap();
    assert_eq!(node, json!({"UserName": "ann", "ID": 7}));
    assert_eq!(from_value::<Account>(&node, &pascal).unwrap(), account);

    // Camel case only lowers the leading upper-case run.
    let overriding =
        Settings::new().with_naming(NamingStrategy::camel_case().with_override_specified_names(true));
    assert_eq!(
        to_value(&account, &overriding).unwrap(),
        json!({"user_name": "ann", "id": 7})
    );

    let limits = Limits { max_depth: 3 };
    assert_eq!(to_value(&limits, &pascal).unwrap(), json!({"max-depth": 3}));
}

#[test]
fn members_match_case_insensitively() {
    let account: Account = from_str(r#"{"USER_NAME": "bo", "id": 2}"#, &Settings::new()).unwrap();
    assert_eq!(account.user_name, "bo");
    assert_eq!(account.id, 2);
}

#[test]
fn dictionary_keys_follow_the_strategy_on_request() {
    let mut sample = sample();
    sample.scores = BTreeMap::from([(String::from("FirstKey"), 1)]);

    let plain = Settings::new().with_naming(NamingStrategy::camel_case());
    assert_eq!(to_value(&sample, &plain).unwrap()["scores"], json!({"FirstKey": 1}));

    let keys = Settings::new().with_naming(NamingStrategy::camel_case().with_process_dictionary_keys(true));
    assert_eq!(to_value(&sample, &keys).unwrap()["scores"], json!({"firstKey": 1}));
}

// -----------------------------------------------------------------------------
// Shapes

#[derive(Reflect, Serialize, Deserialize, Default, Debug, PartialEq)]
#[knot(opaque, default)]
enum Color {
    #[default]
    Red,
    Blue,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Palette {
    primary: Color,
    accents: Vec<Color>,
}

#[test]
fn opaque_types_use_their_serde_impls() {
    let palette = Palette {
        primary: Color::Blue,
        accents: vec![Color::Red],
    };
    let settings = Settings::new();
    let node = to_value(&palette, &settings).unwrap();
    assert_eq!(node, json!({"primary": "Blue", "accents": ["Red"]}));
    assert_eq!(from_value::<Palette>(&node, &settings).unwrap(), palette);

    let error = from_str::<Palette>(r#"{"primary": "Green"}"#, &settings).unwrap_err();
    assert_eq!(error.path().to_string(), "primary");
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Entity {
    id: u64,
    #[knot(rename = "kind")]
    tag: String,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct User {
    #[knot(base)]
    entity: Entity,
    name: String,
    #[knot(rename = "kind")]
    role: String,
}

#[test]
fn base_members_are_flattened() {
    let user = User {
        entity: Entity {
            id: 9,
            tag: String::from("hidden"),
        },
        name: String::from("cy"),
        role: String::from("admin"),
    };
    let settings = Settings::new();
    let node = to_value(&user, &settings).unwrap();
    // The derived `kind` shadows the embedded one.
    assert_eq!(node, json!({"name": "cy", "kind": "admin", "id": 9}));

    let back: User = from_value(&node, &settings).unwrap();
    assert_eq!(back.entity.id, 9);
    assert_eq!(back.entity.tag, "");
    assert_eq!(back.role, "admin");
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Credentials {
    login: String,
    #[knot(write_only)]
    password: String,
    #[knot(read_only)]
    attempts: u32,
    #[knot(skip)]
    cache: Vec<u8>,
    #[knot(order = -5)]
    version: u8,
}

#[test]
fn access_order_and_skip() {
    let credentials = Credentials {
        login: String::from("dee"),
        password: String::from("secret"),
        attempts: 2,
        cache: vec![1],
        version: 1,
    };
    let settings = Settings::new();
    assert_eq!(
        to_string(&credentials, &settings).unwrap(),
        r#"{"version":1,"login":"dee","attempts":2}"#
    );

    let back: Credentials = from_str(
        r#"{"login":"eve","password":"pw","attempts":5,"cache":[7]}"#,
        &settings,
    )
    .unwrap();
    assert_eq!(back.password, "pw");
    assert_eq!(back.attempts, 0);
    assert!(back.cache.is_empty());
}

#[test]
fn float_specials_round_trip() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Reading {
        value: f64,
    }

    let settings = Settings::new();
    let node = to_value(&Reading { value: f64::NAN }, &settings).unwrap();
    assert_eq!(node, json!({"value": "NaN"}));
    assert!(from_value::<Reading>(&node, &settings).unwrap().value.is_nan());

    let node = to_value(&Reading { value: f64::NEG_INFINITY }, &settings).unwrap();
    assert_eq!(node, json!({"value": "-Infinity"}));
    assert_eq!(
        from_value::<Reading>(&node, &settings).unwrap().value,
        f64::NEG_INFINITY
    );
}
