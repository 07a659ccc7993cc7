use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::TypeId;

use serde_json::json;

use crate::contract::{Contract, ContractResolver, DefaultContractResolver};
use crate::derive::Reflect;
use crate::error::ErrorKind;
use crate::info::TypeInfo;
use crate::settings::{ConstructorHandling, ObjectCreationHandling};
use crate::{Result, Settings, from_str, from_value, populate, populate_str};

#[derive(Reflect, Debug, PartialEq)]
#[knot(constructor(new(name, level)))]
struct Hero {
    name: String,
    #[knot(default_value = 5, default_value_handling = "populate")]
    level: i32,
}

impl Hero {
    fn new(name: String, level: i32) -> Self {
        Self { name, level }
    }
}

#[test]
fn constructor_arguments_bind_to_members() {
    let settings = Settings::new();
    let hero: Hero = from_value(&json!({"NAME": "ann", "level": 2}), &settings).unwrap();
    assert_eq!(hero, Hero::new(String::from("ann"), 2));

    let hero: Hero = from_str("{}", &settings).unwrap();
    assert_eq!(hero, Hero::new(String::new(), 5));
}

#[test]
fn parameter_defaults_fill_absent_arguments() {
    #[derive(Reflect, Debug, PartialEq)]
    #[knot(constructor(new(level)))]
    struct Rank {
        #[knot(param_default = 3)]
        level: i32,
    }

    impl Rank {
        fn new(level: i32) -> Self {
            Self { level }
        }
    }

    let rank: Rank = from_str("{}", &Settings::new()).unwrap();
    assert_eq!(rank, Rank { level: 3 });
}

#[derive(Reflect, Debug)]
#[knot(constructor(from_a(a)), constructor(from_b(b)))]
struct Either {
    a: i32,
    b: i32,
}

impl Either {
    fn from_a(a: i32) -> Self {
        Self { a, b: 0 }
    }

    fn from_b(b: i32) -> Self {
        Self { a: 0, b }
    }
}

#[derive(Reflect, Debug)]
#[knot(constructor(from_a(a)), constructor(from_b(b), designated))]
struct Preferred {
    a: i32,
    b: i32,
}

impl Preferred {
    fn from_a(a: i32) -> Self {
        Self { a, b: 0 }
    }

    fn from_b(b: i32) -> Self {
        Self { a: -1, b }
    }
}

#[test]
fn several_public_constructors_are_ambiguous() {
    let error = from_str::<Either>(r#"{"a":1}"#, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ConstructorResolution { .. }));

    // Members the designated constructor does not take are populated afterwards.
    let preferred: Preferred = from_str(r#"{"a":1,"b":2}"#, &Settings::new()).unwrap();
    assert_eq!((preferred.a, preferred.b), (1, 2));

    let preferred: Preferred = from_str(r#"{"b":2}"#, &Settings::new()).unwrap();
    assert_eq!((preferred.a, preferred.b), (-1, 2));
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(private_default)]
struct Hidden {
    value: i32,
}

#[test]
fn private_defaults_need_permission() {
    let error = from_str::<Hidden>(r#"{"value":1}"#, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ConstructorResolution { .. }));

    let settings =
        Settings::new().with_constructor_handling(ConstructorHandling::AllowNonPublicDefaultConstructor);
    let hidden: Hidden = from_str(r#"{"value":1}"#, &settings).unwrap();
    assert_eq!(hidden, Hidden { value: 1 });
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Bag {
    items: Vec<i32>,
    inner: Inner,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[knot(default)]
struct Inner {
    a: i32,
    b: i32,
}

#[test]
fn populate_reuses_existing_values() {
    let mut bag = Bag {
        items: vec![1],
        inner: Inner { a: 1, b: 2 },
    };
    populate_str(r#"{"items":[2],"inner":{"b":5}}"#, &mut bag, &Settings::new()).unwrap();
    assert_eq!(bag.items, [1, 2]);
    assert_eq!(bag.inner, Inner { a: 1, b: 5 });
}

#[test]
fn replace_builds_fresh_values() {
    let mut bag = Bag {
        items: vec![1],
        inner: Inner { a: 1, b: 2 },
    };
    let settings = Settings::new().with_object_creation_handling(ObjectCreationHandling::Replace);
    populate(&json!({"items": [2], "inner": {"b": 5}}), &mut bag, &settings).unwrap();
    assert_eq!(bag.items, [2]);
    assert_eq!(bag.inner, Inner { a: 0, b: 5 });
}

#[test]
fn member_creation_handling_overrides_settings() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Log {
        #[knot(creation_handling = "replace")]
        lines: Vec<String>,
    }

    let mut log = Log {
        lines: vec![String::from("old")],
    };
    populate_str(r#"{"lines":["new"]}"#, &mut log, &Settings::new()).unwrap();
    assert_eq!(log.lines, [String::from("new")]);
}

#[derive(Reflect, Default, Debug)]
#[knot(default)]
struct Ticket {
    #[knot(required)]
    id: i32,
    #[knot(required = "allow_null")]
    note: Option<String>,
    #[knot(required = "disallow_null")]
    owner: Option<String>,
}

#[test]
fn required_members() {
    let settings = Settings::new();

    let ticket: Ticket = from_str(r#"{"id":1,"note":null}"#, &settings).unwrap();
    assert_eq!(ticket.id, 1);
    assert!(ticket.note.is_none() && ticket.owner.is_none());

    let error = from_str::<Ticket>(r#"{"note":null}"#, &settings).unwrap_err();
    assert!(
        matches!(error.kind(), ErrorKind::RequiredMemberMissing { member, .. } if member == "id")
    );

    let error = from_str::<Ticket>(r#"{"id":1}"#, &settings).unwrap_err();
    assert!(
        matches!(error.kind(), ErrorKind::RequiredMemberMissing { member, .. } if member == "note")
    );

    let error = from_str::<Ticket>(r#"{"id":null,"note":null}"#, &settings).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::RequiredMemberNull { member, .. } if member == "id"));
    assert_eq!(error.path().to_string(), "id");

    let error = from_str::<Ticket>(r#"{"id":1,"note":null,"owner":null}"#, &settings).unwrap_err();
    assert!(
        matches!(error.kind(), ErrorKind::RequiredMemberNull { member, .. } if member == "owner")
    );
}

#[test]
fn populated_defaults_satisfy_required_members() {
    #[derive(Reflect, Default)]
    #[knot(default)]
    struct Quota {
        #[knot(required, default_value = 10, default_value_handling = "populate")]
        limit: i32,
    }

    let quota: Quota = from_str("{}", &Settings::new()).unwrap();
    assert_eq!(quota.limit, 10);
}

#[derive(Reflect, Debug, PartialEq)]
struct Sealed {
    value: i32,
    origin: i32,
}

/// Installs a factory for [`Sealed`], which has no constructor of its own.
struct SealedFactory;

impl ContractResolver for SealedFactory {
    fn resolve(&self, info: &'static TypeInfo) -> Result<Arc<Contract>> {
        let mut contract = DefaultContractResolver::default().derive(info)?;
        if info.type_id() == TypeId::of::<Sealed>() {
            contract.set_factory(|| Box::new(Sealed { value: 0, origin: 7 }) as Box<dyn crate::Reflect>);
        }
        Ok(Arc::new(contract))
    }
}

#[test]
fn factories_replace_constructor_selection() {
    let error = from_str::<Sealed>(r#"{"value":1}"#, &Settings::new()).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ConstructorResolution { .. }));

    let settings = Settings::new().with_contract_resolver(SealedFactory);
    let sealed: Sealed = from_str(r#"{"value":1}"#, &settings).unwrap();
    assert_eq!(sealed, Sealed { value: 1, origin: 7 });
}
