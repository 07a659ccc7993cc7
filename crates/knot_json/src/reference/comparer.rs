use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::Reflect;
use crate::ops::{ReflectRef, SharedRef};

/// What two shared values must have in common to count as the same reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    Address(usize),
    Structural(String),
}

/// Decides reference identity while serializing.
///
/// The key is used both for `$id`/`$ref` assignment and for loop detection.
pub trait EqualityComparer: Send + Sync {
    fn reference_key(&self, value: &dyn SharedRef) -> ReferenceKey;
}

/// Identity is the shared allocation. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEqualityComparer;

impl EqualityComparer for ReferenceEqualityComparer {
    #[inline]
    fn reference_key(&self, value: &dyn SharedRef) -> ReferenceKey {
        ReferenceKey::Address(value.address())
    }
}

/// Identity is the type and content of the shared value.
///
/// Shared values nested inside are compared by address, so the comparison
/// never recurses through a loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueEqualityComparer;

impl EqualityComparer for ValueEqualityComparer {
    fn reference_key(&self, value: &dyn SharedRef) -> ReferenceKey {
        match value.try_borrow_inner() {
            Ok(inner) => ReferenceKey::Structural(format!(
                "{}:{}",
                inner.type_path(),
                snapshot(&*inner)
            )),
            Err(_) => ReferenceKey::Address(value.address()),
        }
    }
}

fn snapshot(value: &dyn Reflect) -> Value {
    match value.reflect_ref() {
        ReflectRef::Object(object) => (0..object.member_len())
            .map(|index| object.member(index).map_or(Value::Null, snapshot))
            .collect(),
        ReflectRef::Array(array) => array.iter().map(snapshot).collect(),
        ReflectRef::Dictionary(dictionary) => {
            let sorted: BTreeMap<String, Value> = dictionary
                .iter()
                .map(|(key, value)| (key, snapshot(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<_, _>>())
        }
        ReflectRef::Primitive(primitive) => primitive.to_node().unwrap_or(Value::Null),
        ReflectRef::Dynamic(dynamic) => {
            let mut names = dynamic.member_names();
            names.sort();
            let members: Map<String, Value> = names
                .into_iter()
                .filter_map(|name| {
                    let member = snapshot(dynamic.try_get(&name)?);
                    Some((name, member))
                })
                .collect();
            let declared: Vec<Value> = dynamic
                .declared()
                .map(|object| {
                    (0..object.member_len())
                        .map(|index| object.member(index).map_or(Value::Null, snapshot))
                        .collect()
                })
                .unwrap_or_default();
            Value::Array(alloc::vec![Value::Array(declared), Value::Object(members)])
        }
        ReflectRef::Optional(optional) => optional.value().map_or(Value::Null, snapshot),
        ReflectRef::Shared(shared) => Value::String(format!("@{:#x}", shared.address())),
        ReflectRef::Boxed(inner) => {
            let mut wrapped = Map::new();
            wrapped.insert(String::from("type"), Value::String(inner.type_path().to_string()));
            wrapped.insert(String::from("value"), snapshot(inner));
            Value::Object(wrapped)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{EqualityComparer, ReferenceEqualityComparer, ReferenceKey, ValueEqualityComparer};
    use crate::Shared;

    #[test]
    fn reference_identity() {
        let a = Shared::new(vec![1, 2]);
        let b = Shared::new(vec![1, 2]);
        let comparer = ReferenceEqualityComparer;
        assert_eq!(comparer.reference_key(&a), comparer.reference_key(&a.clone()));
        assert_ne!(comparer.reference_key(&a), comparer.reference_key(&b));
    }

    #[test]
    fn value_identity() {
        let a = Shared::new(vec![1, 2]);
        let b = Shared::new(vec![1, 2]);
        let c = Shared::new(vec![2, 1]);
        let comparer = ValueEqualityComparer;
        assert_eq!(comparer.reference_key(&a), comparer.reference_key(&b));
        assert_ne!(comparer.reference_key(&a), comparer.reference_key(&c));

        let _guard = a.borrow_mut();
        assert!(matches!(comparer.reference_key(&a), ReferenceKey::Address(_)));
    }
}
