use alloc::boxed::Box;
use alloc::string::String;

use serde_json::{Map, Value};

use crate::Reflect;
use crate::info::{DictionaryInfo, NonGenericTypeInfoCell, PrimitiveInfo, TypeInfo, Typed};
use crate::ops::{ConvertError, Dictionary, DictionaryIter, InsertError, Primitive};

// -----------------------------------------------------------------------------
// Value

crate::impls::impl_type_path!(Value, "serde_json::Value", "Value");

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Primitive(
                PrimitiveInfo::new::<Self>(
                    |node| Ok(Box::new(node.clone()) as Box<dyn Reflect>),
                    || Value::Null,
                )
                .with_node(),
            )
        })
    }
}

impl Reflect for Value {
    crate::reflection::impl_reflect_cast_fn!(Primitive);
}

impl Primitive for Value {
    #[inline]
    fn to_node(&self) -> Result<Value, ConvertError> {
        Ok(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Map

crate::impls::impl_type_path!(
    Map<String, Value>,
    "serde_json::Map<alloc::string::String, serde_json::Value>",
    "Map<String, Value>"
);

impl Typed for Map<String, Value> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Dictionary(DictionaryInfo::new::<Self, String, Value>(|| {
                Box::new(Map::new())
            }))
        })
    }
}

impl Reflect for Map<String, Value> {
    crate::reflection::impl_reflect_cast_fn!(Dictionary);
}

impl Dictionary for Map<String, Value> {
    #[inline]
    fn len(&self) -> usize {
        Map::len(self)
    }

    fn iter(&self) -> DictionaryIter<'_> {
        Box::new(Map::iter(self).map(|(key, value)| (key.clone(), value.as_reflect())))
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut dyn Reflect> {
        Map::get_mut(self, key).map(Reflect::as_reflect_mut)
    }

    fn insert(&mut self, key: &str, value: Box<dyn Reflect>) -> Result<(), InsertError> {
        let value = value.take::<Value>().map_err(InsertError::Value)?;
        Map::insert(self, key.into(), value);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        Map::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use serde_json::{Map, Value, json};

    use crate::Reflect;
    use crate::ops::{Dictionary, InsertError, ReflectRef};

    #[test]
    fn value_is_a_node_primitive() {
        let value = json!({"a": [1, 2]});
        let ReflectRef::Primitive(primitive) = value.reflect_ref() else {
            panic!("expected a primitive");
        };
        assert_eq!(primitive.to_node().unwrap(), value);
        assert!(primitive.reflect_type_info().as_primitive().unwrap().is_node());
    }

    #[test]
    fn map_takes_values_only() {
        let mut map = Map::new();
        Dictionary::insert(&mut map, "a", Box::new(json!(1))).unwrap();
        let rejected = Dictionary::insert(&mut map, "b", Box::new(1_i32));
        assert!(matches!(rejected, Err(InsertError::Value(_))));
        assert_eq!(Value::Object(map), json!({"a": 1}));
    }
}
