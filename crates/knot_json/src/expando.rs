use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::info::{DynamicInfo, NonGenericTypeInfoCell, TypeInfo, Typed};
use crate::ops::Dynamic;

/// An object whose members are whatever the input contains.
///
/// Members keep their insertion order. Values read from JSON are stored as
/// [`serde_json::Value`] nodes; any reflected value can be stored by hand.
///
/// ```
/// use knot_json::{Expando, Settings};
/// use serde_json::json;
///
/// let settings = Settings::default();
/// let value: Expando = knot_json::from_str(r#"{"a": 1, "b": [true]}"#, &settings).unwrap();
/// assert_eq!(value.get::<serde_json::Value>("b"), Some(&json!([true])));
/// assert_eq!(knot_json::to_value(&value, &settings).unwrap(), json!({"a": 1, "b": [true]}));
/// ```
#[derive(Default)]
pub struct Expando {
    members: Vec<(String, Box<dyn Reflect>)>,
}

impl Expando {
    #[inline]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get<T: Reflect>(&self, name: &str) -> Option<&T> {
        (*self.entry(name)?.1).downcast_ref()
    }

    pub fn get_reflect(&self, name: &str) -> Option<&dyn Reflect> {
        self.entry(name).map(|(_, value)| &**value)
    }

    /// Stores `value`, replacing a member of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Reflect) {
        self.insert_boxed(name.into(), Box::new(value));
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Reflect>> {
        let index = self.members.iter().position(|(key, _)| key == name)?;
        Some(self.members.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    fn entry(&self, name: &str) -> Option<&(String, Box<dyn Reflect>)> {
        self.members.iter().find(|(key, _)| key == name)
    }

    fn insert_boxed(&mut self, name: String, value: Box<dyn Reflect>) {
        match self.members.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.members.push((name, value)),
        }
    }
}

impl fmt::Debug for Expando {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.members.iter().map(|(name, value)| (name, &**value)))
            .finish()
    }
}

crate::impls::impl_type_path!(Expando, "knot_json::Expando", "Expando");

impl Typed for Expando {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Dynamic(DynamicInfo::new::<Self>(&[]).with_create(|| Box::new(Expando::new())))
        })
    }
}

impl Reflect for Expando {
    crate::reflection::impl_reflect_cast_fn!(Dynamic);
}

impl Dynamic for Expando {
    fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|(name, _)| name.clone()).collect()
    }

    fn try_get(&self, name: &str) -> Option<&dyn Reflect> {
        self.get_reflect(name)
    }

    fn try_set(&mut self, name: &str, value: Box<dyn Reflect>) -> bool {
        self.insert_boxed(name.into(), value);
        true
    }

    fn try_get_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        self.members
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, value)| &mut **value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Expando;
    use crate::ops::Dynamic;

    #[test]
    fn members_keep_insertion_order() {
        let mut value = Expando::new();
        value.insert("b", 1_i32);
        value.insert("a", String::from("x"));
        value.insert("b", 2_i32);
        assert_eq!(value.member_names(), ["b", "a"]);
        assert_eq!(value.get::<i32>("b"), Some(&2));
        assert!(value.try_set("c", Box::new(true)));
        assert!(value.remove("a").is_some());
        assert_eq!(value.names().collect::<Vec<_>>(), ["b", "c"]);
    }
}
