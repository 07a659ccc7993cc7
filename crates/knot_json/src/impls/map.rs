use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::hash::Hash;
use std::collections::HashMap;

use crate::Reflect;
use crate::info::{DictionaryInfo, GenericTypeInfoCell, TypeInfo, TypePath, Typed};
use crate::ops::{Dictionary, DictionaryIter, InsertError};

/// A dictionary key with a string form.
///
/// Keys are written as JSON property names, so every key type needs a
/// lossless conversion to and from a string.
pub trait MapKey: TypePath + Sized {
    fn to_key(&self) -> String;

    fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
    #[inline]
    fn to_key(&self) -> String {
        self.clone()
    }

    #[inline]
    fn from_key(key: &str) -> Option<Self> {
        Some(key.into())
    }
}

macro_rules! impl_parsed_key {
    ($($ty:ty),*) => {$(
        impl MapKey for $ty {
            #[inline]
            fn to_key(&self) -> String {
                self.to_string()
            }

            #[inline]
            fn from_key(key: &str) -> Option<Self> {
                key.parse().ok()
            }
        }
    )*};
}

impl_parsed_key!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_map {
    ($ty:ident, $path:literal, $($bound:tt)+) => {
        crate::impls::impl_generic_type_path!(impl<K, V> $ty<K, V> => $path, stringify!($ty));

        impl<K: MapKey + $($bound)+, V: Reflect + Typed> Typed for $ty<K, V> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Dictionary(DictionaryInfo::new::<Self, K, V>(|| {
                        Box::new($ty::<K, V>::new())
                    }))
                })
            }
        }

        impl<K: MapKey + $($bound)+, V: Reflect + Typed> Reflect for $ty<K, V> {
            crate::reflection::impl_reflect_cast_fn!(Dictionary);
        }

        impl<K: MapKey + $($bound)+, V: Reflect + Typed> Dictionary for $ty<K, V> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn iter(&self) -> DictionaryIter<'_> {
                Box::new($ty::iter(self).map(|(key, value)| (key.to_key(), value.as_reflect())))
            }

            fn get_mut(&mut self, key: &str) -> Option<&mut dyn Reflect> {
                let key = K::from_key(key)?;
                $ty::get_mut(self, &key).map(Reflect::as_reflect_mut)
            }

            fn insert(&mut self, key: &str, value: Box<dyn Reflect>) -> Result<(), InsertError> {
                let key = K::from_key(key).ok_or(InsertError::Key)?;
                let value = value.take::<V>().map_err(InsertError::Value)?;
                $ty::insert(self, key, value);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                $ty::clear(self);
            }
        }
    };
}

impl_map!(HashMap, "std::collections::HashMap", Eq + Hash + 'static);
impl_map!(BTreeMap, "alloc::collections::BTreeMap", Ord + 'static);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::MapKey;
    use crate::ops::{Dictionary, InsertError};

    #[test]
    fn keys_parse_from_strings() {
        assert_eq!(i32::from_key("-4"), Some(-4));
        assert_eq!(bool::from_key("yes"), None);
        assert_eq!('x'.to_key(), "x");
    }

    #[test]
    fn insert_checks_key_and_value() {
        let mut map = BTreeMap::<u8, String>::new();
        Dictionary::insert(&mut map, "1", Box::new(String::from("one"))).unwrap();
        assert!(matches!(
            Dictionary::insert(&mut map, "x", Box::new(String::new())),
            Err(InsertError::Key)
        ));
        assert!(matches!(
            Dictionary::insert(&mut map, "2", Box::new(2_u8)),
            Err(InsertError::Value(_))
        ));

        let keys: Vec<String> = Dictionary::iter(&map).map(|(key, _)| key).collect();
        assert_eq!(keys, ["1"]);
    }
}
