use alloc::boxed::Box;
use alloc::string::String;

use crate::Reflect;

pub type DictionaryIter<'a> = Box<dyn Iterator<Item = (String, &'a dyn Reflect)> + 'a>;

/// Why [`Dictionary::insert`] refused an entry.
#[derive(Debug)]
pub enum InsertError {
    /// The key does not parse as the key type.
    Key,
    /// The value is not of the value type.
    Value(Box<dyn Reflect>),
}

/// Entries keyed by their string form.
///
/// Keys travel as strings because they become JSON property names; the
/// implementation parses them into its key type through
/// [`MapKey`](crate::impls::MapKey). Iteration yields keys in the order of
/// the underlying map.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use knot_json::ops::{Dictionary, InsertError};
///
/// let mut scores: BTreeMap<u8, bool> = BTreeMap::new();
/// let dictionary: &mut dyn Dictionary = &mut scores;
///
/// assert!(dictionary.insert("7", Box::new(true)).is_ok());
/// assert!(matches!(dictionary.insert("seven", Box::new(true)), Err(InsertError::Key)));
/// assert!(matches!(dictionary.insert("8", Box::new(1_i32)), Err(InsertError::Value(_))));
///
/// let keys: Vec<String> = dictionary.iter().map(|(key, _)| key).collect();
/// assert_eq!(keys, ["7"]);
/// assert_eq!(scores.get(&7), Some(&true));
/// ```
pub trait Dictionary: Reflect {
    fn len(&self) -> usize;

    fn iter(&self) -> DictionaryIter<'_>;

    fn get_mut(&mut self, key: &str) -> Option<&mut dyn Reflect>;

    fn insert(&mut self, key: &str, value: Box<dyn Reflect>) -> Result<(), InsertError>;

    fn clear(&mut self);

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
