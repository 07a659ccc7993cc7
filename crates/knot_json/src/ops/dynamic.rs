use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::TypeInfo;
use crate::ops::Object;

/// Capability interface of objects whose members are discovered at runtime.
///
/// An adapter implements this for each dynamic object kind. Types may also
/// declare static members, exposed through [`declared`](Dynamic::declared)
/// and described by [`DynamicInfo::members`](crate::info::DynamicInfo::members).
///
/// The walkers write [`member_names`](Dynamic::member_names) in the order
/// given and hand every input key no declared member takes to
/// [`try_set`](Dynamic::try_set).
///
/// # Examples
///
/// [`Expando`](crate::Expando) accepts any member:
///
/// ```
/// use knot_json::Expando;
/// use knot_json::ops::Dynamic;
///
/// let mut expando = Expando::new();
/// assert!(expando.try_set("b", Box::new(2_i32)));
/// assert!(expando.try_set("a", Box::new(true)));
///
/// assert_eq!(expando.member_names(), ["b", "a"]);
/// assert_eq!(expando.try_get("a").and_then(|a| a.downcast_ref::<bool>()), Some(&true));
/// assert!(expando.declared().is_none());
/// ```
pub trait Dynamic: Reflect {
    fn member_names(&self) -> Vec<String>;

    fn try_get(&self, name: &str) -> Option<&dyn Reflect>;

    /// Stores `value` under `name`. Returns `false` if the member is refused.
    fn try_set(&mut self, name: &str, value: Box<dyn Reflect>) -> bool;

    /// In-place access, for adapters that can offer it.
    fn try_get_mut(&mut self, _name: &str) -> Option<&mut dyn Reflect> {
        None
    }

    /// Type to read the input of member `name` as; raw nodes when `None`.
    fn member_type(&self, _name: &str) -> Option<&'static TypeInfo> {
        None
    }

    fn declared(&self) -> Option<&dyn Object> {
        None
    }

    fn declared_mut(&mut self) -> Option<&mut dyn Object> {
        None
    }
}
