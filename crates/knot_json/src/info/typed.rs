use crate::info::{TypeInfo, TypePath};

/// Static access to a type's [`TypeInfo`].
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect). Manual
/// implementations should store the info in a
/// [`NonGenericTypeInfoCell`](crate::info::NonGenericTypeInfoCell) or, for
/// generic types, a [`GenericTypeInfoCell`](crate::info::GenericTypeInfoCell).
///
/// # Examples
///
/// ```
/// use knot_json::info::{NonGenericTypeInfoCell, ObjectInfo, TypeInfo, TypePath, Typed};
///
/// struct Empty;
///
/// impl TypePath for Empty {
///     fn type_path() -> &'static str { "demo::Empty" }
///     fn type_name() -> &'static str { "Empty" }
/// }
///
/// impl Typed for Empty {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Object(ObjectInfo::new::<Self>(&[])))
///     }
/// }
///
/// assert_eq!(Empty::type_info().type_path(), "demo::Empty");
/// ```
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}

/// Dynamic dispatch for [`Typed`], implemented for every `Typed` type.
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
