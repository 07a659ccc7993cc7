//! Static type information.
//!
//! Every reflected type exposes one [`TypeInfo`] through [`Typed`]. Child
//! types are referenced through `fn() -> &'static TypeInfo` so recursive
//! types can describe themselves.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod container_info;
mod member_info;
mod object_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell};
pub use cell::{NonGenericTypeCell, NonGenericTypeInfoCell};
pub use container_info::{AnyInfo, ArrayInfo, DictionaryInfo, DynamicInfo};
pub use container_info::{FromItemsFn, FromNodeFn, OptionalInfo, PrimitiveInfo};
pub use container_info::{SharedInfo, WrapFn};
pub use member_info::{ExtensionDataAccess, MemberAccess, MemberAttributes, MemberInfo};
pub use object_info::{ArgumentError, ConstructFn, ConstructorInfo, CreateFn};
pub use object_info::{DefaultConstructor, ObjectAttributes, ObjectInfo, ParamInfo};
pub use object_info::{Visibility, take_argument};
pub use type_info::{ReflectKind, TypeInfo};
pub use type_path::{Type, TypePath};
pub use typed::{DynamicTyped, Typed};

pub(crate) use member_info::{collect_types, member_index};
