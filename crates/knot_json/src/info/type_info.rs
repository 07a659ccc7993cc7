use core::any::TypeId;

use crate::info::{AnyInfo, ArrayInfo, DictionaryInfo, DynamicInfo, ObjectInfo};
use crate::info::{OptionalInfo, PrimitiveInfo, SharedInfo, Type};

/// The shape of a type as the walkers see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// Named members, written as a JSON object.
    Object,
    /// Ordered elements, written as a JSON array.
    Array,
    /// String-keyed entries, written as a JSON object.
    Dictionary,
    /// A scalar, or a raw JSON subtree.
    Primitive,
    /// Members discovered at runtime.
    Dynamic,
    /// `Option<T>`: the null carrier.
    Optional,
    /// `Shared<T>`: the identity-bearing reference.
    Shared,
    /// `Box<dyn Reflect>`: a slot of any type.
    Any,
}

/// Static description of a reflected type.
///
/// Obtained from [`Typed::type_info`](crate::info::Typed::type_info) for a
/// static type, or from a value through `reflect_type_info`. Contracts are
/// derived from it; the walkers only use the contract and the kind.
///
/// # Examples
///
/// ```
/// use knot_json::derive::Reflect;
/// use knot_json::info::{ReflectKind, Typed};
///
/// #[derive(Reflect, Default)]
/// #[knot(default)]
/// struct Point {
///     x: i32,
///     #[knot(rename = "Y")]
///     y: Option<i32>,
/// }
///
/// let info = Point::type_info();
/// assert_eq!(info.kind(), ReflectKind::Object);
/// assert_eq!(info.type_name(), "Point");
///
/// let object = info.as_object().unwrap();
/// let names: Vec<&str> = object.members().iter().map(|member| member.name()).collect();
/// assert_eq!(names, ["x", "y"]);
/// assert_eq!(object.members()[1].type_info().kind(), ReflectKind::Optional);
/// assert_eq!(object.members()[1].type_info().unwrapped().type_path(), "i32");
/// ```
#[derive(Debug)]
pub enum TypeInfo {
    Object(ObjectInfo),
    Array(ArrayInfo),
    Dictionary(DictionaryInfo),
    Primitive(PrimitiveInfo),
    Dynamic(DynamicInfo),
    Optional(OptionalInfo),
    Shared(SharedInfo),
    Any(AnyInfo),
}

macro_rules! as_info {
    ($($fn_name:ident => $variant:ident($info:ty);)*) => {
        $(
            #[inline]
            pub fn $fn_name(&self) -> Option<&$info> {
                match self {
                    Self::$variant(info) => Some(info),
                    _ => None,
                }
            }
        )*
    };
}

impl TypeInfo {
    pub fn ty(&self) -> &Type {
        match self {
            Self::Object(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Dictionary(info) => info.ty(),
            Self::Primitive(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Shared(info) => info.ty(),
            Self::Any(info) => info.ty(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Object(_) => ReflectKind::Object,
            Self::Array(_) => ReflectKind::Array,
            Self::Dictionary(_) => ReflectKind::Dictionary,
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Any(_) => ReflectKind::Any,
        }
    }

    /// Strips `Option` and `Shared` wrappers.
    pub fn unwrapped(&'static self) -> &'static TypeInfo {
        match self {
            Self::Optional(info) => info.inner().unwrapped(),
            Self::Shared(info) => info.inner().unwrapped(),
            _ => self,
        }
    }

    as_info! {
        as_object => Object(ObjectInfo);
        as_array => Array(ArrayInfo);
        as_dictionary => Dictionary(DictionaryInfo);
        as_primitive => Primitive(PrimitiveInfo);
        as_dynamic => Dynamic(DynamicInfo);
        as_optional => Optional(OptionalInfo);
        as_shared => Shared(SharedInfo);
    }
}
