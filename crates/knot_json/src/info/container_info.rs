use alloc::boxed::Box;
use alloc::vec::Vec;

use serde_json::Value;

use crate::Reflect;
use crate::info::{ArgumentError, CreateFn, MemberInfo, ObjectAttributes};
use crate::info::{Type, TypeInfo, TypePath, Typed};
use crate::ops::ConvertError;

/// Collects elements into a read-only array.
pub type FromItemsFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, ArgumentError>;

/// Parses a node into a new primitive.
pub type FromNodeFn = fn(&Value) -> Result<Box<dyn Reflect>, ConvertError>;

/// Wraps a value into `Option` or `Shared`, handing it back on type mismatch.
pub type WrapFn = fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// Array

/// Sequences and sets.
#[derive(Debug)]
pub struct ArrayInfo {
    ty: Type,
    item_ty: Type,
    item: fn() -> &'static TypeInfo,
    create: Option<CreateFn>,
    from_items: Option<FromItemsFn>,
    is_set: bool,
}

impl ArrayInfo {
    #[inline]
    pub fn new<TArray: TypePath, TItem: Typed>() -> Self {
        Self {
            ty: Type::of::<TArray>(),
            item_ty: Type::of::<TItem>(),
            item: TItem::type_info,
            create: None,
            from_items: None,
            is_set: false,
        }
    }

    /// Arrays with an empty constructor are filled element by element.
    #[inline]
    pub fn with_create(mut self, create: CreateFn) -> Self {
        self.create = Some(create);
        self
    }

    /// Arrays without one are built from the complete element list.
    #[inline]
    pub fn with_from_items(mut self, from_items: FromItemsFn) -> Self {
        self.from_items = Some(from_items);
        self
    }

    /// Elements are unordered and cannot be addressed by index.
    #[inline]
    pub fn with_set(mut self, is_set: bool) -> Self {
        self.is_set = is_set;
        self
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline]
    pub fn create_fn(&self) -> Option<CreateFn> {
        self.create
    }

    #[inline]
    pub fn from_items_fn(&self) -> Option<FromItemsFn> {
        self.from_items
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.is_set
    }
}

// -----------------------------------------------------------------------------
// Dictionary

/// String keyed maps.
#[derive(Debug)]
pub struct DictionaryInfo {
    ty: Type,
    key_ty: Type,
    value_ty: Type,
    value: fn() -> &'static TypeInfo,
    create: CreateFn,
}

impl DictionaryInfo {
    #[inline]
    pub fn new<TMap: TypePath, K: TypePath, V: Typed>(create: CreateFn) -> Self {
        Self {
            ty: Type::of::<TMap>(),
            key_ty: Type::of::<K>(),
            value_ty: Type::of::<V>(),
            value: V::type_info,
            create,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn key_ty(&self) -> &Type {
        &self.key_ty
    }

    #[inline]
    pub fn value_ty(&self) -> &Type {
        &self.value_ty
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }

    #[inline]
    pub fn create_fn(&self) -> CreateFn {
        self.create
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// Scalars and raw JSON subtrees.
#[derive(Debug)]
pub struct PrimitiveInfo {
    ty: Type,
    from_node: FromNodeFn,
    default_node: fn() -> Value,
    is_node: bool,
}

impl PrimitiveInfo {
    #[inline]
    pub fn new<T: TypePath>(from_node: FromNodeFn, default_node: fn() -> Value) -> Self {
        Self {
            ty: Type::of::<T>(),
            from_node,
            default_node,
            is_node: false,
        }
    }

    /// Marks a type that holds JSON subtrees verbatim.
    #[inline]
    pub fn with_node(mut self) -> Self {
        self.is_node = true;
        self
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn from_node(&self, node: &Value) -> Result<Box<dyn Reflect>, ConvertError> {
        (self.from_node)(node)
    }

    /// The node of the type's default value.
    #[inline]
    pub fn default_node(&self) -> Value {
        (self.default_node)()
    }

    #[inline]
    pub fn is_node(&self) -> bool {
        self.is_node
    }
}

// -----------------------------------------------------------------------------
// Dynamic

/// Objects whose members are discovered at runtime.
///
/// `members` lists the statically declared part, addressed through
/// [`Dynamic::declared`](crate::ops::Dynamic::declared).
#[derive(Debug)]
pub struct DynamicInfo {
    ty: Type,
    create: Option<CreateFn>,
    members: Box<[MemberInfo]>,
    attributes: ObjectAttributes,
}

impl DynamicInfo {
    #[inline]
    pub fn new<T: TypePath>(members: &[MemberInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            create: None,
            members: members.to_vec().into_boxed_slice(),
            attributes: ObjectAttributes::new(),
        }
    }

    #[inline]
    pub fn with_create(mut self, create: CreateFn) -> Self {
        self.create = Some(create);
        self
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: ObjectAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn create_fn(&self) -> Option<CreateFn> {
        self.create
    }

    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    #[inline]
    pub fn attributes(&self) -> &ObjectAttributes {
        &self.attributes
    }
}

// -----------------------------------------------------------------------------
// Wrappers

/// `Option<T>`.
#[derive(Debug)]
pub struct OptionalInfo {
    ty: Type,
    inner: fn() -> &'static TypeInfo,
    none: CreateFn,
    some: WrapFn,
}

impl OptionalInfo {
    #[inline]
    pub fn new<T: TypePath, TInner: Typed>(none: CreateFn, some: WrapFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner: TInner::type_info,
            none,
            some,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }

    #[inline]
    pub fn some(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.some)(value)
    }
}

/// `Shared<T>`.
#[derive(Debug)]
pub struct SharedInfo {
    ty: Type,
    inner: fn() -> &'static TypeInfo,
    wrap: WrapFn,
}

impl SharedInfo {
    #[inline]
    pub fn new<T: TypePath, TInner: Typed>(wrap: WrapFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner: TInner::type_info,
            wrap,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Moves `value` into a new shared allocation.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}

/// `Box<dyn Reflect>`.
#[derive(Debug)]
pub struct AnyInfo {
    ty: Type,
}

impl AnyInfo {
    #[inline]
    pub fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }
}
