use alloc::boxed::Box;
use alloc::vec::Vec;

use serde_json::Value;
use thiserror::Error;

use crate::Reflect;
use crate::info::{MemberInfo, Type, TypeInfo, TypePath, Typed};
use crate::naming::NamingStrategy;
use crate::settings::{MissingMemberHandling, ObjectCreationHandling};

/// Creates a value with no input.
pub type CreateFn = fn() -> Box<dyn Reflect>;

/// Builds a value from constructor arguments, in parameter order.
pub type ConstructFn = fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, ArgumentError>;

/// A constructor received an argument of the wrong type.
#[derive(Debug, Error)]
#[error("argument {index} is not a `{expected}`")]
pub struct ArgumentError {
    pub index: usize,
    pub expected: &'static str,
}

/// Takes the next argument as a `T`, used by generated constructors.
pub fn take_argument<T: Reflect + TypePath>(
    args: &mut impl Iterator<Item = Box<dyn Reflect>>,
    index: usize,
) -> Result<T, ArgumentError> {
    let error = || ArgumentError {
        index,
        expected: T::type_path(),
    };
    args.next().ok_or_else(error)?.take::<T>().map_err(|_| error())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A parameterless constructor.
#[derive(Debug, Clone, Copy)]
pub struct DefaultConstructor {
    create: CreateFn,
    visibility: Visibility,
}

impl DefaultConstructor {
    #[inline]
    pub const fn new(create: CreateFn, visibility: Visibility) -> Self {
        Self { create, visibility }
    }

    #[inline]
    pub const fn public(create: CreateFn) -> Self {
        Self::new(create, Visibility::Public)
    }

    #[inline]
    pub const fn private(create: CreateFn) -> Self {
        Self::new(create, Visibility::Private)
    }

    #[inline]
    pub fn create_fn(&self) -> CreateFn {
        self.create
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A constructor parameter.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    name: &'static str,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    default_value: Option<Value>,
}

impl ParamInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            default_value: None,
        }
    }

    #[inline]
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub(crate) fn type_info_fn(&self) -> fn() -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }
}

/// A parameterized constructor.
#[derive(Debug, Clone)]
pub struct ConstructorInfo {
    name: &'static str,
    params: Box<[ParamInfo]>,
    construct: ConstructFn,
    visibility: Visibility,
    designated: bool,
}

impl ConstructorInfo {
    pub fn new(name: &'static str, params: &[ParamInfo], construct: ConstructFn) -> Self {
        Self {
            name,
            params: params.to_vec().into_boxed_slice(),
            construct,
            visibility: Visibility::Public,
            designated: false,
        }
    }

    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks this constructor as the one to use, whatever its visibility.
    #[inline]
    pub fn with_designated(mut self, designated: bool) -> Self {
        self.designated = designated;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    #[inline]
    pub fn construct_fn(&self) -> ConstructFn {
        self.construct
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[inline]
    pub fn is_designated(&self) -> bool {
        self.designated
    }
}

/// Type level configuration of objects and dynamic objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectAttributes {
    pub naming: Option<NamingStrategy>,
    pub is_reference: Option<bool>,
    pub missing_member_handling: Option<MissingMemberHandling>,
    pub object_creation_handling: Option<ObjectCreationHandling>,
}

impl ObjectAttributes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = Some(naming);
        self
    }

    #[inline]
    pub fn with_is_reference(mut self, is_reference: bool) -> Self {
        self.is_reference = Some(is_reference);
        self
    }

    #[inline]
    pub fn with_missing_member_handling(mut self, handling: MissingMemberHandling) -> Self {
        self.missing_member_handling = Some(handling);
        self
    }

    #[inline]
    pub fn with_object_creation_handling(mut self, handling: ObjectCreationHandling) -> Self {
        self.object_creation_handling = Some(handling);
        self
    }
}

/// A type with named members.
#[derive(Debug)]
pub struct ObjectInfo {
    ty: Type,
    members: Box<[MemberInfo]>,
    default_constructor: Option<DefaultConstructor>,
    constructors: Box<[ConstructorInfo]>,
    attributes: ObjectAttributes,
}

impl ObjectInfo {
    pub fn new<T: TypePath>(members: &[MemberInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            members: members.to_vec().into_boxed_slice(),
            default_constructor: None,
            constructors: Box::new([]),
            attributes: ObjectAttributes::new(),
        }
    }

    #[inline]
    pub fn with_default_constructor(mut self, constructor: DefaultConstructor) -> Self {
        self.default_constructor = Some(constructor);
        self
    }

    pub fn with_constructor(self, constructor: ConstructorInfo) -> Self {
        let mut constructors = self.constructors.into_vec();
        constructors.push(constructor);
        Self {
            constructors: constructors.into_boxed_slice(),
            ..self
        }
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

    /// Members in declaration order; the index is the one `Object` accepts.
    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    #[inline]
    pub fn member_index(&self, name: &str) -> Option<usize> {
        crate::info::member_index(&self.members, name)
    }

    #[inline]
    pub fn default_constructor(&self) -> Option<&DefaultConstructor> {
        self.default_constructor.as_ref()
    }

    #[inline]
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    #[inline]
    pub fn attributes(&self) -> &ObjectAttributes {
        &self.attributes
    }
}
