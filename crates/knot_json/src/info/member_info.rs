use alloc::vec::Vec;

use serde_json::Value;

use crate::info::{Type, TypeInfo, Typed};
use crate::naming::NamingStrategy;
use crate::settings::{DefaultValueHandling, NullValueHandling, ObjectCreationHandling};
use crate::settings::{ReferenceLoopHandling, Required, TypeNameHandling};

/// Which directions a member takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberAccess {
    #[default]
    ReadWrite,
    /// Written, never populated.
    ReadOnly,
    /// Populated, never written.
    WriteOnly,
}

impl MemberAccess {
    #[inline]
    pub const fn can_read(self) -> bool {
        !matches!(self, Self::WriteOnly)
    }

    #[inline]
    pub const fn can_write(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

/// Directions in which an extension data member is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionDataAccess {
    /// Unmatched input keys are routed into the member.
    pub read: bool,
    /// Entries are written after the declared members.
    pub write: bool,
}

impl ExtensionDataAccess {
    pub const BOTH: Self = Self {
        read: true,
        write: true,
    };
    pub const READ: Self = Self {
        read: true,
        write: false,
    };
    pub const WRITE: Self = Self {
        read: false,
        write: true,
    };
}

/// Per-member configuration, the equivalent of member annotations.
///
/// Every `Option` left `None` defers to the type level and then to the
/// call's [`Settings`](crate::Settings).
#[derive(Debug, Clone, Default)]
pub struct MemberAttributes {
    pub rename: Option<&'static str>,
    pub required: Required,
    /// Compared against when ignoring defaults, assigned when populating.
    pub default_value: Option<Value>,
    /// Default of the constructor parameter bound to this member.
    pub param_default: Option<Value>,
    pub default_value_handling: Option<DefaultValueHandling>,
    pub null_value_handling: Option<NullValueHandling>,
    pub reference_loop_handling: Option<ReferenceLoopHandling>,
    pub object_creation_handling: Option<ObjectCreationHandling>,
    pub type_name_handling: Option<TypeNameHandling>,
    pub is_reference: Option<bool>,
    pub item_is_reference: Option<bool>,
    pub item_reference_loop_handling: Option<ReferenceLoopHandling>,
    pub item_type_name_handling: Option<TypeNameHandling>,
    pub order: Option<i32>,
    pub access: MemberAccess,
    pub skip: bool,
    pub extension_data: Option<ExtensionDataAccess>,
    /// The member holds an embedded parent object whose members are flattened.
    pub base: bool,
    pub naming: Option<NamingStrategy>,
}

macro_rules! option_builders {
    ($($fn_name:ident => $field:ident: $ty:ty;)*) => {
        $(
            #[inline]
            pub fn $fn_name(mut self, value: $ty) -> Self {
                self.$field = Some(value);
                self
            }
        )*
    };
}

impl MemberAttributes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    option_builders! {
        with_rename => rename: &'static str;
        with_default_value => default_value: Value;
        with_param_default => param_default: Value;
        with_default_value_handling => default_value_handling: DefaultValueHandling;
        with_null_value_handling => null_value_handling: NullValueHandling;
        with_reference_loop_handling => reference_loop_handling: ReferenceLoopHandling;
        with_object_creation_handling => object_creation_handling: ObjectCreationHandling;
        with_type_name_handling => type_name_handling: TypeNameHandling;
        with_is_reference => is_reference: bool;
        with_item_is_reference => item_is_reference: bool;
        with_item_reference_loop_handling => item_reference_loop_handling: ReferenceLoopHandling;
        with_item_type_name_handling => item_type_name_handling: TypeNameHandling;
        with_order => order: i32;
        with_extension_data => extension_data: ExtensionDataAccess;
        with_naming => naming: NamingStrategy;
    }

    #[inline]
    pub fn with_required(mut self, required: Required) -> Self {
        self.required = required;
        self
    }

    #[inline]
    pub fn with_access(mut self, access: MemberAccess) -> Self {
        self.access = access;
        self
    }

    #[inline]
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    #[inline]
    pub fn with_base(mut self, base: bool) -> Self {
        self.base = base;
        self
    }
}

/// A declared member: a named field of an object.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    name: &'static str,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    attributes: MemberAttributes,
}

impl MemberInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            attributes: MemberAttributes::new(),
        }
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: MemberAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Declared identifier.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type.
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
    pub fn attributes(&self) -> &MemberAttributes {
        &self.attributes
    }
}

pub(crate) fn member_index(members: &[MemberInfo], name: &str) -> Option<usize> {
    members.iter().position(|m| m.name == name)
}

pub(crate) fn collect_types(members: &[MemberInfo], out: &mut Vec<&'static TypeInfo>) {
    out.extend(members.iter().map(MemberInfo::type_info));
}
