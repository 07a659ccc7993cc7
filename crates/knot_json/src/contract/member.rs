use alloc::boxed::Box;
use alloc::string::String;

use serde_json::Value;

use crate::info::{ExtensionDataAccess, MemberAccess, MemberAttributes, Type, TypeInfo};
use crate::settings::Required;

/// One member of a [`Contract`](crate::contract::Contract).
#[derive(Debug, Clone)]
pub struct MemberContract {
    name: &'static str,
    wire_name: String,
    path: Box<[usize]>,
    declaring_type: Type,
    type_info: fn() -> &'static TypeInfo,
    attributes: MemberAttributes,
}

impl MemberContract {
    pub(crate) fn new(
        name: &'static str,
        wire_name: String,
        path: Box<[usize]>,
        declaring_type: Type,
        type_info: fn() -> &'static TypeInfo,
        attributes: MemberAttributes,
    ) -> Self {
        Self {
            name,
            wire_name,
            path,
            declaring_type,
            type_info,
            attributes,
        }
    }

    /// Declared identifier.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    #[inline]
    pub fn set_wire_name(&mut self, wire_name: impl Into<String>) {
        self.wire_name = wire_name.into();
    }

    /// Member indices leading from the contract's type to this member,
    /// through embedded base objects.
    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    #[inline]
    pub fn declaring_type(&self) -> &Type {
        &self.declaring_type
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn attributes(&self) -> &MemberAttributes {
        &self.attributes
    }

    #[inline]
    pub fn attributes_mut(&mut self) -> &mut MemberAttributes {
        &mut self.attributes
    }

    #[inline]
    pub fn required(&self) -> Required {
        self.attributes.required
    }

    #[inline]
    pub fn access(&self) -> MemberAccess {
        self.attributes.access
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.attributes.default_value.as_ref()
    }
}

/// The effective extension data member of a type.
#[derive(Debug, Clone)]
pub struct ExtensionDataContract {
    name: &'static str,
    path: Box<[usize]>,
    type_info: fn() -> &'static TypeInfo,
    usage: ExtensionDataAccess,
    access: MemberAccess,
}

impl ExtensionDataContract {
    pub(crate) fn new(
        name: &'static str,
        path: Box<[usize]>,
        type_info: fn() -> &'static TypeInfo,
        usage: ExtensionDataAccess,
        access: MemberAccess,
    ) -> Self {
        Self {
            name,
            path,
            type_info,
            usage,
            access,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// A dictionary, possibly wrapped in `Option`.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    /// Entries are written after the declared members.
    #[inline]
    pub fn writes(&self) -> bool {
        self.usage.write && self.access.can_read()
    }

    /// Unmatched input keys are routed here.
    #[inline]
    pub fn reads(&self) -> bool {
        self.usage.read
    }

    /// A missing dictionary may be created and stored.
    #[inline]
    pub fn can_set(&self) -> bool {
        self.access.can_write()
    }
}
