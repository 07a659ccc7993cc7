//! Per-type serialization contracts.
//!
//! A [`Contract`] flattens what the walkers need to know about a type: the
//! members with their wire names and policies in write order, the effective
//! extension data member, and the candidates for creating an instance.
//! Contracts are derived by a [`ContractResolver`] and cached process-wide.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod creator;
mod member;
mod resolver;

// -----------------------------------------------------------------------------
// Exports

pub use cache::clear_contract_cache;
pub use creator::{ConstructorContract, Creator, ParamContract};
pub use member::{ExtensionDataContract, MemberContract};
pub use resolver::{ContractResolver, DefaultContractResolver};

use alloc::vec::Vec;

use crate::info::{CreateFn, DefaultConstructor, ReflectKind, TypeInfo};
use crate::naming::NamingStrategy;
use crate::settings::{MissingMemberHandling, ObjectCreationHandling};

/// The derived description of one type.
///
/// Immutable once published. A custom resolver adjusts a contract returned by
/// [`DefaultContractResolver::derive`] before wrapping it in an `Arc`.
#[derive(Debug, Clone)]
pub struct Contract {
    info: &'static TypeInfo,
    members: Vec<MemberContract>,
    default_constructor: Option<DefaultConstructor>,
    constructors: Vec<ConstructorContract>,
    factory: Option<CreateFn>,
    extension_data: Option<ExtensionDataContract>,
    naming: NamingStrategy,
    is_reference: Option<bool>,
    missing_member_handling: Option<MissingMemberHandling>,
    object_creation_handling: Option<ObjectCreationHandling>,
}

impl Contract {
    pub(crate) fn new(info: &'static TypeInfo, naming: NamingStrategy) -> Self {
        Self {
            info,
            members: Vec::new(),
            default_constructor: None,
            constructors: Vec::new(),
            factory: None,
            extension_data: None,
            naming,
            is_reference: None,
            missing_member_handling: None,
            object_creation_handling: None,
        }
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn kind(&self) -> ReflectKind {
        self.info.kind()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.info.type_path()
    }

    /// Members in write order.
    #[inline]
    pub fn members(&self) -> &[MemberContract] {
        &self.members
    }

    #[inline]
    pub fn members_mut(&mut self) -> &mut [MemberContract] {
        &mut self.members
    }

    /// Exact wire name match first, then ASCII case-insensitive.
    pub fn find_member(&self, wire_name: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|member| member.wire_name() == wire_name)
            .or_else(|| {
                self.members
                    .iter()
                    .position(|member| member.wire_name().eq_ignore_ascii_case(wire_name))
            })
    }

    #[inline]
    pub fn default_constructor(&self) -> Option<&DefaultConstructor> {
        self.default_constructor.as_ref()
    }

    #[inline]
    pub fn constructors(&self) -> &[ConstructorContract] {
        &self.constructors
    }

    #[inline]
    pub fn factory(&self) -> Option<CreateFn> {
        self.factory
    }

    /// Installs a function that replaces constructor selection.
    #[inline]
    pub fn set_factory(&mut self, factory: CreateFn) {
        self.factory = Some(factory);
    }

    #[inline]
    pub fn extension_data(&self) -> Option<&ExtensionDataContract> {
        self.extension_data.as_ref()
    }

    /// Type level strategy, used for extension data keys.
    #[inline]
    pub fn naming(&self) -> &NamingStrategy {
        &self.naming
    }

    #[inline]
    pub fn is_reference(&self) -> Option<bool> {
        self.is_reference
    }

    #[inline]
    pub fn missing_member_handling(&self) -> Option<MissingMemberHandling> {
        self.missing_member_handling
    }

    #[inline]
    pub fn object_creation_handling(&self) -> Option<ObjectCreationHandling> {
        self.object_creation_handling
    }
}
