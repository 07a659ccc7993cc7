use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use log::{debug, trace, warn};

use crate::contract::{ConstructorContract, Contract, ExtensionDataContract};
use crate::contract::{MemberContract, ParamContract, cache};
use crate::error::{ErrorKind, Result};
use crate::info::{MemberInfo, ObjectAttributes, ObjectInfo, ReflectKind, Type, TypeInfo};
use crate::naming::NamingStrategy;

/// Source of contracts for the walkers.
///
/// Implementations must return the same contract for the same type for the
/// whole process, since contracts are shared between concurrent calls.
pub trait ContractResolver: Send + Sync {
    fn resolve(&self, info: &'static TypeInfo) -> Result<Arc<Contract>>;
}

/// Derives contracts from [`TypeInfo`] and caches them process-wide.
///
/// Two resolvers with equal configuration share cached contracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultContractResolver {
    naming: NamingStrategy,
    strict_extension_data: bool,
}

impl DefaultContractResolver {
    #[inline]
    pub const fn new(naming: NamingStrategy) -> Self {
        Self {
            naming,
            strict_extension_data: false,
        }
    }

    /// Raise a contract error for types with several extension data members
    /// instead of using the first one.
    #[inline]
    pub const fn with_strict_extension_data(mut self, strict: bool) -> Self {
        self.strict_extension_data = strict;
        self
    }

    #[inline]
    pub const fn naming(&self) -> &NamingStrategy {
        &self.naming
    }

    /// Derives the contract of `info` without consulting the cache.
    pub fn derive(&self, info: &'static TypeInfo) -> Result<Contract> {
        debug!("deriving contract for `{}`", info.type_path());
        match info {
            TypeInfo::Object(object) => self.derive_object(info, object),
            TypeInfo::Dynamic(dynamic) => {
                let naming = self.type_naming(dynamic.attributes());
                let mut contract = Contract::new(info, naming);
                let mut members = Vec::new();
                let mut extension = Vec::new();
                collect_level(
                    dynamic.ty(),
                    dynamic.members(),
                    &[],
                    &naming,
                    &mut members,
                    &mut extension,
                )?;
                if !extension.is_empty() {
                    return Err(contract_error(info, "dynamic objects cannot declare extension data"));
                }
                sort_members(&mut members);
                contract.members = members;
                contract.default_constructor = dynamic
                    .create_fn()
                    .map(crate::info::DefaultConstructor::public);
                apply_attributes(&mut contract, dynamic.attributes());
                Ok(contract)
            }
            TypeInfo::Array(array) => {
                let mut contract = Contract::new(info, self.naming);
                contract.default_constructor =
                    array.create_fn().map(crate::info::DefaultConstructor::public);
                Ok(contract)
            }
            TypeInfo::Dictionary(dictionary) => {
                let mut contract = Contract::new(info, self.naming);
                contract.default_constructor = Some(crate::info::DefaultConstructor::public(
                    dictionary.create_fn(),
                ));
                Ok(contract)
            }
            _ => Ok(Contract::new(info, self.naming)),
        }
    }

    fn type_naming(&self, attributes: &ObjectAttributes) -> NamingStrategy {
        attributes.naming.unwrap_or(self.naming)
    }

    fn derive_object(&self, info: &'static TypeInfo, object: &ObjectInfo) -> Result<Contract> {
        let naming = self.type_naming(object.attributes());
        let mut contract = Contract::new(info, naming);

        let mut members: Vec<MemberContract> = Vec::new();
        let mut extension = Vec::new();
        let mut visited = Vec::new();
        self.collect_object(object, Vec::new(), &mut visited, &mut members, &mut extension)?;
        sort_members(&mut members);

        contract.extension_data = self.select_extension_data(info, extension)?;
        contract.constructors = object
            .constructors()
            .iter()
            .map(|constructor| {
                let params = constructor
                    .params()
                    .iter()
                    .map(|param| {
                        let member = members
                            .iter()
                            .position(|m| m.name().eq_ignore_ascii_case(param.name()));
                        let wire_name = match member {
                            Some(index) => String::from(members[index].wire_name()),
                            None => naming.member_name(param.name(), false),
                        };
                        let default_value = param.default_value().cloned().or_else(|| {
                            member.and_then(|index| members[index].attributes().param_default.clone())
                        });
                        ParamContract::new(
                            param.name(),
                            wire_name,
                            param.type_info_fn(),
                            default_value,
                            member,
                        )
                    })
                    .collect();
                ConstructorContract::new(
                    constructor.name(),
                    params,
                    constructor.construct_fn(),
                    constructor.is_public(),
                    constructor.is_designated(),
                )
            })
            .collect();
        contract.members = members;
        contract.default_constructor = object.default_constructor().copied();
        apply_attributes(&mut contract, object.attributes());
        Ok(contract)
    }

    /// Own members first, then embedded bases. A base member whose wire name
    /// is already taken by a more derived member is dropped.
    fn collect_object(
        &self,
        object: &ObjectInfo,
        prefix: Vec<usize>,
        visited: &mut Vec<TypeId>,
        out: &mut Vec<MemberContract>,
        extension: &mut Vec<ExtensionDataContract>,
    ) -> Result<()> {
        if visited.contains(&object.ty().id()) {
            return Ok(());
        }
        visited.push(object.ty().id());

        let naming = self.type_naming(object.attributes());
        let mut level = Vec::new();
        collect_level(object.ty(), object.members(), &prefix, &naming, &mut level, extension)?;

        for member in level {
            if out.iter().any(|m| m.wire_name() == member.wire_name()) {
                trace!(
                    "`{}` of `{}` is shadowed by a more derived member",
                    member.name(),
                    object.ty().path(),
                );
                continue;
            }
            out.push(member);
        }

        for (index, member) in object.members().iter().enumerate() {
            if member.attributes().skip || !member.attributes().base {
                continue;
            }
            let Some(base) = member.type_info().as_object() else {
                return Err(ErrorKind::Contract {
                    type_path: object.ty().path(),
                    reason: format!("base member `{}` must hold an object", member.name()),
                }
                .into());
            };
            let mut path = prefix.clone();
            path.push(index);
            self.collect_object(base, path, visited, out, extension)?;
        }
        Ok(())
    }

    fn select_extension_data(
        &self,
        info: &'static TypeInfo,
        mut candidates: Vec<ExtensionDataContract>,
    ) -> Result<Option<ExtensionDataContract>> {
        for candidate in &candidates {
            let target = candidate.type_info();
            let target = target.as_optional().map_or(target, |optional| optional.inner());
            if target.kind() != ReflectKind::Dictionary {
                return Err(contract_error(
                    info,
                    &format!(
                        "extension data member `{}` must be a dictionary, found `{}`",
                        candidate.name(),
                        candidate.type_info().type_path()
                    ),
                ));
            }
        }

        if candidates.len() > 1 {
            if self.strict_extension_data {
                return Err(contract_error(info, "multiple extension data members are declared"));
            }
            for ignored in &candidates[1..] {
                warn!(
                    "`{}`: extension data member `{}` is ignored, `{}` is used",
                    info.type_path(),
                    ignored.name(),
                    candidates[0].name(),
                );
            }
            candidates.truncate(1);
        }
        Ok(candidates.pop())
    }
}

impl ContractResolver for DefaultContractResolver {
    fn resolve(&self, info: &'static TypeInfo) -> Result<Arc<Contract>> {
        let key = (info.type_id(), *self);
        if let Some(contract) = cache::get(&key) {
            trace!("contract cache hit for `{}`", info.type_path());
            return Ok(contract);
        }
        let contract = self.derive(info)?;
        Ok(cache::publish(key, contract))
    }
}

/// Members of one declaring type, excluding bases.
fn collect_level(
    declaring: &Type,
    members: &[MemberInfo],
    prefix: &[usize],
    naming: &NamingStrategy,
    out: &mut Vec<MemberContract>,
    extension: &mut Vec<ExtensionDataContract>,
) -> Result<()> {
    for (index, member) in members.iter().enumerate() {
        let attributes = member.attributes();
        if attributes.skip || attributes.base {
            continue;
        }

        let mut path = Vec::with_capacity(prefix.len() + 1);
        path.extend_from_slice(prefix);
        path.push(index);

        if let Some(usage) = attributes.extension_data {
            extension.push(ExtensionDataContract::new(
                member.name(),
                path.into_boxed_slice(),
                member.type_info_fn(),
                usage,
                attributes.access,
            ));
            continue;
        }

        let naming = attributes.naming.as_ref().unwrap_or(naming);
        let wire_name = match attributes.rename {
            Some(rename) => naming.member_name(rename, true),
            None => naming.member_name(member.name(), false),
        };
        if out.iter().any(|m| m.wire_name() == wire_name) {
            return Err(ErrorKind::Contract {
                type_path: declaring.path(),
                reason: format!("a member with the name `{wire_name}` already exists"),
            }
            .into());
        }

        out.push(MemberContract::new(
            member.name(),
            wire_name,
            path.into_boxed_slice(),
            *declaring,
            member.type_info_fn(),
            attributes.clone(),
        ));
    }
    Ok(())
}

fn sort_members(members: &mut [MemberContract]) {
    members.sort_by_key(|member| member.attributes().order.unwrap_or(-1));
}

fn apply_attributes(contract: &mut Contract, attributes: &ObjectAttributes) {
    contract.is_reference = attributes.is_reference;
    contract.missing_member_handling = attributes.missing_member_handling;
    contract.object_creation_handling = attributes.object_creation_handling;
}

fn contract_error(info: &'static TypeInfo, reason: &str) -> crate::Error {
    ErrorKind::Contract {
        type_path: info.type_path(),
        reason: String::from(reason),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use super::{ContractResolver, DefaultContractResolver};
    use crate::Reflect;
    use crate::contract::Creator;
    use crate::error::ErrorKind;
    use crate::info::{ArgumentError, ConstructorInfo, DefaultConstructor, ExtensionDataAccess};
    use crate::info::MemberAttributes;
    use crate::info::{MemberInfo, NonGenericTypeInfoCell, ObjectInfo, ParamInfo, TypeInfo};
    use crate::naming::NamingStrategy;
    use crate::settings::ConstructorHandling;

    struct Dummy;

    crate::impls::impl_type_path!(Dummy, "tests::Dummy", "Dummy");

    fn dummy_create() -> Box<dyn Reflect> {
        Box::new(0_u8)
    }

    fn dummy_construct(_: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, ArgumentError> {
        Ok(dummy_create())
    }

    fn leak(info: TypeInfo) -> &'static TypeInfo {
        Box::leak(Box::new(info))
    }

    #[test]
    fn ordering_and_naming() {
        let info = leak(TypeInfo::Object(ObjectInfo::new::<Dummy>(&[
            MemberInfo::new::<i32>("FirstValue"),
            MemberInfo::new::<i32>("SecondValue")
                .with_attributes(MemberAttributes::new().with_order(-5)),
            MemberInfo::new::<i32>("Third").with_attributes(MemberAttributes::new().with_rename("THIRD")),
            MemberInfo::new::<i32>("Hidden").with_attributes(MemberAttributes::new().with_skip(true)),
        ])));

        let contract = DefaultContractResolver::new(NamingStrategy::camel_case())
            .derive(info)
            .unwrap();
        let names: Vec<&str> = contract.members().iter().map(|m| m.wire_name()).collect();
        assert_eq!(names, ["secondValue", "firstValue", "THIRD"]);
        assert_eq!(contract.find_member("thirD"), Some(2));
    }

    #[test]
    fn duplicate_wire_names_are_rejected() {
        let info = leak(TypeInfo::Object(ObjectInfo::new::<Dummy>(&[
            MemberInfo::new::<i32>("a"),
            MemberInfo::new::<i32>("b").with_attributes(MemberAttributes::new().with_rename("a")),
        ])));
        let error = DefaultContractResolver::default().derive(info).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::Contract { .. }));
    }

    #[test]
    fn extension_data_must_be_a_dictionary() {
        let info = leak(TypeInfo::Object(ObjectInfo::new::<Dummy>(&[
            MemberInfo::new::<i32>("extra").with_attributes(
                MemberAttributes::new().with_extension_data(ExtensionDataAccess::BOTH),
            ),
        ])));
        let error = DefaultContractResolver::default().derive(info).unwrap_err();
        assert!(error.to_string().contains("must be a dictionary"));
    }

    #[test]
    fn constructor_selection() {
        let params = [ParamInfo::new::<i32>("value")];
        let private_default = leak(TypeInfo::Object(
            ObjectInfo::new::<Dummy>(&[MemberInfo::new::<i32>("Value")])
                .with_default_constructor(DefaultConstructor::private(dummy_create)),
        ));
        let resolver = DefaultContractResolver::default();

        let contract = resolver.derive(private_default).unwrap();
        assert!(contract.select_creator(ConstructorHandling::Default).is_err());
        assert!(matches!(
            contract.select_creator(ConstructorHandling::AllowNonPublicDefaultConstructor),
            Ok(Creator::Default(_))
        ));

        let single = leak(TypeInfo::Object(
            ObjectInfo::new::<Dummy>(&[MemberInfo::new::<i32>("Value")])
                .with_default_constructor(DefaultConstructor::private(dummy_create))
                .with_constructor(ConstructorInfo::new("new", &params, dummy_construct)),
        ));
        let contract = resolver.derive(single).unwrap();
        let Ok(Creator::Parameterized(constructor)) = contract
            .select_creator(ConstructorHandling::AllowNonPublicDefaultConstructor)
        else {
            panic!("expected the parameterized constructor");
        };
        assert_eq!(constructor.params()[0].member(), Some(0));
        assert_eq!(constructor.params()[0].wire_name(), "Value");

        let error = resolver
            .derive(leak(TypeInfo::Object(ObjectInfo::new::<Dummy>(&[]))))
            .unwrap()
            .select_creator(ConstructorHandling::Default)
            .unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::ConstructorResolution { .. }));
    }

    #[test]
    fn resolve_caches_per_configuration() {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        struct Cached;
        crate::impls::impl_type_path!(Cached, "tests::Cached", "Cached");
        let info = CELL.get_or_init(|| {
            TypeInfo::Object(ObjectInfo::new::<Cached>(&[MemberInfo::new::<i32>("Value")]))
        });

        let camel = DefaultContractResolver::new(NamingStrategy::camel_case());
        let first = camel.resolve(info).unwrap();
        let plain = DefaultContractResolver::default().resolve(info).unwrap();
        assert_eq!(first.members()[0].wire_name(), "value");
        assert_eq!(plain.members()[0].wire_name(), "Value");

        crate::contract::clear_contract_cache();
        let again = camel.resolve(info).unwrap();
        assert_eq!(again.members()[0].wire_name(), "value");
    }
}
