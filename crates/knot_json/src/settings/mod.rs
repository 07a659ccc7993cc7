//! Per-call configuration.
//!
//! Every policy has a call-wide value here; types and members may override
//! it through their attributes, and the most specific setting wins.

// -----------------------------------------------------------------------------
// Modules

mod config;
mod handling;

// -----------------------------------------------------------------------------
// Exports

pub use config::{DefaultValuesConfig, SettingsConfig};
pub use handling::{ConstructorHandling, DefaultValueHandling, MetadataPropertyHandling};
pub use handling::{MissingMemberHandling, NullValueHandling, ObjectCreationHandling};
pub use handling::{PreserveReferencesHandling, ReferenceLoopHandling, Required, TypeNameHandling};

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::contract::{ContractResolver, DefaultContractResolver};
use crate::de::DeserializeProcessor;
use crate::naming::NamingStrategy;
use crate::reference::{EqualityComparer, ReferenceEqualityComparer};
use crate::registry::TypeRegistry;
use crate::ser::SerializeProcessor;

/// Nesting depth allowed when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options of one serialize or deserialize call.
///
/// ```
/// use knot_json::Settings;
/// use knot_json::naming::NamingStrategy;
/// use knot_json::settings::{NullValueHandling, ReferenceLoopHandling};
///
/// let settings = Settings::new()
///     .with_naming(NamingStrategy::camel_case())
///     .with_null_value_handling(NullValueHandling::Ignore)
///     .with_reference_loop_handling(ReferenceLoopHandling::Ignore);
/// assert_eq!(settings.max_depth, 64);
/// ```
#[derive(Clone)]
pub struct Settings {
    /// Replaces the default resolver; `naming` and `strict_extension_data`
    /// are then up to the custom resolver.
    pub contract_resolver: Option<Arc<dyn ContractResolver>>,
    pub naming: NamingStrategy,
    /// Raise a contract error for types declaring several extension data
    /// members instead of using the first one.
    pub strict_extension_data: bool,
    pub default_value_handling: DefaultValueHandling,
    pub null_value_handling: NullValueHandling,
    pub reference_loop_handling: ReferenceLoopHandling,
    pub preserve_references_handling: PreserveReferencesHandling,
    pub metadata_property_handling: MetadataPropertyHandling,
    pub type_name_handling: TypeNameHandling,
    pub constructor_handling: ConstructorHandling,
    pub object_creation_handling: ObjectCreationHandling,
    pub missing_member_handling: MissingMemberHandling,
    pub equality_comparer: Arc<dyn EqualityComparer>,
    pub max_depth: usize,
    /// Binder of `$type` names.
    pub registry: Option<Arc<TypeRegistry>>,
    pub serialize_processors: Vec<Arc<dyn SerializeProcessor>>,
    pub deserialize_processors: Vec<Arc<dyn DeserializeProcessor>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contract_resolver: None,
            naming: NamingStrategy::default(),
            strict_extension_data: false,
            default_value_handling: DefaultValueHandling::INCLUDE,
            null_value_handling: NullValueHandling::Include,
            reference_loop_handling: ReferenceLoopHandling::Error,
            preserve_references_handling: PreserveReferencesHandling::None,
            metadata_property_handling: MetadataPropertyHandling::Default,
            type_name_handling: TypeNameHandling::None,
            constructor_handling: ConstructorHandling::Default,
            object_creation_handling: ObjectCreationHandling::Auto,
            missing_member_handling: MissingMemberHandling::Ignore,
            equality_comparer: Arc::new(ReferenceEqualityComparer),
            max_depth: DEFAULT_MAX_DEPTH,
            registry: None,
            serialize_processors: Vec::new(),
            deserialize_processors: Vec::new(),
        }
    }
}

macro_rules! builders {
    ($($fn_name:ident => $field:ident: $ty:ty;)*) => {
        $(
            #[inline]
            pub fn $fn_name(mut self, value: $ty) -> Self {
                self.$field = value;
                self
            }
        )*
    };
}

impl Settings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    builders! {
        with_naming => naming: NamingStrategy;
        with_strict_extension_data => strict_extension_data: bool;
        with_default_value_handling => default_value_handling: DefaultValueHandling;
        with_null_value_handling => null_value_handling: NullValueHandling;
        with_reference_loop_handling => reference_loop_handling: ReferenceLoopHandling;
        with_preserve_references_handling => preserve_references_handling: PreserveReferencesHandling;
        with_metadata_property_handling => metadata_property_handling: MetadataPropertyHandling;
        with_type_name_handling => type_name_handling: TypeNameHandling;
        with_constructor_handling => constructor_handling: ConstructorHandling;
        with_object_creation_handling => object_creation_handling: ObjectCreationHandling;
        with_missing_member_handling => missing_member_handling: MissingMemberHandling;
        with_max_depth => max_depth: usize;
    }

    #[inline]
    pub fn with_contract_resolver(mut self, resolver: impl ContractResolver + 'static) -> Self {
        self.contract_resolver = Some(Arc::new(resolver));
        self
    }

    #[inline]
    pub fn with_equality_comparer(mut self, comparer: impl EqualityComparer + 'static) -> Self {
        self.equality_comparer = Arc::new(comparer);
        self
    }

    #[inline]
    pub fn with_registry(mut self, registry: impl Into<Arc<TypeRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    #[inline]
    pub fn with_serialize_processor(mut self, processor: impl SerializeProcessor + 'static) -> Self {
        self.serialize_processors.push(Arc::new(processor));
        self
    }

    #[inline]
    pub fn with_deserialize_processor(
        mut self,
        processor: impl DeserializeProcessor + 'static,
    ) -> Self {
        self.deserialize_processors.push(Arc::new(processor));
        self
    }

    /// Builds settings from plain configuration data.
    pub fn from_config(config: &SettingsConfig) -> Self {
        config.apply(Self::default())
    }

    /// The resolver contracts are taken from during the call.
    pub fn contract_resolver(&self) -> Arc<dyn ContractResolver> {
        match &self.contract_resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(
                DefaultContractResolver::new(self.naming)
                    .with_strict_extension_data(self.strict_extension_data),
            ),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("custom_resolver", &self.contract_resolver.is_some())
            .field("naming", &self.naming)
            .field("strict_extension_data", &self.strict_extension_data)
            .field("default_value_handling", &self.default_value_handling)
            .field("null_value_handling", &self.null_value_handling)
            .field("reference_loop_handling", &self.reference_loop_handling)
            .field("preserve_references_handling", &self.preserve_references_handling)
            .field("metadata_property_handling", &self.metadata_property_handling)
            .field("type_name_handling", &self.type_name_handling)
            .field("constructor_handling", &self.constructor_handling)
            .field("object_creation_handling", &self.object_creation_handling)
            .field("missing_member_handling", &self.missing_member_handling)
            .field("max_depth", &self.max_depth)
            .field("registry", &self.registry.as_ref().map(|registry| registry.len()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::Settings;
    use crate::registry::TypeRegistry;

    #[test]
    fn registry_owned_or_shared() {
        let owned = Settings::new().with_registry(TypeRegistry::new());
        assert!(owned.registry.is_some());

        let registry = Arc::new(TypeRegistry::new());
        let shared = Settings::new().with_registry(Arc::clone(&registry));
        assert!(Arc::ptr_eq(shared.registry.as_ref().unwrap(), &registry));
    }
}
