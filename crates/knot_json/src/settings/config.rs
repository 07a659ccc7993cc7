use serde::Deserialize;

use crate::naming::NamingStrategy;
use crate::settings::{ConstructorHandling, DefaultValueHandling, MetadataPropertyHandling};
use crate::settings::{MissingMemberHandling, NullValueHandling, ObjectCreationHandling};
use crate::settings::{PreserveReferencesHandling, ReferenceLoopHandling, Settings};
use crate::settings::{DEFAULT_MAX_DEPTH, TypeNameHandling};

/// Named form of [`DefaultValueHandling`] for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValuesConfig {
    #[default]
    Include,
    Ignore,
    Populate,
    IgnoreAndPopulate,
}

impl From<DefaultValuesConfig> for DefaultValueHandling {
    fn from(value: DefaultValuesConfig) -> Self {
        match value {
            DefaultValuesConfig::Include => Self::INCLUDE,
            DefaultValuesConfig::Ignore => Self::IGNORE,
            DefaultValuesConfig::Populate => Self::POPULATE,
            DefaultValuesConfig::IgnoreAndPopulate => Self::IGNORE_AND_POPULATE,
        }
    }
}

/// The plain-data part of [`Settings`], loadable with any serde format.
///
/// Absent fields keep their default.
///
/// ```
/// use knot_json::Settings;
/// use knot_json::settings::{ReferenceLoopHandling, SettingsConfig};
///
/// let config: SettingsConfig = serde_json::from_str(
///     r#"{ "naming": { "case": "camel_case" }, "reference_loop_handling": "ignore" }"#,
/// ).unwrap();
/// let settings = Settings::from_config(&config);
/// assert_eq!(settings.reference_loop_handling, ReferenceLoopHandling::Ignore);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    pub naming: NamingStrategy,
    pub strict_extension_data: bool,
    pub default_value_handling: DefaultValuesConfig,
    pub null_value_handling: NullValueHandling,
    pub reference_loop_handling: ReferenceLoopHandling,
    pub preserve_references_handling: PreserveReferencesHandling,
    pub metadata_property_handling: MetadataPropertyHandling,
    pub type_name_handling: TypeNameHandling,
    pub constructor_handling: ConstructorHandling,
    pub object_creation_handling: ObjectCreationHandling,
    pub missing_member_handling: MissingMemberHandling,
    pub max_depth: usize,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            naming: NamingStrategy::default(),
            strict_extension_data: false,
            default_value_handling: DefaultValuesConfig::Include,
            null_value_handling: NullValueHandling::default(),
            reference_loop_handling: ReferenceLoopHandling::default(),
            preserve_references_handling: PreserveReferencesHandling::default(),
            metadata_property_handling: MetadataPropertyHandling::default(),
            type_name_handling: TypeNameHandling::default(),
            constructor_handling: ConstructorHandling::default(),
            object_creation_handling: ObjectCreationHandling::default(),
            missing_member_handling: MissingMemberHandling::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SettingsConfig {
    pub(crate) fn apply(&self, settings: Settings) -> Settings {
        Settings {
            naming: self.naming,
            strict_extension_data: self.strict_extension_data,
            default_value_handling: self.default_value_handling.into(),
            null_value_handling: self.null_value_handling,
            reference_loop_handling: self.reference_loop_handling,
            preserve_references_handling: self.preserve_references_handling,
            metadata_property_handling: self.metadata_property_handling,
            type_name_handling: self.type_name_handling,
            constructor_handling: self.constructor_handling,
            object_creation_handling: self.object_creation_handling,
            missing_member_handling: self.missing_member_handling,
            max_depth: self.max_depth,
            ..settings
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SettingsConfig;
    use crate::Settings;
    use crate::naming::{NameCase, NamingStrategy};
    use crate::settings::{DefaultValueHandling, PreserveReferencesHandling, ReferenceLoopHandling};

    #[test]
    fn load_from_ron() {
        let config: SettingsConfig = ron::from_str(
            "(
                naming: (case: kebab_case, process_dictionary_keys: true),
                default_value_handling: ignore_and_populate,
                preserve_references_handling: all,
                max_depth: 16,
            )",
        )
        .unwrap();

        let settings = Settings::from_config(&config);
        assert_eq!(
            settings.naming,
            NamingStrategy::kebab_case().with_process_dictionary_keys(true)
        );
        assert_eq!(
            settings.default_value_handling,
            DefaultValueHandling::IGNORE_AND_POPULATE
        );
        assert_eq!(
            settings.preserve_references_handling,
            PreserveReferencesHandling::All
        );
        assert_eq!(settings.reference_loop_handling, ReferenceLoopHandling::Error);
        assert_eq!(settings.max_depth, 16);
    }

    #[test]
    fn empty_config_is_default() {
        let config: SettingsConfig = serde_json::from_str("{}").unwrap();
        let settings = Settings::from_config(&config);
        assert_eq!(settings.naming.case, NameCase::Default);
        assert_eq!(settings.max_depth, 64);
        assert!(serde_json::from_str::<SettingsConfig>(r#"{"unknown": 1}"#).is_err());
    }
}
