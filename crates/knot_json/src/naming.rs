//! Name transformation applied to member names and, optionally, to
//! dictionary keys and extension data keys.
//!
//! A [`NamingStrategy`] is a plain `Copy` value: it is part of the contract
//! cache key, so two resolvers configured with equal strategies share
//! contracts.
//!
//! ```
//! use knot_json::naming::NamingStrategy;
//!
//! assert_eq!(NamingStrategy::camel_case().resolve("URLValue"), "urlValue");
//! assert_eq!(
//!     NamingStrategy::kebab_case().resolve("HasAttributeNamingStrategy"),
//!     "has-attribute-naming-strategy",
//! );
//! ```

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};
use serde::Deserialize;

// -----------------------------------------------------------------------------
// NameCase

/// The casing rule of a [`NamingStrategy`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    /// Names are used as declared.
    #[default]
    Default,
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    #[serde(skip)]
    Custom(fn(&str) -> String),
}

impl NameCase {
    /// Applies the casing rule to `name`.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Default => name.to_owned(),
            Self::CamelCase => to_camel_case(name),
            Self::PascalCase => name.to_upper_camel_case(),
            Self::SnakeCase => name.to_snake_case(),
            Self::KebabCase => name.to_kebab_case(),
            Self::Custom(func) => func(name),
        }
    }

    fn discriminant(self) -> (u8, usize) {
        match self {
            Self::Default => (0, 0),
            Self::CamelCase => (1, 0),
            Self::PascalCase => (2, 0),
            Self::SnakeCase => (3, 0),
            Self::KebabCase => (4, 0),
            Self::Custom(func) => (5, func as usize),
        }
    }
}

impl PartialEq for NameCase {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.discriminant() == other.discriminant()
    }
}

impl Eq for NameCase {}

impl Hash for NameCase {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
    }
}

/// Lower-cases the leading run of upper-case letters, keeping the last one
/// when it starts the next word: `URLValue` becomes `urlValue`.
///
/// The rest of the name is kept as is. A space after the run ends it, so
/// `FOO bar` becomes `foo bar`; `Has_Underscore` becomes `has_Underscore`.
pub fn to_camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if !chars.first().is_some_and(|c| c.is_uppercase()) {
        return name.to_owned();
    }

    let mut run = chars.len();
    for index in 1..chars.len() {
        if index == 1 && !chars[index].is_uppercase() {
            run = 1;
            break;
        }
        if let Some(&next) = chars.get(index + 1)
            && !next.is_uppercase()
        {
            run = if next.is_whitespace() { index + 1 } else { index };
            break;
        }
    }

    let mut out = String::with_capacity(name.len());
    for (index, &c) in chars.iter().enumerate() {
        if index < run {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// -----------------------------------------------------------------------------
// NamingStrategy

/// Maps declared names to wire names.
///
/// Explicitly renamed members keep their explicit name unless
/// `override_specified_names` is set. Dictionary keys and extension data keys
/// are left alone unless the matching flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct NamingStrategy {
    pub case: NameCase,
    pub override_specified_names: bool,
    pub process_dictionary_keys: bool,
    pub process_extension_data_names: bool,
}

impl NamingStrategy {
    #[inline]
    pub const fn new(case: NameCase) -> Self {
        Self {
            case,
            override_specified_names: false,
            process_dictionary_keys: false,
            process_extension_data_names: false,
        }
    }

    #[inline]
    pub const fn camel_case() -> Self {
        Self::new(NameCase::CamelCase)
    }

    #[inline]
    pub const fn pascal_case() -> Self {
        Self::new(NameCase::PascalCase)
    }

    #[inline]
    pub const fn snake_case() -> Self {
        Self::new(NameCase::SnakeCase)
    }

    #[inline]
    pub const fn kebab_case() -> Self {
        Self::new(NameCase::KebabCase)
    }

    #[inline]
    pub const fn with_override_specified_names(mut self, value: bool) -> Self {
        self.override_specified_names = value;
        self
    }

    #[inline]
    pub const fn with_process_dictionary_keys(mut self, value: bool) -> Self {
        self.process_dictionary_keys = value;
        self
    }

    #[inline]
    pub const fn with_process_extension_data_names(mut self, value: bool) -> Self {
        self.process_extension_data_names = value;
        self
    }

    /// Applies the casing rule unconditionally.
    #[inline]
    pub fn resolve(&self, name: &str) -> String {
        self.case.apply(name)
    }

    /// Wire name of a member. `has_specified_name` is true when `name` comes
    /// from an explicit rename.
    pub fn member_name(&self, name: &str, has_specified_name: bool) -> String {
        if has_specified_name && !self.override_specified_names {
            name.to_owned()
        } else {
            self.resolve(name)
        }
    }

    pub fn dictionary_key(&self, key: &str) -> String {
        if self.process_dictionary_keys {
            self.resolve(key)
        } else {
            key.to_owned()
        }
    }

    pub fn extension_data_name(&self, key: &str) -> String {
        if self.process_extension_data_names {
            self.resolve(key)
        } else {
            key.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NameCase, NamingStrategy, to_camel_case};
    use alloc::string::String;

    #[test]
    fn camel_case_lowers_leading_run() {
        assert_eq!(to_camel_case("URLValue"), "urlValue");
        assert_eq!(to_camel_case("Name"), "name");
        assert_eq!(to_camel_case("ID"), "id");
        assert_eq!(to_camel_case("IPAddress"), "ipAddress");
        assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn camel_case_keeps_separators() {
        assert_eq!(to_camel_case("Has_Underscore"), "has_Underscore");
        assert_eq!(to_camel_case("Has-Dash"), "has-Dash");
        assert_eq!(to_camel_case("first_name"), "first_name");
        assert_eq!(to_camel_case("FOO bar"), "foo bar");
        assert_eq!(to_camel_case("URL_Value"), "urL_Value");
        assert_eq!(to_camel_case("I"), "i");
    }

    #[test]
    fn snake_and_kebab() {
        let kebab = NamingStrategy::kebab_case();
        assert_eq!(
            kebab.resolve("HasAttributeNamingStrategy"),
            "has-attribute-naming-strategy"
        );
        assert_eq!(kebab.resolve("URLValue"), "url-value");

        let snake = NamingStrategy::snake_case();
        assert_eq!(snake.resolve("HasAttributeNamingStrategy"), "has_attribute_naming_strategy");
        assert_eq!(NamingStrategy::pascal_case().resolve("first_name"), "FirstName");
    }

    #[test]
    fn specified_names_are_kept_unless_overridden() {
        let strategy = NamingStrategy::snake_case();
        assert_eq!(strategy.member_name("MyName", true), "MyName");
        assert_eq!(strategy.member_name("MyName", false), "my_name");

        let forced = strategy.with_override_specified_names(true);
        assert_eq!(forced.member_name("MyName", true), "my_name");
    }

    #[test]
    fn keys_follow_scope_flags() {
        let strategy = NamingStrategy::camel_case();
        assert_eq!(strategy.dictionary_key("KeyOne"), "KeyOne");
        assert_eq!(strategy.extension_data_name("KeyOne"), "KeyOne");

        let strategy = strategy
            .with_process_dictionary_keys(true)
            .with_process_extension_data_names(true);
        assert_eq!(strategy.dictionary_key("KeyOne"), "keyOne");
        assert_eq!(strategy.extension_data_name("KeyOne"), "keyOne");
    }

    #[test]
    fn custom_case_identity() {
        fn shout(name: &str) -> String {
            name.to_uppercase()
        }
        let a = NamingStrategy::new(NameCase::Custom(shout));
        let b = NamingStrategy::new(NameCase::Custom(shout));
        assert_eq!(a.resolve("abc"), "ABC");
        assert_eq!(a.case, b.case);
        assert_ne!(a.case, NameCase::Default);
    }
}
