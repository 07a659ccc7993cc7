use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// How members equal to their default value are treated.
    ///
    /// `IGNORE` skips them when serializing, `POPULATE` assigns the default to
    /// members absent from the input when deserializing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DefaultValueHandling: u8 {
        const IGNORE = 1;
        const POPULATE = 1 << 1;
    }
}

impl DefaultValueHandling {
    /// Write every member and leave absent members untouched.
    pub const INCLUDE: Self = Self::empty();
    pub const IGNORE_AND_POPULATE: Self = Self::IGNORE.union(Self::POPULATE);
}

/// Whether `None` members are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullValueHandling {
    #[default]
    Include,
    Ignore,
}

/// What to do when a shared value is reached again through its own subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceLoopHandling {
    #[default]
    Error,
    /// Omit the member, element or entry that closes the loop.
    Ignore,
    /// Keep writing; only the nesting depth limit stops the walk.
    Serialize,
}

/// Which shared values get `$id`/`$ref` treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreserveReferencesHandling {
    #[default]
    None,
    /// Objects, dictionaries and dynamic objects.
    Objects,
    /// Arrays, written as `{"$id": .., "$values": [..]}`.
    Arrays,
    All,
}

impl PreserveReferencesHandling {
    #[inline]
    pub const fn objects(self) -> bool {
        matches!(self, Self::Objects | Self::All)
    }

    #[inline]
    pub const fn arrays(self) -> bool {
        matches!(self, Self::Arrays | Self::All)
    }
}

/// How `$`-prefixed metadata properties are recognised while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPropertyHandling {
    /// Metadata must lead the object; later `$` keys are ordinary data.
    #[default]
    Default,
    /// Metadata is never recognised.
    Ignore,
    /// Metadata may appear anywhere in the object.
    ReadAhead,
}

/// When `$type` is written. On read, any mode other than `None` binds
/// `$type` names; under `None` they are consumed and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNameHandling {
    #[default]
    None,
    Objects,
    Arrays,
    All,
    /// Only when the runtime type differs from the declared one.
    Auto,
}

/// Whether a non-public default constructor may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorHandling {
    #[default]
    Default,
    AllowNonPublicDefaultConstructor,
}

/// Whether existing member values are filled in place or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCreationHandling {
    /// Reuse objects, arrays and dictionaries; replace shared handles.
    #[default]
    Auto,
    Reuse,
    Replace,
}

/// What happens to input keys no member or extension data accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMemberHandling {
    #[default]
    Ignore,
    Error,
}

/// Presence requirements of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Required {
    /// May be absent or null.
    #[default]
    Default,
    /// Must be present, may be null.
    AllowNull,
    /// Must be present and not null.
    Always,
    /// May be absent, must not be null when present.
    DisallowNull,
}

impl Required {
    #[inline]
    pub const fn must_be_present(self) -> bool {
        matches!(self, Self::AllowNull | Self::Always)
    }

    #[inline]
    pub const fn rejects_null(self) -> bool {
        matches!(self, Self::Always | Self::DisallowNull)
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultValueHandling, PreserveReferencesHandling, Required};

    #[test]
    fn default_value_flags() {
        assert!(DefaultValueHandling::INCLUDE.is_empty());
        assert!(DefaultValueHandling::IGNORE_AND_POPULATE.contains(DefaultValueHandling::IGNORE));
        assert!(DefaultValueHandling::IGNORE_AND_POPULATE.contains(DefaultValueHandling::POPULATE));
        assert!(!DefaultValueHandling::IGNORE.contains(DefaultValueHandling::POPULATE));
    }

    #[test]
    fn preserve_scopes() {
        assert!(PreserveReferencesHandling::All.objects());
        assert!(PreserveReferencesHandling::All.arrays());
        assert!(!PreserveReferencesHandling::Objects.arrays());
        assert!(!PreserveReferencesHandling::None.objects());
    }

    #[test]
    fn required_levels() {
        assert!(Required::Always.must_be_present() && Required::Always.rejects_null());
        assert!(Required::AllowNull.must_be_present() && !Required::AllowNull.rejects_null());
        assert!(!Required::DisallowNull.must_be_present());
    }
}
