//! Reserved property names.

pub(crate) const ID: &str = "$id";
pub(crate) const REF: &str = "$ref";
pub(crate) const TYPE: &str = "$type";
pub(crate) const VALUE: &str = "$value";
pub(crate) const VALUES: &str = "$values";

/// Whether `key` is one of the reserved names.
#[inline]
pub(crate) fn is_metadata(key: &str) -> bool {
    matches!(key, ID | REF | TYPE | VALUE | VALUES)
}
