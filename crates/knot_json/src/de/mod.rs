//! Reading reflected values from JSON.
//!
//! Input is parsed into a [`serde_json::Value`] tree first; the walker then
//! resolves the contract of each node's target type, creates instances and
//! fills them in. `$ref`s read before their `$id` are patched once the whole
//! tree has been read.
//!
//! ```
//! use knot_json::Settings;
//!
//! let value: Vec<Option<u8>> = knot_json::from_str("[1, null]", &Settings::default()).unwrap();
//! assert_eq!(value, [Some(1), None]);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod deserializer;

// -----------------------------------------------------------------------------
// Exports

use alloc::boxed::Box;
use alloc::format;

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};
use crate::info::{TypeInfo, Typed};
use crate::settings::Settings;
use crate::Reflect;

use deserializer::Deserializer;

/// Replaces the contract driven reading of the nodes it accepts.
///
/// Processors are consulted in installation order for every node before it
/// is read as `info`. The returned value must be of exactly that type.
/// Returning `None` declines.
///
/// ```
/// use knot_json::de::DeserializeProcessor;
/// use knot_json::info::{TypeInfo, Typed};
/// use knot_json::{Reflect, Settings};
/// use serde_json::Value;
///
/// struct Stars;
///
/// impl DeserializeProcessor for Stars {
///     fn deserialize(
///         &self,
///         node: &Value,
///         info: &'static TypeInfo,
///         _: &Settings,
///     ) -> Option<knot_json::Result<Box<dyn Reflect>>> {
///         if info.type_id() != u8::type_info().type_id() {
///             return None;
///         }
///         let stars = node.as_str()?;
///         Some(Ok(Box::new(stars.len() as u8)))
///     }
/// }
///
/// let settings = Settings::new().with_deserialize_processor(Stars);
/// let value: Vec<u8> = knot_json::from_str(r#"["**", "***"]"#, &settings).unwrap();
/// assert_eq!(value, [2, 3]);
/// ```
pub trait DeserializeProcessor: Send + Sync {
    fn deserialize(
        &self,
        node: &Value,
        info: &'static TypeInfo,
        settings: &Settings,
    ) -> Option<Result<Box<dyn Reflect>>>;
}

/// Reads a node tree as a `T`.
pub fn from_value<T: Reflect + Typed>(node: &Value, settings: &Settings) -> Result<T> {
    let value = from_value_with_info(node, T::type_info(), settings)?;
    value.take::<T>().map_err(|value| {
        Error::from(ErrorKind::InvalidValue {
            type_path: T::type_path(),
            reason: format!("the input was read as a `{}`", value.type_path()),
        })
    })
}

/// Reads a node tree as the type described by `info`.
///
/// The returned box holds a value of exactly that type.
pub fn from_value_with_info(
    node: &Value,
    info: &'static TypeInfo,
    settings: &Settings,
) -> Result<Box<dyn Reflect>> {
    Deserializer::new(settings).deserialize(node, info)
}

/// Parses `json` and reads it as a `T`.
///
/// Syntax errors carry the line and column of the failure.
pub fn from_str<T: Reflect + Typed>(json: &str, settings: &Settings) -> Result<T> {
    let node: Value = serde_json::from_str(json)?;
    from_value(&node, settings)
}

/// Parses JSON from `reader` and reads it as a `T`.
pub fn from_reader<R, T>(reader: R, settings: &Settings) -> Result<T>
where
    R: std::io::Read,
    T: Reflect + Typed,
{
    let node: Value = serde_json::from_reader(reader)?;
    from_value(&node, settings)
}

/// Fills an existing value from a node tree.
///
/// Members present in the input are assigned, or merged in place following
/// the object creation handling; absent members keep their current value.
///
/// ```
/// use knot_json::Settings;
/// use serde_json::json;
///
/// let mut value = vec![1_u8];
/// knot_json::populate(&json!([2, 3]), &mut value, &Settings::default()).unwrap();
/// assert_eq!(value, [1, 2, 3]);
/// ```
pub fn populate<T: Reflect + ?Sized>(node: &Value, target: &mut T, settings: &Settings) -> Result<()> {
    Deserializer::new(settings).populate(node, target.as_reflect_mut())
}

/// Parses `json` and fills `target` from it, see [`populate`].
pub fn populate_str<T: Reflect + ?Sized>(json: &str, target: &mut T, settings: &Settings) -> Result<()> {
    let node: Value = serde_json::from_str(json)?;
    populate(&node, target, settings)
}
