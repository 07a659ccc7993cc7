//! Writing reflected values as JSON.
//!
//! The walker turns a value into a [`serde_json::Value`] tree, driven by the
//! contract of each type it meets. String and writer output is produced by
//! printing that tree.
//!
//! ```
//! use knot_json::Settings;
//! use serde_json::json;
//!
//! let value = vec![Some(1_u8), None];
//! assert_eq!(knot_json::to_value(&value, &Settings::default()).unwrap(), json!([1, null]));
//! assert_eq!(knot_json::to_string(&value, &Settings::default()).unwrap(), "[1,null]");
//! ```

// -----------------------------------------------------------------------------
// Modules

mod serializer;

// -----------------------------------------------------------------------------
// Exports

use alloc::string::String;

use serde_json::Value;

use crate::Reflect;
use crate::error::{Error, Result};
use crate::settings::Settings;

use serializer::Serializer;

/// Replaces the contract driven output of the values it accepts.
///
/// Processors are consulted in installation order before any value is
/// dispatched on its contract, wrappers included. Returning `None` declines.
///
/// ```
/// use knot_json::ser::SerializeProcessor;
/// use knot_json::{Reflect, Settings};
/// use serde_json::{Value, json};
///
/// struct Stars;
///
/// impl SerializeProcessor for Stars {
///     fn serialize(&self, value: &dyn Reflect, _: &Settings) -> Option<knot_json::Result<Value>> {
///         let count = value.downcast_ref::<u8>()?;
///         Some(Ok(Value::String("*".repeat(*count as usize))))
///     }
/// }
///
/// let settings = Settings::new().with_serialize_processor(Stars);
/// let node = knot_json::to_value(&vec![2_u8, 3], &settings).unwrap();
/// assert_eq!(node, json!(["**", "***"]));
/// ```
pub trait SerializeProcessor: Send + Sync {
    fn serialize(&self, value: &dyn Reflect, settings: &Settings) -> Option<Result<Value>>;
}

/// Serializes `value` into a node tree.
pub fn to_value<T: Reflect + ?Sized>(value: &T, settings: &Settings) -> Result<Value> {
    Serializer::new(settings).serialize(value.as_reflect())
}

/// Serializes `value` into a compact JSON string.
pub fn to_string<T: Reflect + ?Sized>(value: &T, settings: &Settings) -> Result<String> {
    let node = to_value(value, settings)?;
    serde_json::to_string(&node).map_err(Error::from)
}

/// Serializes `value` as compact JSON into `writer`.
pub fn to_writer<W, T>(writer: W, value: &T, settings: &Settings) -> Result<()>
where
    W: std::io::Write,
    T: Reflect + ?Sized,
{
    let node = to_value(value, settings)?;
    serde_json::to_writer(writer, &node).map_err(Error::from)
}
