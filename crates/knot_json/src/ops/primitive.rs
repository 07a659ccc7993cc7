use alloc::format;
use alloc::string::String;

use serde_json::Value;
use thiserror::Error;

use crate::Reflect;

/// A node could not be converted to or from a primitive.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConvertError(pub String);

impl ConvertError {
    pub fn mismatch(expected: &str, found: &Value) -> Self {
        let found = match found {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Self(format!("expected {expected}, found {found}"))
    }
}

/// A value written as a single node.
pub trait Primitive: Reflect {
    fn to_node(&self) -> Result<Value, ConvertError>;
}
