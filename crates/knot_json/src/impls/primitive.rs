use alloc::boxed::Box;
use alloc::string::{String, ToString};

use serde_json::{Number, Value};

use crate::Reflect;
use crate::info::{NonGenericTypeInfoCell, PrimitiveInfo, TypeInfo, Typed};
use crate::ops::{ConvertError, Primitive};

/// The node of `T::default()`.
pub(crate) fn default_node<T: Primitive + Default>() -> Value {
    T::default().to_node().unwrap_or(Value::Null)
}

macro_rules! impl_primitive {
    ($ty:ty, $path:expr, $name:expr) => {
        crate::impls::impl_type_path!($ty, $path, $name);

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Primitive(PrimitiveInfo::new::<Self>(
                        |node| <$ty>::from_node(node).map(|value| Box::new(value) as Box<dyn Reflect>),
                        default_node::<Self>,
                    ))
                })
            }
        }

        impl Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(Primitive);
        }
    };
}

/// Parsing half of the scalar impls.
trait FromNode: Sized {
    fn from_node(node: &Value) -> Result<Self, ConvertError>;
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_integer {
    ($($ty:ident),*) => {$(
        impl_primitive!($ty, stringify!($ty), stringify!($ty));

        impl Primitive for $ty {
            #[inline]
            fn to_node(&self) -> Result<Value, ConvertError> {
                Ok(Value::from(*self))
            }
        }

        impl FromNode for $ty {
            fn from_node(node: &Value) -> Result<Self, ConvertError> {
                let out_of_range = || ConvertError(alloc::format!(
                    "{node} is out of range for `{}`",
                    stringify!($ty),
                ));
                match node {
                    Value::Number(number) => {
                        if let Some(value) = number.as_i64() {
                            Self::try_from(value).map_err(|_| out_of_range())
                        } else if let Some(value) = number.as_u64() {
                            Self::try_from(value).map_err(|_| out_of_range())
                        } else {
                            integral(number).ok_or_else(out_of_range)?.try_into().map_err(|_| out_of_range())
                        }
                    }
                    Value::String(text) => text
                        .trim()
                        .parse()
                        .map_err(|_| ConvertError::mismatch(stringify!($ty), node)),
                    _ => Err(ConvertError::mismatch(stringify!($ty), node)),
                }
            }
        }
    )*};
}

/// `1.0` is accepted where an integer is expected.
fn integral(number: &Number) -> Option<i64> {
    let value = number.as_f64()?;
    (value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64)
        .then_some(value as i64)
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_float {
    ($($ty:ident => $widen:expr),*) => {$(
        impl_primitive!($ty, stringify!($ty), stringify!($ty));

        impl Primitive for $ty {
            fn to_node(&self) -> Result<Value, ConvertError> {
                Ok(float_node($widen(*self)))
            }
        }

        impl FromNode for $ty {
            #[allow(clippy::cast_possible_truncation, clippy::unnecessary_cast)]
            fn from_node(node: &Value) -> Result<Self, ConvertError> {
                parse_float(node).map(|value| value as $ty)
            }
        }
    )*};
}

/// Widens through the shortest decimal form, so `0.1f32` is written as `0.1`.
fn widen_f32(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

/// Non-finite values have no number form and are written as strings.
fn float_node(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(number) => Value::Number(number),
        None if value.is_nan() => Value::from("NaN"),
        None if value > 0.0 => Value::from("Infinity"),
        None => Value::from("-Infinity"),
    }
}

fn parse_float(node: &Value) -> Result<f64, ConvertError> {
    match node {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| ConvertError::mismatch("float", node)),
        Value::String(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other
                .trim()
                .parse()
                .map_err(|_| ConvertError::mismatch("float", node)),
        },
        _ => Err(ConvertError::mismatch("float", node)),
    }
}

impl_float!(f32 => widen_f32, f64 => core::convert::identity);

// -----------------------------------------------------------------------------
// Others

impl_primitive!(bool, "bool", "bool");

impl Primitive for bool {
    #[inline]
    fn to_node(&self) -> Result<Value, ConvertError> {
        Ok(Value::Bool(*self))
    }
}

impl FromNode for bool {
    fn from_node(node: &Value) -> Result<Self, ConvertError> {
        match node {
            Value::Bool(value) => Ok(*value),
            Value::String(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(ConvertError::mismatch("boolean", node)),
        }
    }
}

impl_primitive!(char, "char", "char");

impl Primitive for char {
    #[inline]
    fn to_node(&self) -> Result<Value, ConvertError> {
        Ok(Value::String(self.to_string()))
    }
}

impl FromNode for char {
    fn from_node(node: &Value) -> Result<Self, ConvertError> {
        let Value::String(text) = node else {
            return Err(ConvertError::mismatch("char", node));
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConvertError(alloc::format!("`{text}` is not a single character"))),
        }
    }
}

impl_primitive!(String, "alloc::string::String", "String");

impl Primitive for String {
    #[inline]
    fn to_node(&self) -> Result<Value, ConvertError> {
        Ok(Value::String(self.clone()))
    }
}

impl FromNode for String {
    fn from_node(node: &Value) -> Result<Self, ConvertError> {
        match node {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(value) => Ok(value.to_string()),
            _ => Err(ConvertError::mismatch("string", node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::FromNode;
    use crate::info::Typed;
    use crate::ops::Primitive;

    #[test]
    fn integers_check_range() {
        assert_eq!(u8::from_node(&json!(255)).unwrap(), 255);
        assert!(u8::from_node(&json!(256)).is_err());
        assert!(u32::from_node(&json!(-1)).is_err());
        assert_eq!(i64::from_node(&json!(3.0)).unwrap(), 3);
        assert!(i64::from_node(&json!(3.5)).is_err());
        assert_eq!(i32::from_node(&json!("42")).unwrap(), 42);
    }

    #[test]
    fn non_finite_floats_are_strings() {
        assert_eq!(f64::NAN.to_node().unwrap(), json!("NaN"));
        assert_eq!(f64::INFINITY.to_node().unwrap(), json!("Infinity"));
        assert_eq!((-f32::INFINITY).to_node().unwrap(), json!("-Infinity"));
        assert!(f64::from_node(&json!("NaN")).unwrap().is_nan());
        assert_eq!(f32::from_node(&json!(1.5)).unwrap(), 1.5);
        assert_eq!(0.1_f32.to_node().unwrap(), json!(0.1));
    }

    #[test]
    fn chars_and_strings() {
        assert_eq!(char::from_node(&json!("x")).unwrap(), 'x');
        assert!(char::from_node(&json!("xy")).is_err());
        assert_eq!(alloc::string::String::from_node(&json!(12)).unwrap(), "12");
        assert!(alloc::string::String::from_node(&Value::Null).is_err());
    }

    #[test]
    fn default_nodes() {
        let info = i32::type_info().as_primitive().unwrap();
        assert_eq!(info.default_node(), json!(0));
        let info = bool::type_info().as_primitive().unwrap();
        assert_eq!(info.default_node(), json!(false));
        let value = info.from_node(&json!(true)).unwrap();
        assert_eq!(value.downcast_ref::<bool>(), Some(&true));
    }
}
