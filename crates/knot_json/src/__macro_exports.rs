//! Items used by code generated from `#[derive(Reflect)]`. Not public API.

use alloc::boxed::Box;
use alloc::string::String;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Reflect;
use crate::ops::ConvertError;

pub use serde;
pub use serde_json;

pub use crate::impls::concat;
pub use crate::info::take_argument;

pub mod alloc_utils {
    pub use alloc::boxed::Box;
    pub use alloc::vec::Vec;
}

/// `base<p1, p2>` for generic type paths and names.
pub fn generic_path(base: &str, params: &[&str]) -> String {
    concat(&[base, "<", &params.join(", "), ">"])
}

/// Node of an opaque type, through its `serde::Serialize` impl.
pub fn opaque_to_node<T: Serialize>(value: &T) -> Result<Value, ConvertError> {
    serde_json::to_value(value).map_err(|error| ConvertError(alloc::format!("{error}")))
}

/// Reads an opaque type through its `serde::Deserialize` impl.
pub fn opaque_from_node<T: DeserializeOwned + Reflect>(
    node: &Value,
) -> Result<Box<dyn Reflect>, ConvertError> {
    serde_json::from_value::<T>(node.clone())
        .map(|value| Box::new(value) as Box<dyn Reflect>)
        .map_err(|error| ConvertError(alloc::format!("{error}")))
}

pub fn opaque_default_node<T: Serialize + Default>() -> Value {
    serde_json::to_value(T::default()).unwrap_or(Value::Null)
}

#[inline]
pub fn null_node() -> Value {
    Value::Null
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::{NonGenericTypeInfoCell, ObjectInfo, TypeInfo, Typed};
    use crate::registry::TypeRegistry;

    /// A registration function collected at link time.
    pub struct AutoRegistration(pub fn(&mut TypeRegistry));

    inventory::collect!(AutoRegistration);

    /// Registers `T`; the generated submissions point here.
    pub fn register<T: Typed>(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }

    /// Registered by this crate's own submission, so its presence tells
    /// whether link time collection works on this platform.
    pub struct AvailFlag;

    crate::impls::impl_type_path!(
        AvailFlag,
        "knot_json::__macro_exports::auto_register::AvailFlag",
        "AvailFlag"
    );

    impl Typed for AvailFlag {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::Object(ObjectInfo::new::<Self>(&[])))
        }
    }

    inventory::submit! {
        AutoRegistration(register::<AvailFlag>)
    }

    pub fn register_types(registry: &mut TypeRegistry) {
        for registration in inventory::iter::<AutoRegistration> {
            (registration.0)(registry);
        }
    }
}
