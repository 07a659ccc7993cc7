//! Reflection for standard types.
//!
//! - scalars: `bool`, `char`, `i8`-`i64`, `isize`, `u8`-`u64`, `usize`,
//!   `f32`, `f64`, `String`
//! - nodes: `serde_json::Value` (primitive), `serde_json::Map` (dictionary)
//! - wrappers: `Option<T>`, `Box<dyn Reflect>`
//! - arrays: `Vec<T>`, `VecDeque<T>`, `Box<[T]>`, `HashSet<T>`, `BTreeSet<T>`
//! - dictionaries: `HashMap<K, V>`, `BTreeMap<K, V>` with `K: MapKey`
//!
//! [`Shared`](crate::Shared) and [`Expando`](crate::Expando) live in their
//! own modules.

// -----------------------------------------------------------------------------
// Modules

mod boxed;
mod list;
mod map;
mod node;
mod option;
mod primitive;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use map::MapKey;

use alloc::string::String;

/// Concatenates `parts` into one allocation, used to build generic type paths.
#[inline(never)]
pub fn concat(parts: &[&str]) -> String {
    let len = parts.iter().map(|part| part.len()).sum();
    let mut out = String::with_capacity(len);
    for part in parts {
        out.push_str(part);
    }
    out
}

macro_rules! impl_type_path {
    ($ty:ty, $path:expr, $name:expr) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }
        }
    };
}

/// `TypePath` of a generic type: `$path<P1, P2>` and `$name<N1, N2>`.
macro_rules! impl_generic_type_path {
    (impl<$($param:ident),*> $ty:ty => $path:expr, $name:expr) => {
        impl<$($param: $crate::info::TypePath),*> $crate::info::TypePath for $ty {
            fn type_path() -> &'static str {
                static CELL: $crate::info::GenericTypePathCell = $crate::info::GenericTypePathCell::new();
                CELL.get_or_insert_str::<Self>(|| {
                    let params = [$(<$param as $crate::info::TypePath>::type_path()),*].join(", ");
                    $crate::impls::concat(&[$path, "<", &params, ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: $crate::info::GenericTypePathCell = $crate::info::GenericTypePathCell::new();
                CELL.get_or_insert_str::<Self>(|| {
                    let params = [$(<$param as $crate::info::TypePath>::type_name()),*].join(", ");
                    $crate::impls::concat(&[$name, "<", &params, ">"])
                })
            }
        }
    };
}

pub(crate) use {impl_generic_type_path, impl_type_path};

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::info::TypePath;

    #[test]
    fn generic_paths() {
        assert_eq!(<Vec<i32>>::type_path(), "alloc::vec::Vec<i32>");
        assert_eq!(<Vec<i32>>::type_name(), "Vec<i32>");
        assert_eq!(
            <BTreeMap<String, Option<u8>>>::type_path(),
            "alloc::collections::BTreeMap<alloc::string::String, core::option::Option<u8>>"
        );
        assert_eq!(<Vec<Vec<bool>>>::type_name(), "Vec<Vec<bool>>");
    }
}
