//! Kind specific views of reflected values.
//!
//! [`Reflect::reflect_ref`](crate::Reflect::reflect_ref) returns one of these
//! views; the walkers dispatch on it and never touch concrete types.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod dictionary;
mod dynamic;
mod kind;
mod object;
mod optional;
mod primitive;
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use array::{Array, ArrayIter};
pub use dictionary::{Dictionary, DictionaryIter, InsertError};
pub use dynamic::Dynamic;
pub use kind::{ReflectMut, ReflectRef};
pub use object::{Object, member_at, member_at_mut};
pub use optional::Optional;
pub use primitive::{ConvertError, Primitive};
pub use shared::SharedRef;
