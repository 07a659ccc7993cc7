//! A contract driven JSON serializer over a small reflection model.
//!
//! Types describe themselves through [`Reflect`] and [`Typed`](info::Typed),
//! usually derived with [`#[derive(Reflect)]`](derive::Reflect). A
//! [`ContractResolver`](contract::ContractResolver) turns that description
//! into a [`Contract`](contract::Contract): wire names, policies and the way
//! to create instances. The walkers in [`ser`] and [`de`] convert between
//! reflected values and [`serde_json::Value`] trees under the policies of a
//! [`Settings`].
//!
//! ```
//! use knot_json::Settings;
//! use knot_json::derive::Reflect;
//! use knot_json::naming::NamingStrategy;
//! use serde_json::json;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[knot(default)]
//! struct Point {
//!     x_pos: i32,
//!     y_pos: i32,
//! }
//!
//! let settings = Settings::new().with_naming(NamingStrategy::pascal_case());
//! let point = Point { x_pos: 1, y_pos: 2 };
//!
//! let node = knot_json::to_value(&point, &settings).unwrap();
//! assert_eq!(node, json!({"XPos": 1, "YPos": 2}));
//! assert_eq!(knot_json::from_value::<Point>(&node, &settings).unwrap(), point);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate as `knot_json`, also from inside it.
extern crate self as knot_json;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod expando;
mod metadata;
mod reflection;
mod shared;

pub mod contract;
pub mod de;
pub mod error;
pub mod hash;
pub mod impls;
pub mod info;
pub mod naming;
pub mod ops;
pub mod reference;
pub mod registry;
pub mod ser;
pub mod settings;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use de::{from_reader, from_str, from_value, from_value_with_info, populate, populate_str};
pub use error::{Error, ErrorKind, Result};
pub use expando::Expando;
pub use knot_json_derive as derive;
pub use reflection::Reflect;
pub use ser::{to_string, to_value, to_writer};
pub use settings::Settings;
pub use shared::Shared;
