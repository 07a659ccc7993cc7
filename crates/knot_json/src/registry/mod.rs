//! The binder of `$type` names.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types deriving `Reflect` with
//! `#[knot(auto_register)]` are collected at link time through the
//! [`inventory`] crate and added by [`TypeRegistry::auto_register`].
//! On platforms `inventory` does not support the call registers nothing and
//! returns `false`.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::TypeRegistry;
