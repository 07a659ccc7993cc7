//! `#[derive(Reflect)]` for `knot_json`.
//!
//! See [`Reflect`] for the accepted attributes.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

pub(crate) static KNOT_ATTRIBUTE_NAME: &str = "knot";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements `TypePath`, `Typed`, `Reflect` and, for
/// structs with named fields, `Object`. Every reflected field type must
/// itself implement `Reflect` and `Typed`.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[knot(default, rename_all = "PascalCase")]
/// struct Person {
///     first_name: String,
///     #[knot(rename = "years", default_value = 0, default_value_handling = "ignore")]
///     age: u32,
///     #[knot(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// ## Type Attributes
///
/// - `type_path = "a::b::Name"`: the `$type` name; defaults to
///   `module_path!()` and the ident. Generic parameters are appended.
/// - `rename_all = "camelCase" | "PascalCase" | "snake_case" | "kebab-case"`
/// - `naming(case = "...", override_specified_names, process_dictionary_keys,
///   process_extension_data_names)`
/// - `default` / `private_default`: a default constructor through `Default`.
/// - `constructor(func(field_a, field_b), designated, private)`: a
///   parameterized constructor calling `Self::func`. Parameters name fields
///   and bind to the members of those fields. Repeatable.
/// - `is_reference = bool`
/// - `missing_member = "ignore" | "error"`
/// - `creation_handling = "auto" | "reuse" | "replace"`
/// - `auto_register`: collect the type for `TypeRegistry::auto_register`.
///   Not available for generic types.
/// - `opaque`: reflect the type as a single node through its `serde`
///   impls, for enums, tuple structs and foreign shapes. With `default`,
///   `Default` provides the default node.
///
/// ## Field Attributes
///
/// - `rename = "name"`
/// - `required`, or `required = "default" | "allow_null" | "always" |
///   "disallow_null"`
/// - `default_value = <json>` and `param_default = <json>`: literals in
///   `serde_json::json!` syntax.
/// - `default_value_handling = "include" | "ignore" | "populate" |
///   "ignore_and_populate"`
/// - `null_value_handling = "include" | "ignore"`
/// - `reference_loop_handling = "error" | "ignore" | "serialize"` and
///   `item_reference_loop_handling`
/// - `type_name_handling = "none" | "objects" | "arrays" | "all" | "auto"`
///   and `item_type_name_handling`
/// - `is_reference = bool` and `item_is_reference = bool`
/// - `creation_handling = "auto" | "reuse" | "replace"`
/// - `order = <i32>`
/// - `read_only` / `write_only`
/// - `extension_data`, or `extension_data = "read" | "write" | "both"`
/// - `base`: the field embeds a parent object whose members are flattened.
/// - `naming(...)`: as on types, applied to this member's name.
/// - `skip`: the field is invisible to reflection. A skipped field still
///   needs a value when the type is created, so combine it with `default`
///   or a constructor.
#[proc_macro_derive(Reflect, attributes(knot))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(derive) => impls::impl_reflect(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
