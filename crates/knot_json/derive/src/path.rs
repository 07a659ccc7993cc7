//! Paths of `knot_json` items used by generated code.
//!
//! Keeping them here limits the changes needed when the runtime crate
//! moves things around.

use proc_macro2::TokenStream;
use quote::quote;

/// The access path of the `knot_json` crate from the invoking crate.
///
/// 1. Crates depending on `knot_json` get `::knot_json`.
/// 2. Crates depending on the `knot` facade get `::knot::json`.
/// 3. Anything else gets `::knot_json`, which `knot_json` itself provides
///    through `extern crate self as knot_json`.
///
/// Reading the manifest is not free, so the path is computed once per
/// derive and passed around.
pub(crate) fn knot_json() -> syn::Path {
    knot_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("knot_json"))
}

#[inline(always)]
pub(crate) fn reflect_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::Reflect)
}

#[inline(always)]
pub(crate) fn info_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::info)
}

#[inline(always)]
pub(crate) fn ops_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::ops)
}

#[inline(always)]
pub(crate) fn settings_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::settings)
}

#[inline(always)]
pub(crate) fn naming_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::naming)
}

#[inline(always)]
pub(crate) fn exports_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::__macro_exports)
}

#[inline(always)]
pub(crate) fn box_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::__macro_exports::alloc_utils::Box)
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(knot: &syn::Path) -> TokenStream {
    quote!(#knot::__macro_exports::auto_register)
}
