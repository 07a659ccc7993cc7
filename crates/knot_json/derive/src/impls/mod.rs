// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod object_kind;
mod opaque_kind;
mod trait_reflect;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectDerive, ReflectKind};

/// Every impl of one `#[derive(Reflect)]`, wrapped in an anonymous const so
/// helper items stay private.
pub(crate) fn impl_reflect(derive: &ReflectDerive) -> TokenStream {
    let type_path_impl = trait_type_path::impl_trait_type_path(derive);
    let reflect_impl = trait_reflect::impl_trait_reflect(derive);
    let (typed_impl, kind_impl) = match &derive.kind {
        ReflectKind::Object(_) => (
            trait_typed::impl_trait_typed(derive, object_kind::object_info_tokens(derive)),
            object_kind::impl_object(derive),
        ),
        ReflectKind::Opaque => (
            trait_typed::impl_trait_typed(derive, opaque_kind::primitive_info_tokens(derive)),
            opaque_kind::impl_primitive(derive),
        ),
    };
    let auto_register_impl = auto_register::get_auto_register_impl(derive);

    quote! {
        const _: () = {
            #type_path_impl

            #typed_impl

            #reflect_impl

            #kind_impl

            #auto_register_impl
        };
    }
}
