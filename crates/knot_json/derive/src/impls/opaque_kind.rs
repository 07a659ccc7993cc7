use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

/// The `TypeInfo::Primitive(...)` expression of an opaque type. The node
/// conversions go through `serde`.
pub(crate) fn primitive_info_tokens(derive: &ReflectDerive) -> TokenStream {
    let info_ = crate::path::info_(&derive.knot);
    let exports_ = crate::path::exports_(&derive.knot);

    let default_node = if derive.attrs.default.is_some() {
        quote!(#exports_::opaque_default_node::<Self>)
    } else {
        quote!(#exports_::null_node)
    };

    quote! {
        #info_::TypeInfo::Primitive(#info_::PrimitiveInfo::new::<Self>(
            #exports_::opaque_from_node::<Self>,
            #default_node,
        ))
    }
}

/// Generates the `Primitive` impl of an opaque type.
pub(crate) fn impl_primitive(derive: &ReflectDerive) -> TokenStream {
    let knot = &derive.knot;
    let ops_ = crate::path::ops_(knot);
    let exports_ = crate::path::exports_(knot);
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.impl_generics();

    quote! {
        impl #impl_generics #ops_::Primitive for #ident #ty_generics #where_clause {
            #[inline]
            fn to_node(&self) -> ::core::result::Result<#exports_::serde_json::Value, #ops_::ConvertError> {
                #exports_::opaque_to_node(self)
            }
        }
    }
}
