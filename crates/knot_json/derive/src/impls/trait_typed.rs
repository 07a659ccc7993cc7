use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

/// Generates the `Typed` impl around a `TypeInfo` expression.
pub(crate) fn impl_trait_typed(derive: &ReflectDerive, type_info: TokenStream) -> TokenStream {
    let info_ = crate::path::info_(&derive.knot);
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.impl_generics();

    let body = if derive.is_generic() {
        quote! {
            static CELL: #info_::GenericTypeInfoCell = #info_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #type_info)
        }
    } else {
        quote! {
            static CELL: #info_::NonGenericTypeInfoCell = #info_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #type_info)
        }
    };

    quote! {
        impl #impl_generics #info_::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #body
            }
        }
    }
}
