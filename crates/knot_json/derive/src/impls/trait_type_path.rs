use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

/// `type_path = "..."`, or `module_path!() :: Ident`.
fn base_path(derive: &ReflectDerive) -> TokenStream {
    match &derive.attrs.type_path {
        Some(path) => quote!(#path),
        None => {
            let ident = derive.ident.to_string();
            quote!(::core::concat!(::core::module_path!(), "::", #ident))
        }
    }
}

/// The last segment of [`base_path`].
fn base_name(derive: &ReflectDerive) -> String {
    match &derive.attrs.type_path {
        Some(path) => {
            let path = path.value();
            match path.rsplit_once("::") {
                Some((_, name)) => name.to_owned(),
                None => path,
            }
        }
        None => derive.ident.to_string(),
    }
}

/// Generates the `TypePath` impl. Generic types append their parameters and
/// cache the result per instantiation.
pub(crate) fn impl_trait_type_path(derive: &ReflectDerive) -> TokenStream {
    let knot = &derive.knot;
    let info_ = crate::path::info_(knot);
    let exports_ = crate::path::exports_(knot);
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.impl_generics();

    let path = base_path(derive);
    let name = base_name(derive);

    let (type_path, type_name, inline_flag) = if derive.is_generic() {
        let params: Vec<_> = derive.type_params().collect();
        (
            quote! {
                static CELL: #info_::GenericTypePathCell = #info_::GenericTypePathCell::new();
                CELL.get_or_insert_str::<Self>(|| {
                    #exports_::generic_path(#path, &[#(<#params as #info_::TypePath>::type_path()),*])
                })
            },
            quote! {
                static CELL: #info_::GenericTypePathCell = #info_::GenericTypePathCell::new();
                CELL.get_or_insert_str::<Self>(|| {
                    #exports_::generic_path(#name, &[#(<#params as #info_::TypePath>::type_name()),*])
                })
            },
            crate::utils::empty(),
        )
    } else {
        (quote!(#path), quote!(#name), quote!(#[inline]))
    };

    quote! {
        impl #impl_generics #info_::TypePath for #ident #ty_generics #where_clause {
            #inline_flag
            fn type_path() -> &'static str {
                #type_path
            }

            #inline_flag
            fn type_name() -> &'static str {
                #type_name
            }
        }
    }
}
