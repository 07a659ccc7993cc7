use proc_macro2::TokenStream;

use crate::derive_data::ReflectDerive;

/// Submits the type to the link time registration list.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(derive: &ReflectDerive) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = derive.attrs.auto_register else {
        return crate::utils::empty();
    };

    // Generic types are rejected while parsing.
    let auto_register_ = crate::path::auto_register_(&derive.knot);
    let ident = derive.ident;

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegistration(#auto_register_::register::<#ident>)
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectDerive) -> TokenStream {
    crate::utils::empty()
}
