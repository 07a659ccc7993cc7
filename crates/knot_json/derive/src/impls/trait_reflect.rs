use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectDerive, ReflectKind};

/// Generates the `Reflect` impl; the views point at the `Object` or
/// `Primitive` impl of the same type.
pub(crate) fn impl_trait_reflect(derive: &ReflectDerive) -> TokenStream {
    let knot = &derive.knot;
    let reflect_ = crate::path::reflect_(knot);
    let ops_ = crate::path::ops_(knot);
    let box_ = crate::path::box_(knot);
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.impl_generics();

    let kind = match derive.kind {
        ReflectKind::Object(_) => quote!(Object),
        ReflectKind::Opaque => quote!(Primitive),
    };

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn as_reflect(&self) -> &dyn #reflect_ {
                self
            }

            #[inline]
            fn as_reflect_mut(&mut self) -> &mut dyn #reflect_ {
                self
            }

            #[inline]
            fn into_reflect(self: #box_<Self>) -> #box_<dyn #reflect_> {
                self
            }

            fn set(&mut self, value: #box_<dyn #reflect_>) -> ::core::result::Result<(), #box_<dyn #reflect_>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_ref(&self) -> #ops_::ReflectRef<'_> {
                #ops_::ReflectRef::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #ops_::ReflectMut<'_> {
                #ops_::ReflectMut::#kind(self)
            }
        }
    }
}
