use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ConstructorAttr, ReflectDerive};

/// The `TypeInfo::Object(...)` expression of a struct.
pub(crate) fn object_info_tokens(derive: &ReflectDerive) -> TokenStream {
    let knot = &derive.knot;
    let info_ = crate::path::info_(knot);
    let box_ = crate::path::box_(knot);

    let members = derive.fields().iter().map(|field| {
        let name = field.ident.to_string();
        let ty = &field.ty;
        let attributes = field.attrs.member_attributes_tokens(knot);
        quote! {
            #info_::MemberInfo::new::<#ty>(#name) #attributes
        }
    });

    let default_constructor = if derive.attrs.default.is_some() {
        quote! {
            .with_default_constructor(#info_::DefaultConstructor::public(
                || #box_::new(<Self as ::core::default::Default>::default())
            ))
        }
    } else if derive.attrs.private_default.is_some() {
        quote! {
            .with_default_constructor(#info_::DefaultConstructor::private(
                || #box_::new(<Self as ::core::default::Default>::default())
            ))
        }
    } else {
        crate::utils::empty()
    };

    let constructors = derive
        .attrs
        .constructors
        .iter()
        .map(|constructor| constructor_tokens(derive, constructor));

    let attributes = derive.attrs.object_attributes_tokens(knot);

    quote! {
        #info_::TypeInfo::Object(
            #info_::ObjectInfo::new::<Self>(&[#(#members),*])
                #default_constructor
                #(#constructors)*
                #attributes
        )
    }
}

/// `.with_constructor(ConstructorInfo::new(...))` for one
/// `constructor(func(...))` attribute.
fn constructor_tokens(derive: &ReflectDerive, constructor: &ConstructorAttr) -> TokenStream {
    let knot = &derive.knot;
    let reflect_ = crate::path::reflect_(knot);
    let info_ = crate::path::info_(knot);
    let exports_ = crate::path::exports_(knot);
    let box_ = crate::path::box_(knot);

    let func = &constructor.func;
    let func_name = func.to_string();

    let mut params = Vec::with_capacity(constructor.params.len());
    let mut arguments = Vec::with_capacity(constructor.params.len());
    for (index, param) in constructor.params.iter().enumerate() {
        // Checked against the fields while parsing.
        let Some(field) = derive.field(param) else {
            continue;
        };
        let ty = &field.ty;
        let name = param.to_string();
        params.push(quote!(#info_::ParamInfo::new::<#ty>(#name)));
        arguments.push(quote!(#exports_::take_argument::<#ty>(&mut args, #index)?));
    }

    let take_args = if arguments.is_empty() {
        quote!(let _ = args;)
    } else {
        quote!(let mut args = args.into_iter();)
    };

    let visibility = if constructor.private {
        quote!(.with_visibility(#info_::Visibility::Private))
    } else {
        crate::utils::empty()
    };
    let designated = if constructor.designated {
        quote!(.with_designated(true))
    } else {
        crate::utils::empty()
    };

    quote! {
        .with_constructor(
            #info_::ConstructorInfo::new(
                #func_name,
                &[#(#params),*],
                |args: #exports_::alloc_utils::Vec<#box_<dyn #reflect_>>| {
                    #take_args
                    ::core::result::Result::Ok(
                        #box_::new(Self::#func(#(#arguments),*)) as #box_<dyn #reflect_>
                    )
                },
            )
            #visibility
            #designated
        )
    }
}

/// Generates the `Object` impl: member indices follow field order, skipped
/// fields excluded.
pub(crate) fn impl_object(derive: &ReflectDerive) -> TokenStream {
    let knot = &derive.knot;
    let reflect_ = crate::path::reflect_(knot);
    let ops_ = crate::path::ops_(knot);
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.impl_generics();

    let fields = derive.fields();
    let len = fields.len();
    let indices = 0..len;
    let indices_mut = 0..len;
    let idents: Vec<_> = fields.iter().map(|field| &field.ident).collect();
    let types: Vec<_> = fields.iter().map(|field| &field.ty).collect();

    quote! {
        impl #impl_generics #ops_::Object for #ident #ty_generics #where_clause {
            fn member(&self, index: usize) -> ::core::option::Option<&dyn #reflect_> {
                match index {
                    #(#indices => ::core::option::Option::Some(<#types as #reflect_>::as_reflect(&self.#idents)),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn member_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #reflect_> {
                match index {
                    #(#indices_mut => ::core::option::Option::Some(<#types as #reflect_>::as_reflect_mut(&mut self.#idents)),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn member_len(&self) -> usize {
                #len
            }
        }
    }
}
