//! Parsed form of a `#[derive(Reflect)]` input.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::FieldAttributes;
pub(crate) use type_attributes::{ConstructorAttr, TypeAttributes};

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Type};

/// A named field that takes part in reflection.
pub(crate) struct ReflectField {
    pub ident: Ident,
    pub ty: Type,
    pub attrs: FieldAttributes,
}

/// The shape the derive generates code for.
pub(crate) enum ReflectKind {
    /// A struct with named fields; skipped fields are left out.
    Object(Vec<ReflectField>),
    /// Any type carried through its `serde` impls.
    Opaque,
}

pub(crate) struct ReflectDerive<'a> {
    pub knot: syn::Path,
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub kind: ReflectKind,
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        if let Some(param) = input.generics.params.iter().find_map(|param| match param {
            GenericParam::Type(_) => None,
            other => Some(other),
        }) {
            return Err(syn::Error::new_spanned(
                param,
                "only type parameters are supported; reflected types are `'static`",
            ));
        }

        if let Some(span) = attrs.auto_register
            && !input.generics.params.is_empty()
        {
            return Err(syn::Error::new(
                span,
                "generic types are registered per instantiation with `TypeRegistry::register`",
            ));
        }

        let kind = if attrs.opaque.is_some() {
            ReflectKind::Opaque
        } else {
            match &input.data {
                Data::Struct(data) => match &data.fields {
                    Fields::Named(fields) => {
                        let mut out = Vec::with_capacity(fields.named.len());
                        for field in &fields.named {
                            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
                            if field_attrs.skip {
                                continue;
                            }
                            out.push(ReflectField {
                                ident: field.ident.clone().ok_or_else(|| {
                                    syn::Error::new_spanned(field, "expected a named field")
                                })?,
                                ty: field.ty.clone(),
                                attrs: field_attrs,
                            });
                        }
                        ReflectKind::Object(out)
                    }
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &input.ident,
                            "tuple and unit structs are reflected with `#[knot(opaque)]`",
                        ));
                    }
                },
                _ => {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "enums and unions are reflected with `#[knot(opaque)]`",
                    ));
                }
            }
        };

        let this = Self {
            knot: crate::path::knot_json(),
            ident: &input.ident,
            generics: &input.generics,
            attrs,
            kind,
        };
        this.check_constructors()?;
        Ok(this)
    }

    fn check_constructors(&self) -> syn::Result<()> {
        for constructor in &self.attrs.constructors {
            for param in &constructor.params {
                if self.field(param).is_none() {
                    return Err(syn::Error::new_spanned(
                        param,
                        "constructor parameters must name reflected fields",
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn fields(&self) -> &[ReflectField] {
        match &self.kind {
            ReflectKind::Object(fields) => fields,
            ReflectKind::Opaque => &[],
        }
    }

    pub fn field(&self, ident: &Ident) -> Option<&ReflectField> {
        self.fields().iter().find(|field| field.ident == *ident)
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    pub fn type_params(&self) -> impl Iterator<Item = &Ident> + '_ {
        self.generics.type_params().map(|param| &param.ident)
    }

    /// The generics of every generated impl: each type parameter must itself
    /// be reflected.
    pub fn impl_generics(&self) -> (TokenStream, TokenStream, TokenStream) {
        let knot = &self.knot;
        let info_ = crate::path::info_(knot);
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut predicates: Vec<TokenStream> = where_clause
            .map(|clause| clause.predicates.iter().map(|p| quote!(#p)).collect())
            .unwrap_or_default();
        for param in self.type_params() {
            predicates.push(quote!(#param: #knot::Reflect + #info_::Typed));
        }
        if let ReflectKind::Opaque = self.kind
            && self.is_generic()
        {
            let serde_ = quote!(#knot::__macro_exports::serde);
            predicates.push(quote!(Self: #serde_::Serialize + #serde_::de::DeserializeOwned));
        }

        let where_clause = if predicates.is_empty() {
            TokenStream::new()
        } else {
            quote!(where #(#predicates,)*)
        };
        (quote!(#impl_generics), quote!(#ty_generics), where_clause)
    }
}
