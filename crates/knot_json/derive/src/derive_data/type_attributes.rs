use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, Ident, LitStr};

use crate::KNOT_ATTRIBUTE_NAME;
use crate::utils::{self, NamingAttr};

/// `constructor(func(field, ...), designated, private)`.
pub(crate) struct ConstructorAttr {
    pub func: Ident,
    pub params: Vec<Ident>,
    pub designated: bool,
    pub private: bool,
}

/// Type level `#[knot(...)]` attributes.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub naming: Option<NamingAttr>,
    /// `default`: a public default constructor through `Default`.
    pub default: Option<Span>,
    pub private_default: Option<Span>,
    pub constructors: Vec<ConstructorAttr>,
    pub is_reference: Option<bool>,
    pub missing_member: Option<Ident>,
    pub creation_handling: Option<Ident>,
    pub auto_register: Option<Span>,
    pub opaque: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(KNOT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        this.validity()?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.get_ident().map_or_else(Span::call_site, Ident::span);
        if meta.path.is_ident("type_path") {
            self.type_path = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("rename_all") {
            let case = utils::parse_variant(&meta, utils::NAME_CASES)?;
            self.naming = Some(NamingAttr::from_case(case));
        } else if meta.path.is_ident("naming") {
            self.naming = Some(NamingAttr::parse(&meta)?);
        } else if meta.path.is_ident("default") {
            self.default = Some(span);
        } else if meta.path.is_ident("private_default") {
            self.private_default = Some(span);
        } else if meta.path.is_ident("constructor") {
            self.constructors.push(parse_constructor(&meta)?);
        } else if meta.path.is_ident("is_reference") {
            self.is_reference = Some(utils::parse_flag(&meta)?);
        } else if meta.path.is_ident("missing_member") {
            self.missing_member = Some(utils::parse_variant(&meta, utils::MISSING_MEMBER_HANDLING)?);
        } else if meta.path.is_ident("creation_handling") {
            self.creation_handling =
                Some(utils::parse_variant(&meta, utils::OBJECT_CREATION_HANDLING)?);
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(span);
        } else if meta.path.is_ident("opaque") {
            self.opaque = Some(span);
        } else {
            return Err(meta.error("unknown `knot` type attribute"));
        }
        Ok(())
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(_), Some(span)) = (self.default, self.private_default) {
            return Err(syn::Error::new(
                span,
                "`default` and `private_default` cannot be combined",
            ));
        }
        if let Some(span) = self.opaque
            && (!self.constructors.is_empty() || self.naming.is_some())
        {
            return Err(syn::Error::new(
                span,
                "opaque types have no members, constructors or naming",
            ));
        }
        Ok(())
    }

    /// `.with_attributes(ObjectAttributes::new()...)`, or nothing.
    pub fn object_attributes_tokens(&self, knot: &syn::Path) -> TokenStream {
        let info_ = crate::path::info_(knot);
        let settings_ = crate::path::settings_(knot);

        let mut builders = Vec::new();
        if let Some(naming) = &self.naming {
            let naming = naming.to_tokens(knot);
            builders.push(quote!(.with_naming(#naming)));
        }
        if let Some(is_reference) = self.is_reference {
            builders.push(quote!(.with_is_reference(#is_reference)));
        }
        if let Some(variant) = &self.missing_member {
            builders.push(quote!(.with_missing_member_handling(#settings_::MissingMemberHandling::#variant)));
        }
        if let Some(variant) = &self.creation_handling {
            builders.push(quote!(.with_object_creation_handling(#settings_::ObjectCreationHandling::#variant)));
        }

        if builders.is_empty() {
            return utils::empty();
        }
        quote! {
            .with_attributes(#info_::ObjectAttributes::new() #(#builders)*)
        }
    }
}

fn parse_constructor(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<ConstructorAttr> {
    let mut func = None;
    let mut params = Vec::new();
    let mut designated = false;
    let mut private = false;

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("designated") {
            designated = true;
        } else if inner.path.is_ident("private") {
            private = true;
        } else {
            if func.is_some() {
                return Err(inner.error("a constructor names one function"));
            }
            let ident = inner
                .path
                .get_ident()
                .cloned()
                .ok_or_else(|| inner.error("expected a function name"))?;
            func = Some(ident);
            if !inner.input.is_empty() && !inner.input.peek(syn::Token![,]) {
                inner.parse_nested_meta(|param| {
                    let ident = param
                        .path
                        .get_ident()
                        .cloned()
                        .ok_or_else(|| param.error("expected a field name"))?;
                    params.push(ident);
                    Ok(())
                })?;
            }
        }
        Ok(())
    })?;

    let func = func.ok_or_else(|| meta.error("expected `constructor(func(field, ...))`"))?;
    Ok(ConstructorAttr {
        func,
        params,
        designated,
        private,
    })
}
