use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitStr};

use crate::KNOT_ATTRIBUTE_NAME;
use crate::utils::{self, NamingAttr};

/// Member level `#[knot(...)]` attributes.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub required: Option<Ident>,
    pub default_value: Option<TokenStream>,
    pub param_default: Option<TokenStream>,
    pub default_value_handling: Option<Ident>,
    pub null_value_handling: Option<Ident>,
    pub reference_loop_handling: Option<Ident>,
    pub creation_handling: Option<Ident>,
    pub type_name_handling: Option<Ident>,
    pub is_reference: Option<bool>,
    pub item_is_reference: Option<bool>,
    pub item_reference_loop_handling: Option<Ident>,
    pub item_type_name_handling: Option<Ident>,
    pub order: Option<TokenStream>,
    /// `ReadOnly` or `WriteOnly`.
    pub access: Option<Ident>,
    pub skip: bool,
    pub extension_data: Option<Ident>,
    pub base: bool,
    pub naming: Option<NamingAttr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(KNOT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.span();
        let Some(ident) = meta.path.get_ident().map(ToString::to_string) else {
            return Err(meta.error("unknown `knot` member attribute"));
        };
        match ident.as_str() {
            "rename" => self.rename = Some(meta.value()?.parse()?),
            "required" => {
                self.required = Some(if meta.input.peek(syn::Token![=]) {
                    utils::parse_variant(&meta, utils::REQUIRED)?
                } else {
                    Ident::new("Always", span)
                });
            }
            "default_value" => self.default_value = Some(utils::parse_json_literal(&meta)?),
            "param_default" => self.param_default = Some(utils::parse_json_literal(&meta)?),
            "default_value_handling" => {
                self.default_value_handling =
                    Some(utils::parse_variant(&meta, utils::DEFAULT_VALUE_HANDLING)?);
            }
            "null_value_handling" => {
                self.null_value_handling = Some(utils::parse_variant(&meta, utils::NULL_VALUE_HANDLING)?);
            }
            "reference_loop_handling" => {
                self.reference_loop_handling =
                    Some(utils::parse_variant(&meta, utils::REFERENCE_LOOP_HANDLING)?);
            }
            "creation_handling" => {
                self.creation_handling =
                    Some(utils::parse_variant(&meta, utils::OBJECT_CREATION_HANDLING)?);
            }
            "type_name_handling" => {
                self.type_name_handling = Some(utils::parse_variant(&meta, utils::TYPE_NAME_HANDLING)?);
            }
            "is_reference" => self.is_reference = Some(utils::parse_flag(&meta)?),
            "item_is_reference" => self.item_is_reference = Some(utils::parse_flag(&meta)?),
            "item_reference_loop_handling" => {
                self.item_reference_loop_handling =
                    Some(utils::parse_variant(&meta, utils::REFERENCE_LOOP_HANDLING)?);
            }
            "item_type_name_handling" => {
                self.item_type_name_handling =
                    Some(utils::parse_variant(&meta, utils::TYPE_NAME_HANDLING)?);
            }
            "order" => self.order = Some(utils::parse_json_literal(&meta)?),
            "read_only" => self.set_access(&meta, "ReadOnly")?,
            "write_only" => self.set_access(&meta, "WriteOnly")?,
            "skip" => self.skip = true,
            "extension_data" => {
                self.extension_data = Some(if meta.input.peek(syn::Token![=]) {
                    utils::parse_variant(&meta, utils::EXTENSION_DATA_ACCESS)?
                } else {
                    Ident::new("BOTH", span)
                });
            }
            "base" => self.base = true,
            "naming" => self.naming = Some(NamingAttr::parse(&meta)?),
            _ => return Err(meta.error("unknown `knot` member attribute")),
        }
        Ok(())
    }

    fn set_access(&mut self, meta: &syn::meta::ParseNestedMeta<'_>, access: &str) -> syn::Result<()> {
        if self.access.is_some() {
            return Err(meta.error("`read_only` and `write_only` cannot be combined"));
        }
        self.access = Some(Ident::new(access, meta.path.span()));
        Ok(())
    }

    /// `.with_attributes(MemberAttributes::new()...)`, or nothing.
    pub fn member_attributes_tokens(&self, knot: &syn::Path) -> TokenStream {
        let info_ = crate::path::info_(knot);
        let settings_ = crate::path::settings_(knot);
        let json = quote!(#knot::__macro_exports::serde_json::json);

        let mut builders = Vec::new();
        if let Some(rename) = &self.rename {
            builders.push(quote!(.with_rename(#rename)));
        }
        if let Some(required) = &self.required {
            builders.push(quote!(.with_required(#settings_::Required::#required)));
        }
        if let Some(value) = &self.default_value {
            builders.push(quote!(.with_default_value(#json!(#value))));
        }
        if let Some(value) = &self.param_default {
            builders.push(quote!(.with_param_default(#json!(#value))));
        }
        if let Some(flags) = &self.default_value_handling {
            builders.push(quote!(.with_default_value_handling(#settings_::DefaultValueHandling::#flags)));
        }
        if let Some(variant) = &self.null_value_handling {
            builders.push(quote!(.with_null_value_handling(#settings_::NullValueHandling::#variant)));
        }
        if let Some(variant) = &self.reference_loop_handling {
            builders.push(quote!(.with_reference_loop_handling(#settings_::ReferenceLoopHandling::#variant)));
        }
        if let Some(variant) = &self.creation_handling {
            builders.push(quote!(.with_object_creation_handling(#settings_::ObjectCreationHandling::#variant)));
        }
        if let Some(variant) = &self.type_name_handling {
            builders.push(quote!(.with_type_name_handling(#settings_::TypeNameHandling::#variant)));
        }
        if let Some(value) = self.is_reference {
            builders.push(quote!(.with_is_reference(#value)));
        }
        if let Some(value) = self.item_is_reference {
            builders.push(quote!(.with_item_is_reference(#value)));
        }
        if let Some(variant) = &self.item_reference_loop_handling {
            builders.push(quote!(.with_item_reference_loop_handling(#settings_::ReferenceLoopHandling::#variant)));
        }
        if let Some(variant) = &self.item_type_name_handling {
            builders.push(quote!(.with_item_type_name_handling(#settings_::TypeNameHandling::#variant)));
        }
        if let Some(order) = &self.order {
            builders.push(quote!(.with_order(#order)));
        }
        if let Some(access) = &self.access {
            builders.push(quote!(.with_access(#info_::MemberAccess::#access)));
        }
        if let Some(access) = &self.extension_data {
            builders.push(quote!(.with_extension_data(#info_::ExtensionDataAccess::#access)));
        }
        if self.base {
            builders.push(quote!(.with_base(true)));
        }
        if let Some(naming) = &self.naming {
            let naming = naming.to_tokens(knot);
            builders.push(quote!(.with_naming(#naming)));
        }

        if builders.is_empty() {
            return utils::empty();
        }
        quote! {
            .with_attributes(#info_::MemberAttributes::new() #(#builders)*)
        }
    }
}
