use proc_macro2::{TokenStream, TokenTree};
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{LitStr, Token};

/// An empty token stream.
#[inline(always)]
pub(crate) fn empty() -> TokenStream {
    TokenStream::new()
}

/// Reads `= "literal"` and maps it through `variants` (wire spelling to
/// variant ident), reporting the accepted spellings on mismatch.
pub(crate) fn parse_variant(
    meta: &ParseNestedMeta<'_>,
    variants: &[(&str, &str)],
) -> syn::Result<syn::Ident> {
    let lit: LitStr = meta.value()?.parse()?;
    let value = lit.value();
    match variants.iter().find(|(spelling, _)| *spelling == value) {
        Some((_, variant)) => Ok(syn::Ident::new(variant, lit.span())),
        None => {
            let expected: Vec<String> = variants.iter().map(|(s, _)| format!("`{s}`")).collect();
            Err(syn::Error::new(
                lit.span(),
                format!("expected one of {}", expected.join(", ")),
            ))
        }
    }
}

/// Reads `= <tokens>` up to the next top level comma, for JSON literals
/// handed to `serde_json::json!`.
pub(crate) fn parse_json_literal(meta: &ParseNestedMeta<'_>) -> syn::Result<TokenStream> {
    let input = meta.value()?;
    let mut tokens = TokenStream::new();
    while !input.is_empty() && !input.peek(Token![,]) {
        let tree: TokenTree = input.parse()?;
        tokens.extend([tree]);
    }
    if tokens.is_empty() {
        return Err(meta.error("expected a JSON literal"));
    }
    Ok(tokens)
}

/// Reads an optional `= true | false`; a bare flag means `true`.
pub(crate) fn parse_flag(meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

pub(crate) const NAME_CASES: &[(&str, &str)] = &[
    ("default", "Default"),
    ("camelCase", "CamelCase"),
    ("camel_case", "CamelCase"),
    ("PascalCase", "PascalCase"),
    ("pascal_case", "PascalCase"),
    ("snake_case", "SnakeCase"),
    ("kebab-case", "KebabCase"),
    ("kebab_case", "KebabCase"),
];

pub(crate) const REQUIRED: &[(&str, &str)] = &[
    ("default", "Default"),
    ("allow_null", "AllowNull"),
    ("always", "Always"),
    ("disallow_null", "DisallowNull"),
];

pub(crate) const DEFAULT_VALUE_HANDLING: &[(&str, &str)] = &[
    ("include", "INCLUDE"),
    ("ignore", "IGNORE"),
    ("populate", "POPULATE"),
    ("ignore_and_populate", "IGNORE_AND_POPULATE"),
];

pub(crate) const NULL_VALUE_HANDLING: &[(&str, &str)] = &[("include", "Include"), ("ignore", "Ignore")];

pub(crate) const REFERENCE_LOOP_HANDLING: &[(&str, &str)] = &[
    ("error", "Error"),
    ("ignore", "Ignore"),
    ("serialize", "Serialize"),
];

pub(crate) const OBJECT_CREATION_HANDLING: &[(&str, &str)] =
    &[("auto", "Auto"), ("reuse", "Reuse"), ("replace", "Replace")];

pub(crate) const TYPE_NAME_HANDLING: &[(&str, &str)] = &[
    ("none", "None"),
    ("objects", "Objects"),
    ("arrays", "Arrays"),
    ("all", "All"),
    ("auto", "Auto"),
];

pub(crate) const MISSING_MEMBER_HANDLING: &[(&str, &str)] = &[("ignore", "Ignore"), ("error", "Error")];

pub(crate) const EXTENSION_DATA_ACCESS: &[(&str, &str)] =
    &[("read", "READ"), ("write", "WRITE"), ("both", "BOTH")];

/// `naming(case = "...", override_specified_names, ...)`, rendered as a
/// `NamingStrategy` expression.
#[derive(Default)]
pub(crate) struct NamingAttr {
    case: Option<syn::Ident>,
    override_specified_names: bool,
    process_dictionary_keys: bool,
    process_extension_data_names: bool,
}

impl NamingAttr {
    /// The `rename_all = "..."` shorthand.
    pub fn from_case(case: syn::Ident) -> Self {
        Self {
            case: Some(case),
            ..Self::default()
        }
    }

    pub fn parse(meta: &ParseNestedMeta<'_>) -> syn::Result<Self> {
        let mut naming = Self::default();
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("case") {
                naming.case = Some(parse_variant(&inner, NAME_CASES)?);
            } else if inner.path.is_ident("override_specified_names") {
                naming.override_specified_names = parse_flag(&inner)?;
            } else if inner.path.is_ident("process_dictionary_keys") {
                naming.process_dictionary_keys = parse_flag(&inner)?;
            } else if inner.path.is_ident("process_extension_data_names") {
                naming.process_extension_data_names = parse_flag(&inner)?;
            } else {
                return Err(inner.error("unknown naming option"));
            }
            Ok(())
        })?;
        Ok(naming)
    }

    pub fn to_tokens(&self, knot: &syn::Path) -> TokenStream {
        let naming_ = crate::path::naming_(knot);
        let case = self
            .case
            .clone()
            .unwrap_or_else(|| syn::Ident::new("Default", proc_macro2::Span::call_site()));
        let override_specified_names = self.override_specified_names;
        let process_dictionary_keys = self.process_dictionary_keys;
        let process_extension_data_names = self.process_extension_data_names;
        quote! {
            #naming_::NamingStrategy::new(#naming_::NameCase::#case)
                .with_override_specified_names(#override_specified_names)
                .with_process_dictionary_keys(#process_dictionary_keys)
                .with_process_extension_data_names(#process_extension_data_names)
        }
    }
}
