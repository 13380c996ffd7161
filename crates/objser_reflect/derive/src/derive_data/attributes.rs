use proc_macro2::Span;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes of `#[reflect(...)]` on the type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `#[reflect(default)]`, the type implements `Default`.
    pub default: Option<Span>,
    /// `#[reflect(type_path = "...")]`
    pub type_path: Option<LitStr>,
    /// `#[reflect(auto_register)]`
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    check_duplicate(this.default.is_some(), &meta)?;
                    this.default = Some(meta.path.require_ident()?.span());
                    Ok(())
                } else if meta.path.is_ident("type_path") {
                    check_duplicate(this.type_path.is_some(), &meta)?;
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "`type_path` cannot be empty"));
                    }
                    this.type_path = Some(lit);
                    Ok(())
                } else if meta.path.is_ident("auto_register") {
                    check_duplicate(this.auto_register.is_some(), &meta)?;
                    this.auto_register = Some(meta.path.require_ident()?.span());
                    Ok(())
                } else {
                    Err(meta.error(
                        "unknown type attribute, expected `default`, `type_path` or `auto_register`",
                    ))
                }
            })?;
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes of `#[reflect(...)]` on a field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    /// `#[reflect(ignore)]`, the field is not declared.
    pub ignore: Option<Span>,
    /// `#[reflect(readonly)]`, the field is declared without a setter.
    pub readonly: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    check_duplicate(this.ignore.is_some(), &meta)?;
                    this.ignore = Some(meta.path.require_ident()?.span());
                    Ok(())
                } else if meta.path.is_ident("readonly") {
                    check_duplicate(this.readonly.is_some(), &meta)?;
                    this.readonly = Some(meta.path.require_ident()?.span());
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute, expected `ignore` or `readonly`"))
                }
            })?;
        }

        if let (Some(_), Some(span)) = (this.ignore, this.readonly) {
            return Err(syn::Error::new(
                span,
                "`readonly` has no effect on an ignored field",
            ));
        }

        Ok(this)
    }
}

fn check_duplicate(exists: bool, meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if exists {
        Err(meta.error("duplicate attribute"))
    } else {
        Ok(())
    }
}
