use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Member, Type};

use super::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// StructField

/// One field of the derived struct.
pub(crate) struct StructField<'a> {
    pub member: Member,
    pub name: LitStr,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// The parsed input of `#[derive(Reflect)]`.
pub(crate) struct ReflectStruct<'a> {
    objser_reflect_path: syn::Path,
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &ast.data else {
            return Err(syn::Error::new(
                ast.ident.span(),
                "`#[derive(Reflect)]` only supports structs",
            ));
        };

        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "lifetime parameters are not supported, reflected types must be `'static`",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let fields = match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            Fields::Unnamed(fields) => fields.unnamed.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
        };

        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(index, field)| {
                let (member, name) = match &field.ident {
                    Some(ident) => (
                        Member::Named(ident.clone()),
                        LitStr::new(&ident.to_string(), ident.span()),
                    ),
                    None => (
                        Member::Unnamed(syn::Index {
                            index: index as u32,
                            span: field.span(),
                        }),
                        LitStr::new(&index.to_string(), field.span()),
                    ),
                };
                Ok(StructField {
                    member,
                    name,
                    ty: &field.ty,
                    attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            objser_reflect_path: crate::path::objser_reflect(),
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            fields,
        })
    }

    #[inline]
    pub fn objser_reflect_path(&self) -> &syn::Path {
        &self.objser_reflect_path
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn generics(&self) -> &Generics {
        self.generics
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    /// Fields not marked `#[reflect(ignore)]`, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.attrs.ignore.is_none())
    }

    /// Whether the type has type or const parameters.
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }
}
