use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use super::where_clause_with_field_bounds;
use crate::derive_data::ReflectStruct;

/// Generate `Typed` implementation.
pub(crate) fn impl_trait_typed(info: &ReflectStruct) -> TokenStream {
    let objser_reflect_path = info.objser_reflect_path();
    let member_list_ = crate::path::member_list_(objser_reflect_path);
    let ident = info.ident();
    let (impl_generics, ty_generics, _) = info.generics().split_for_impl();
    let where_clause = where_clause_with_field_bounds(info);

    let type_path_tokens = match &info.attrs().type_path {
        Some(lit) => quote!(#lit),
        None if info.is_generic() => quote!(::core::any::type_name::<Self>()),
        None => {
            let name = ident.to_string();
            quote!(::core::concat!(::core::module_path!(), "::", #name))
        }
    };

    let declarations = info.active_fields().map(|field| {
        let member = &field.member;
        let name = &field.name;
        let ty = field.ty;
        if let Some(span) = field.attrs.readonly {
            quote_spanned! { span =>
                members.readonly::<#ty>(#name, |v| &v.#member);
            }
        } else {
            quote! {
                members.field::<#ty>(#name, |v| &v.#member, |v| &mut v.#member);
            }
        }
    });

    let constructor_tokens = match info.attrs().default {
        Some(span) => quote_spanned! { span =>
            #[inline]
            fn constructor() -> ::core::option::Option<fn() -> Self> {
                ::core::option::Option::Some(<Self as ::core::default::Default>::default)
            }
        },
        None => crate::path::empty(),
    };

    quote! {
        impl #impl_generics #objser_reflect_path::Typed for #ident #ty_generics #where_clause {
            #[inline]
            fn type_path() -> &'static str {
                #type_path_tokens
            }

            #[allow(unused_variables)]
            fn describe(members: &mut #member_list_<Self>) {
                #(#declarations)*
            }

            #constructor_tokens
        }
    }
}
