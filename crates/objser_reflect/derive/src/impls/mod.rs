//! Code generation for `#[derive(Reflect)]`.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_field;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;
use syn::{WhereClause, parse_quote};

use auto_register::get_auto_register_impl;
use trait_field::impl_trait_field;
use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;

use crate::derive_data::ReflectStruct;

/// Implement `Reflect`, `Typed` and `Field` for a struct type.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let reflect_trait_tokens = impl_trait_reflect(info);
    let typed_trait_tokens = impl_trait_typed(info);
    let field_trait_tokens = impl_trait_field(info);
    let auto_register_tokens = match get_auto_register_impl(info) {
        Ok(tokens) => tokens,
        Err(err) => err.into_compile_error(),
    };

    quote! {
        #reflect_trait_tokens

        #typed_trait_tokens

        #field_trait_tokens

        #auto_register_tokens
    }
}

/// The where clause of every generated impl, each type parameter is a `Field`.
pub(crate) fn where_clause_with_field_bounds(info: &ReflectStruct) -> WhereClause {
    let objser_reflect_path = info.objser_reflect_path();
    let generics = info.generics();

    let mut where_clause = generics
        .where_clause
        .clone()
        .unwrap_or_else(|| parse_quote!(where));

    for param in generics.type_params() {
        let ident = &param.ident;
        where_clause
            .predicates
            .push(parse_quote!(#ident: #objser_reflect_path::Field));
    }

    // The constructor of a generic type only exists where its `Default` impl does.
    if info.attrs().default.is_some() && info.is_generic() {
        where_clause
            .predicates
            .push(parse_quote!(Self: ::core::default::Default));
    }

    where_clause
}
