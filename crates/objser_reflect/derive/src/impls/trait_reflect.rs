use proc_macro2::TokenStream;
use quote::quote;

use super::where_clause_with_field_bounds;
use crate::derive_data::ReflectStruct;

/// Generate `Reflect` implementation.
pub(crate) fn impl_trait_reflect(info: &ReflectStruct) -> TokenStream {
    let objser_reflect_path = info.objser_reflect_path();
    let ident = info.ident();
    let (impl_generics, ty_generics, _) = info.generics().split_for_impl();
    let where_clause = where_clause_with_field_bounds(info);

    quote! {
        impl #impl_generics #objser_reflect_path::Reflect for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_path(&self) -> &'static str {
                <Self as #objser_reflect_path::Typed>::type_path()
            }
        }
    }
}
