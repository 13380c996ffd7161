use proc_macro2::TokenStream;
use quote::quote;

use super::where_clause_with_field_bounds;
use crate::derive_data::ReflectStruct;

/// Generate `Field` implementation, a derived struct nests as an object.
pub(crate) fn impl_trait_field(info: &ReflectStruct) -> TokenStream {
    let objser_reflect_path = info.objser_reflect_path();
    let shape_ = crate::path::shape_(objser_reflect_path);
    let value_ = crate::path::value_(objser_reflect_path);
    let value_ref_ = crate::path::value_ref_(objser_reflect_path);
    let value_error_ = crate::path::value_error_(objser_reflect_path);
    let ident = info.ident();
    let (impl_generics, ty_generics, _) = info.generics().split_for_impl();
    let where_clause = where_clause_with_field_bounds(info);

    quote! {
        impl #impl_generics #objser_reflect_path::Field for #ident #ty_generics #where_clause {
            #[inline]
            fn shape() -> #shape_ {
                #shape_::object::<Self>()
            }

            #[inline]
            fn as_value(&self) -> #value_ref_<'_> {
                #value_ref_::Object(self)
            }

            #[inline]
            fn from_value(value: #value_) -> ::core::result::Result<Self, #value_error_> {
                #value_::into_object::<Self>(value)
            }
        }
    }
}
