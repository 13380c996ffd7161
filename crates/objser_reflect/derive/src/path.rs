//! Paths into `objser_reflect` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `objser_reflect` crate.
///
/// 1. For crates that depend on `objser_reflect`, `::objser_reflect` is returned.
/// 2. For crates that depend on `objser_core`, `::objser_core::reflect` is returned.
/// 3. For other situations, `::objser_reflect` is returned, but this may be incorrect.
///
/// The cost of this function is relatively high (reading the manifest and
/// taking a lock), so the path is obtained once per derive and passed around.
pub(crate) fn objser_reflect() -> syn::Path {
    objser_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("objser_reflect"))
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(objser_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #objser_reflect_path::__macro_exports::auto_register
    }
}

#[inline(always)]
pub(crate) fn member_list_(objser_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #objser_reflect_path::access::MemberList
    }
}

#[inline(always)]
pub(crate) fn value_(objser_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #objser_reflect_path::access::Value
    }
}

#[inline(always)]
pub(crate) fn value_ref_(objser_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #objser_reflect_path::access::ValueRef
    }
}

#[inline(always)]
pub(crate) fn value_error_(objser_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #objser_reflect_path::access::ValueError
    }
}

#[inline(always)]
pub(crate) fn shape_(objser_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #objser_reflect_path::info::Shape
    }
}

#[inline(always)]
pub(crate) fn empty() -> TokenStream {
    TokenStream::new()
}
