use proc_macro2::TokenStream;

use crate::derive_data::ReflectStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(info: &ReflectStruct) -> syn::Result<TokenStream> {
    use quote::quote_spanned;

    let Some(span) = info.attrs().auto_register else {
        return Ok(crate::path::empty());
    };

    if info.is_generic() {
        return Err(syn::Error::new(
            span,
            "`auto_register` is not available for generic types",
        ));
    }

    let auto_register_ = crate::path::auto_register_(info.objser_reflect_path());
    let ident = info.ident();

    Ok(quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    })
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectStruct) -> syn::Result<TokenStream> {
    Ok(crate::path::empty())
}
