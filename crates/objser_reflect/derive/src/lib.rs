//! See [`Reflect`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Member Registration Derivation
///
/// `#[derive(Reflect)]` implements the following traits for a struct:
///
/// - `Reflect`
/// - `Typed`, declaring every field as a member in declaration order
/// - `Field`, so the struct can be nested in other types
///
/// Named structs use the field names as member names, tuple structs use
/// the field indices (`"0"`, `"1"` ...).
///
/// ## Type attributes
///
/// ### Default constructor
///
/// Reading a value starts from a default instance. Types without the
/// `default` flag are rejected when their descriptor is built.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Foo { /* ... */ }
/// ```
///
/// ### Custom Type Path
///
/// The type path defaults to `module_path!()::Ident`. It only appears in
/// diagnostics and lookups, never on the wire.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(type_path = "player::Track")]
/// struct Foo { /* ... */ }
/// ```
///
/// ### Auto Register
///
/// Requires the `auto_register` feature, ignored otherwise. Not available
/// for generic types.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default, auto_register)]
/// struct Foo { /* ... */ }
/// ```
///
/// ## Field attributes
///
/// - `#[reflect(ignore)]`: the field is not declared at all and keeps its
///   default value when reading.
/// - `#[reflect(readonly)]`: the field is declared without a setter and so
///   is left out of the encoding.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Foo {
///     name: String,
///     #[reflect(ignore)]
///     cache: Vec<u8>,
///     #[reflect(readonly)]
///     revision: u32,
/// }
/// ```
///
/// ## Generics
///
/// Every type parameter gets a `Field` bound. Lifetime parameters are not
/// supported.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectStruct::from_input(&ast) {
        Ok(info) => impls::impl_struct(&info).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
