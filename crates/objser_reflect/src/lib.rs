#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `::objser_reflect::...` paths, this alias lets the
// crate's own tests and doc tests use the same paths.
extern crate self as objser_reflect;

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod binary;
mod impls;
pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use access::{Field, Reflect, Typed};
pub use objser_reflect_derive as derive;
