//! The binary object codec.
//!
//! ## Menu
//!
//! - [`Serializer`]: the entry point, `serialize` / `deserialize` any [`Field`] type.
//! - [`primitive`]: the fixed-width and length-prefixed primitive kinds.
//! - [`collection`]: count-prefixed sequences.
//! - [`walker`]: descriptor-driven objects and presence markers.
//! - [`BinaryError`]: everything that can go wrong while encoding or decoding.
//!
//! ## Wire format
//!
//! The format is closed and not self-describing: there is no header, no
//! version and no member names. A reader must use the same type (and so the
//! same descriptor) as the writer.
//!
//! ```text
//! value     := [marker] encoding          marker only for nested objects
//! object    := member*                    declared order
//! sequence  := i32 count, element*        -1 for null
//! string    := i32 len, utf-8 bytes       -1 for null
//! bytes     := i32 len, raw bytes         -1 for null
//! id        := 16 bytes
//! date/time := i64 ticks
//! ```
//!
//! Object identity is not preserved, a shared object is written once per
//! reference.
//!
//! [`Field`]: crate::Field

// -----------------------------------------------------------------------------
// Modules

mod error;
mod serializer;

pub mod collection;
pub mod primitive;
pub mod walker;

// -----------------------------------------------------------------------------
// Exports

pub use error::BinaryError;
pub use serializer::{LOG_TARGET, Limits, Serializer, SerializerBuilder};
