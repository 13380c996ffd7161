//! [`Field`](crate::Field) implementations for foreign types.
//!
//! ## Implemented Menu
//!
//! - primitive:
//!     - `bool`, `i8`-`i64`, `u8`-`u64`, `f32`, `f64`
//!     - `String`, [`ByteBuf`](crate::access::ByteBuf)
//!     - `uuid::Uuid`, `chrono::DateTime<Utc>`
//! - container:
//!     - `Option<T>`, `Vec<T>`
//! - declared but rejected at classification:
//!     - `HashMap<K, V>`, `BTreeMap<K, V>`, `hashbrown::HashMap<K, V>`
//!     - `Box<dyn Reflect>`

// -----------------------------------------------------------------------------
// Modules

mod container;
mod primitive;
