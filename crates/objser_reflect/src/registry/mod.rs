//! The type descriptor cache.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: stores built [`TypeDescriptor`]s keyed by [`TypeId`].
//! - [`TypeRegistryArc`]: the shared, lock-protected handle that builds them.
//! - [`ClassificationError`]: a member type the binary codec cannot express.
//!
//! ## Building
//!
//! A descriptor is built the first time a type is met:
//!
//! 1. ask the type for its declared members through [`Typed::describe`];
//! 2. drop members lacking a getter or a setter;
//! 3. classify every remaining member's [`Shape`] into a [`ValueKind`],
//!    building nested object descriptors on the way.
//!
//! The read lock is tried first. Building runs without any lock held, the
//! result is inserted under the write lock and an existing entry always wins.
//!
//! ## auto_register
//!
//! See [`TypeRegistryArc::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//!
//! [`TypeDescriptor`]: crate::info::TypeDescriptor
//! [`TypeId`]: core::any::TypeId
//! [`Typed::describe`]: crate::Typed::describe
//! [`Shape`]: crate::info::Shape
//! [`ValueKind`]: crate::info::ValueKind
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod build;
mod error;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use error::{ClassificationError, ClassificationFault};
pub use type_registry::{TypeRegistry, TypeRegistryArc};

pub(crate) use build::{BuildStack, build_descriptor};
