//! Type layout information used by the binary codec.
//!
//! ## Menu
//!
//! - [`Shape`]: the shape a Rust type *declares* for itself through [`Field::shape`].
//!   Shapes may be unsupported (maps, trait objects, nullable value types ...).
//! - [`ValueKind`]: the classified, supported encoding of a member.
//!   Produced from a [`Shape`] when a [`TypeDescriptor`] is built.
//! - [`PrimitiveKind`]: the fixed set of primitive encodings.
//! - [`TypeDescriptor`]: ordered member list plus a default constructor for one type.
//! - [`MemberDescriptor`]: one member, its [`ValueKind`] and its accessors.
//!
//! Descriptors are never built directly, see [`TypeRegistryArc::get_or_build`].
//!
//! [`Field::shape`]: crate::Field::shape
//! [`TypeRegistryArc::get_or_build`]: crate::registry::TypeRegistryArc::get_or_build

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod kind;
mod shape;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::{MemberDescriptor, TypeDescriptor};
pub use kind::{PrimitiveKind, ValueKind};
pub use shape::{ObjectShape, Shape};

pub(crate) use descriptor::{Getter, Setter};
