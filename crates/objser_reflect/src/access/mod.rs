//! Typed and type-erased access to serializable values.
//!
//! The binary codec never sees a concrete Rust type. It walks values through
//! three small traits:
//!
//! - [`Reflect`]: an object-safe handle on any registered value, used as
//!   `&dyn Reflect` by member getters and setters.
//! - [`Typed`]: a type that declares its members through [`MemberList`].
//!   This is what [`#[derive(Reflect)]`](crate::derive::Reflect) generates.
//! - [`Field`]: a type that may appear as a member. It declares its [`Shape`]
//!   and converts itself to a borrowed [`ValueRef`] and from an owned [`Value`].
//!
//! # Examples
//!
//! Registration without the derive macro:
//!
//! ```
//! use objser_reflect::access::{Field, MemberList, Reflect, Typed, Value, ValueError, ValueRef};
//! use objser_reflect::info::Shape;
//! use objser_reflect::registry::TypeRegistryArc;
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Reflect for Point {
//!     fn reflect_type_path(&self) -> &'static str {
//!         Self::type_path()
//!     }
//! }
//!
//! impl Typed for Point {
//!     fn type_path() -> &'static str {
//!         "demo::Point"
//!     }
//!
//!     fn describe(members: &mut MemberList<Self>) {
//!         members
//!             .field("x", |p| &p.x, |p| &mut p.x)
//!             .field("y", |p| &p.y, |p| &mut p.y);
//!     }
//!
//!     fn constructor() -> Option<fn() -> Self> {
//!         Some(Self::default)
//!     }
//! }
//!
//! impl Field for Point {
//!     fn shape() -> Shape {
//!         Shape::object::<Self>()
//!     }
//!
//!     fn as_value(&self) -> ValueRef<'_> {
//!         ValueRef::Object(self)
//!     }
//!
//!     fn from_value(value: Value) -> Result<Self, ValueError> {
//!         value.into_object()
//!     }
//! }
//!
//! let registry = TypeRegistryArc::new();
//! let descriptor = registry.get_or_build::<Point>().unwrap();
//! assert_eq!(descriptor.member_len(), 2);
//! ```
//!
//! [`Shape`]: crate::info::Shape

// -----------------------------------------------------------------------------
// Modules

mod field;
mod members;
mod reflect;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use field::{ByteBuf, Field, Sequence};
pub use members::MemberList;
pub use reflect::{Reflect, Typed};
pub use value::{Value, ValueError, ValueRef};
