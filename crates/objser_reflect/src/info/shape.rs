use core::any::TypeId;
use core::fmt;

use std::sync::Arc;

use crate::Typed;
use crate::info::{PrimitiveKind, TypeDescriptor};
use crate::registry::{BuildStack, ClassificationError, TypeRegistryArc};

// -----------------------------------------------------------------------------
// Shape

/// The declared shape of a member type.
///
/// A shape is what a type says about itself; it is *not* yet known to be
/// encodable. The registry classifies shapes into [`ValueKind`]s and rejects
/// the ones the wire format cannot express:
///
/// - [`Shape::Map`]: keyed containers, only single-element sequences are supported.
/// - [`Shape::Dynamic`]: trait objects, the reader could not pick a concrete type.
/// - [`Shape::Nullable`] around a fixed-width primitive or around another `Nullable`.
///
/// Nested shapes are stored as function pointers so that recursive types
/// can declare themselves without infinite recursion.
///
/// [`ValueKind`]: crate::info::ValueKind
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Primitive(PrimitiveKind),
    Object(ObjectShape),
    /// Homogeneous sequence with the given element shape.
    Sequence(fn() -> Shape),
    /// `Option<T>` of the given inner shape.
    Nullable(fn() -> Shape),
    /// Keyed container, carries the type name.
    Map(&'static str),
    /// Trait object, carries the type name.
    Dynamic(&'static str),
}

impl Shape {
    /// Shorthand for [`Shape::Object`] of `T`.
    #[inline]
    pub fn object<T: Typed>() -> Self {
        Self::Object(ObjectShape::of::<T>())
    }
}

// -----------------------------------------------------------------------------
// ObjectShape

pub(crate) type BuildFn =
    fn(&TypeRegistryArc, &mut BuildStack) -> Result<Arc<TypeDescriptor>, ClassificationError>;

/// The shape of a nested object: its identity plus a way to build its descriptor.
#[derive(Clone, Copy)]
pub struct ObjectShape {
    type_id: TypeId,
    type_path: fn() -> &'static str,
    build: BuildFn,
}

impl ObjectShape {
    /// Creates the shape of object type `T`.
    pub fn of<T: Typed>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path,
            build: crate::registry::build_descriptor::<T>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline]
    pub(crate) fn build(
        &self,
        registry: &TypeRegistryArc,
        stack: &mut BuildStack,
    ) -> Result<Arc<TypeDescriptor>, ClassificationError> {
        (self.build)(registry, stack)
    }
}

impl fmt::Debug for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectShape").field(&self.type_path()).finish()
    }
}
