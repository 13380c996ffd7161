use core::ops::{Deref, DerefMut};

use crate::access::{Value, ValueError, ValueRef};
use crate::info::Shape;

// -----------------------------------------------------------------------------
// Field

/// A type that can appear as a member of a [`Typed`](crate::Typed) type.
///
/// Implemented for the primitive kinds, `String`, [`ByteBuf`], `Uuid`,
/// `DateTime<Utc>`, `Option<T>`, `Vec<T>` and every type deriving
/// [`Reflect`](crate::derive::Reflect).
///
/// Some implementations only exist to produce a precise classification error,
/// e.g. `HashMap<K, V>` declares [`Shape::Map`] and is rejected when the
/// owning descriptor is built.
pub trait Field: Send + Sync + Sized + 'static {
    /// Returns the declared shape of this type.
    fn shape() -> Shape;

    /// Borrows `self` as a dynamic value.
    fn as_value(&self) -> ValueRef<'_>;

    /// Converts a dynamic value back into `Self`.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

// -----------------------------------------------------------------------------
// Sequence

/// A homogeneous, ordered sequence of [`Field`] values.
pub trait Sequence: Send + Sync {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`, or `None` if out of bounds.
    fn item(&self, index: usize) -> Option<ValueRef<'_>>;
}

impl<T: Field> Sequence for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn item(&self, index: usize) -> Option<ValueRef<'_>> {
        self.get(index).map(Field::as_value)
    }
}

// -----------------------------------------------------------------------------
// ByteBuf

/// A byte sequence encoded as a single length-prefixed blob.
///
/// `Vec<u8>` is a sequence of `u8` elements and shares the same wire layout,
/// `ByteBuf` only exists to mark the intent and to read the payload in one go.
///
/// ```
/// use objser_reflect::access::ByteBuf;
///
/// let buf = ByteBuf::from(vec![1, 2, 3]);
/// assert_eq!(&buf[..], &[1, 2, 3]);
/// assert_eq!(buf.into_inner(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl ByteBuf {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteBuf {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for ByteBuf {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl Deref for ByteBuf {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ByteBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
