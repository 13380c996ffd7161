use core::any::Any;
use core::fmt;

use crate::access::MemberList;

// -----------------------------------------------------------------------------
// Reflect

/// An object-safe handle on a serializable value.
///
/// Getters and setters stored in a [`TypeDescriptor`] receive instances as
/// `&dyn Reflect` and downcast them back to the concrete type.
///
/// It's strongly recommended to use [the derive macro](crate::derive::Reflect)
/// rather than implementing this trait by hand.
///
/// [`TypeDescriptor`]: crate::info::TypeDescriptor
pub trait Reflect: Any + Send + Sync {
    /// Returns the type path of the underlying type, used in diagnostics.
    fn reflect_type_path(&self) -> &'static str;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref::<T>(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut::<T>(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            <Box<dyn Any>>::downcast::<T>(self).map_err(|_| unreachable!("type checked above"))
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_path())
    }
}

// -----------------------------------------------------------------------------
// Typed

/// A type with a statically known, ordered member layout.
///
/// `describe` is called once per registry when the type's descriptor is
/// built. Members are encoded in the order they are declared.
pub trait Typed: Reflect + Sized {
    /// Returns the stable type path, e.g. `my_crate::player::Track`.
    fn type_path() -> &'static str;

    /// Declares the members of this type.
    fn describe(members: &mut MemberList<Self>);

    /// Returns the default constructor used when reading.
    ///
    /// Types returning `None` are rejected when their descriptor is built.
    #[inline]
    fn constructor() -> Option<fn() -> Self> {
        None
    }
}
