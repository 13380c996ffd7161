use core::any::type_name;

use std::collections::{BTreeMap, HashMap};

use crate::access::{Value, ValueError, ValueRef};
use crate::info::Shape;
use crate::{Field, Reflect};

// -----------------------------------------------------------------------------
// Option

impl<T: Field> Field for Option<T> {
    #[inline]
    fn shape() -> Shape {
        Shape::Nullable(T::shape)
    }

    #[inline]
    fn as_value(&self) -> ValueRef<'_> {
        match self {
            Some(value) => value.as_value(),
            None => ValueRef::Null,
        }
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Field> Field for Vec<T> {
    #[inline]
    fn shape() -> Shape {
        Shape::Sequence(T::shape)
    }

    #[inline]
    fn as_value(&self) -> ValueRef<'_> {
        ValueRef::Sequence(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            Value::Null => Err(ValueError::UnexpectedNull),
            other => Err(ValueError::KindMismatch {
                expected: "sequence",
                found: other.kind_name(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Unsupported shapes

macro_rules! impl_unsupported_field {
    ($shape:ident, [$($generics:tt)*], $ty:ty) => {
        impl<$($generics)*> Field for $ty {
            #[inline]
            fn shape() -> Shape {
                Shape::$shape(type_name::<Self>())
            }

            #[inline]
            fn as_value(&self) -> ValueRef<'_> {
                ValueRef::Unsupported(type_name::<Self>())
            }

            #[inline]
            fn from_value(_: Value) -> Result<Self, ValueError> {
                Err(ValueError::Unsupported {
                    type_name: type_name::<Self>(),
                })
            }
        }
    };
}

impl_unsupported_field!(
    Map,
    [K: Send + Sync + 'static, V: Send + Sync + 'static, S: Send + Sync + 'static],
    HashMap<K, V, S>
);
impl_unsupported_field!(
    Map,
    [K: Send + Sync + 'static, V: Send + Sync + 'static, S: Send + Sync + 'static],
    objser_utils::hash::hashbrown::HashMap<K, V, S>
);
impl_unsupported_field!(
    Map,
    [K: Send + Sync + 'static, V: Send + Sync + 'static],
    BTreeMap<K, V>
);
impl_unsupported_field!(Dynamic, [], Box<dyn Reflect>);
