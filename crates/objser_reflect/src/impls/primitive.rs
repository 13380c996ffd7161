use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Field;
use crate::access::{ByteBuf, Value, ValueError, ValueRef};
use crate::info::{PrimitiveKind, Shape};

macro_rules! impl_primitive_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Field for $ty {
            #[inline]
            fn shape() -> Shape {
                Shape::Primitive(PrimitiveKind::$kind)
            }

            #[inline]
            fn as_value(&self) -> ValueRef<'_> {
                ValueRef::$kind(*self)
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::$kind(v) => Ok(v),
                    Value::Null => Err(ValueError::UnexpectedNull),
                    other => Err(ValueError::KindMismatch {
                        expected: PrimitiveKind::$kind.name(),
                        found: other.kind_name(),
                    }),
                }
            }
        }
    )*};
}

impl_primitive_field! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Uuid => Id,
    DateTime<Utc> => DateTime,
}

impl Field for String {
    #[inline]
    fn shape() -> Shape {
        Shape::Primitive(PrimitiveKind::String)
    }

    #[inline]
    fn as_value(&self) -> ValueRef<'_> {
        ValueRef::String(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(v) => Ok(v),
            Value::Null => Err(ValueError::UnexpectedNull),
            other => Err(ValueError::KindMismatch {
                expected: "string",
                found: other.kind_name(),
            }),
        }
    }
}

impl Field for ByteBuf {
    #[inline]
    fn shape() -> Shape {
        Shape::Primitive(PrimitiveKind::Bytes)
    }

    #[inline]
    fn as_value(&self) -> ValueRef<'_> {
        ValueRef::Bytes(&self.0)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(v) => Ok(ByteBuf(v)),
            Value::Null => Err(ValueError::UnexpectedNull),
            other => Err(ValueError::KindMismatch {
                expected: "bytes",
                found: other.kind_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_from_matching_value() {
        assert_eq!(i32::from_value(Value::I32(-7)), Ok(-7));
        assert_eq!(bool::from_value(Value::Bool(true)), Ok(true));
        assert_eq!(
            String::from_value(Value::String("abc".into())),
            Ok(String::from("abc"))
        );
    }

    #[test]
    fn null_into_non_nullable_is_rejected() {
        assert_eq!(u8::from_value(Value::Null), Err(ValueError::UnexpectedNull));
        assert_eq!(String::from_value(Value::Null), Err(ValueError::UnexpectedNull));
        assert_eq!(ByteBuf::from_value(Value::Null), Err(ValueError::UnexpectedNull));
    }

    #[test]
    fn kind_mismatch_names_both_kinds() {
        let err = u16::from_value(Value::I16(1)).unwrap_err();
        assert_eq!(
            err,
            ValueError::KindMismatch {
                expected: "u16",
                found: "i16",
            }
        );
    }

    #[test]
    fn primitive_shapes() {
        assert!(matches!(
            Uuid::shape(),
            Shape::Primitive(PrimitiveKind::Id)
        ));
        assert!(matches!(
            <DateTime<Utc>>::shape(),
            Shape::Primitive(PrimitiveKind::DateTime)
        ));
        assert!(matches!(
            ByteBuf::shape(),
            Shape::Primitive(PrimitiveKind::Bytes)
        ));
    }
}
