use core::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::Reflect;
use crate::access::Sequence;

// -----------------------------------------------------------------------------
// ValueRef

/// A borrowed view of one member value, produced by a getter.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    /// An absent value (`None`).
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(&'a str),
    Bytes(&'a [u8]),
    Id(Uuid),
    DateTime(DateTime<Utc>),
    Object(&'a dyn Reflect),
    Sequence(&'a dyn Sequence),
    /// A value whose shape has no wire encoding, carries the type name.
    Unsupported(&'static str),
}

impl ValueRef<'_> {
    /// Returns the kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Id(_) => "id",
            Self::DateTime(_) => "datetime",
            Self::Object(_) => "object",
            Self::Sequence(_) => "sequence",
            Self::Unsupported(_) => "unsupported",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Self::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Self::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Self::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Self::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(&v.len()).finish(),
            Self::Id(v) => f.debug_tuple("Id").field(v).finish(),
            Self::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Self::Object(v) => f.debug_tuple("Object").field(&v.reflect_type_path()).finish(),
            Self::Sequence(v) => f.debug_tuple("Sequence").field(&v.len()).finish(),
            Self::Unsupported(v) => f.debug_tuple("Unsupported").field(v).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Value

/// An owned member value, produced by the reader and consumed by a setter.
pub enum Value {
    /// An absent value, read from a `-1` sentinel or a `0` presence marker.
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Id(Uuid),
    DateTime(DateTime<Utc>),
    Object(Box<dyn Reflect>),
    Sequence(Vec<Value>),
}

impl Value {
    /// Returns the kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Id(_) => "id",
            Self::DateTime(_) => "datetime",
            Self::Object(_) => "object",
            Self::Sequence(_) => "sequence",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Unboxes an object value into its concrete type.
    pub fn into_object<T: Reflect>(self) -> Result<T, ValueError> {
        match self {
            Self::Object(boxed) => boxed.take::<T>().map_err(|boxed| ValueError::TypeMismatch {
                expected: core::any::type_name::<T>(),
                found: boxed.reflect_type_path(),
            }),
            Self::Null => Err(ValueError::UnexpectedNull),
            other => Err(ValueError::KindMismatch {
                expected: "object",
                found: other.kind_name(),
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Self::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Self::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Self::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Self::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(&v.len()).finish(),
            Self::Id(v) => f.debug_tuple("Id").field(v).finish(),
            Self::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Self::Object(v) => f.debug_tuple("Object").field(&v.reflect_type_path()).finish(),
            Self::Sequence(v) => f.debug_tuple("Sequence").field(v).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// ValueError

/// A value could not be converted into a member's concrete type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// An absent value for a member that is not `Option<_>`.
    #[error("unexpected null value")]
    UnexpectedNull,
    /// The value kind does not match the member kind.
    #[error("expected a `{expected}` value, found `{found}`")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// An object value of a different concrete type.
    #[error("expected object `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The member type has no wire encoding.
    #[error("type `{type_name}` has no binary encoding")]
    Unsupported { type_name: &'static str },
}
