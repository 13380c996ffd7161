use core::fmt;

use std::sync::Arc;

use crate::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The primitive encodings understood by the primitive codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// UTF-8 text, `i32` length prefix, `-1` for null.
    String,
    /// Raw bytes, `i32` length prefix, `-1` for null.
    Bytes,
    /// 16 raw bytes.
    Id,
    /// `i64` tick count.
    DateTime,
}

impl PrimitiveKind {
    /// Returns the kind name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Id => "id",
            Self::DateTime => "datetime",
        }
    }

    /// Returns the encoded width for fixed-size kinds, `None` for length-prefixed ones.
    ///
    /// ```
    /// use objser_reflect::info::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::I16.fixed_size(), Some(2));
    /// assert_eq!(PrimitiveKind::Id.fixed_size(), Some(16));
    /// assert_eq!(PrimitiveKind::String.fixed_size(), None);
    /// ```
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 | Self::DateTime => Some(8),
            Self::Id => Some(16),
            Self::String | Self::Bytes => None,
        }
    }

    /// Whether the encoding has a null sentinel.
    ///
    /// Only length-prefixed kinds can represent an absent value.
    #[inline]
    pub const fn is_nullable(self) -> bool {
        matches!(self, Self::String | Self::Bytes)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// ValueKind

/// The classified encoding of a member.
///
/// Every member of a [`TypeDescriptor`] maps to exactly one `ValueKind`.
/// Nested objects carry their already-built descriptor, so walking a value
/// never touches the registry again.
#[derive(Clone)]
pub enum ValueKind {
    Primitive(PrimitiveKind),
    Object(Arc<TypeDescriptor>),
    Sequence(Box<ValueKind>),
}

impl ValueKind {
    /// Returns the kind name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Object(_) => "object",
            Self::Sequence(_) => "sequence",
        }
    }

    /// Returns the primitive kind, if this is one.
    #[inline]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns the nested descriptor, if this is an object.
    #[inline]
    pub fn as_object(&self) -> Option<&Arc<TypeDescriptor>> {
        match self {
            Self::Object(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Returns the element kind, if this is a sequence.
    #[inline]
    pub fn as_sequence(&self) -> Option<&ValueKind> {
        match self {
            Self::Sequence(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
            Self::Object(descriptor) => f
                .debug_tuple("Object")
                .field(&descriptor.type_path())
                .finish(),
            Self::Sequence(element) => f.debug_tuple("Sequence").field(element).finish(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => fmt::Display::fmt(kind, f),
            Self::Object(descriptor) => write!(f, "object `{}`", descriptor.type_path()),
            Self::Sequence(element) => write!(f, "sequence of {element}"),
        }
    }
}
