use core::fmt;

use std::io;
use std::string::FromUtf8Error;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::access::ValueError;
use crate::registry::ClassificationError;

// -----------------------------------------------------------------------------
// BinaryError

/// An error raised while encoding or decoding a value.
///
/// None of these are recovered internally, a failed read never yields a
/// default value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BinaryError {
    /// The value's type has no wire encoding.
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    /// The stream ended before the value was complete.
    #[error("unexpected end of stream while reading {context}")]
    Truncated { context: &'static str },

    /// A sequence count is negative (other than the null sentinel) or exceeds the limit.
    #[error("malformed collection count {count}")]
    MalformedCollection { count: i32 },

    /// A string or bytes length exceeds the configured limit.
    #[error("length {len} exceeds the limit of {max} bytes")]
    LimitExceeded { len: usize, max: usize },

    /// A string or bytes length below `-1`.
    #[error("invalid length prefix {0}")]
    InvalidLength(i32),

    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    #[error("invalid presence marker {0:#04x}")]
    InvalidMarker(u8),

    #[error("invalid utf-8 string")]
    InvalidUtf8(#[source] FromUtf8Error),

    /// A tick count outside `0..=MAX_TICKS`.
    #[error("date/time ticks {0} out of range")]
    InvalidDateTime(i64),

    /// A date/time that has no tick representation.
    #[error("date/time {0} cannot be encoded as ticks")]
    UnrepresentableDateTime(DateTime<Utc>),

    /// An absent value for a member that does not accept null.
    #[error("unexpected null for `{owner}`{}", MemberSuffix(.member))]
    UnexpectedNull {
        owner: &'static str,
        member: Option<&'static str>,
    },

    /// A decoded value could not be stored into its member.
    #[error("cannot set member `{member}` of `{owner}`")]
    Member {
        owner: &'static str,
        member: &'static str,
        #[source]
        source: ValueError,
    },

    /// A decoded value could not be converted into the requested type.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A length or count does not fit the `i32` prefix.
    #[error("length {0} does not fit an i32 prefix")]
    LengthOverflow(usize),

    /// A member produced a value of a different kind than it was classified as.
    #[error("expected a `{expected}` value, found `{found}`")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An instance passed to the walker is not of the descriptor's type.
    #[error("expected an instance of `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Bytes left over after a complete value.
    #[error("{remaining} trailing bytes after the value")]
    TrailingBytes { remaining: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BinaryError {
    /// Maps a read failure, turning an early end of stream into [`BinaryError::Truncated`].
    pub fn read(err: io::Error, context: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { context }
        } else {
            Self::Io(err)
        }
    }

    /// Returns `true` for errors raised before any byte was touched.
    #[inline]
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::Classification(_))
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

struct MemberSuffix<'a>(&'a Option<&'static str>);

impl fmt::Display for MemberSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(member) => write!(f, " member `{member}`"),
            None => Ok(()),
        }
    }
}
