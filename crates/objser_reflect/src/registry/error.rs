use core::fmt;

use thiserror::Error;

use crate::info::PrimitiveKind;

// -----------------------------------------------------------------------------
// ClassificationFault

/// Why a member type has no wire encoding.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClassificationFault {
    #[error("trait object `{0}` cannot be constructed when reading")]
    Interface(&'static str),

    #[error("keyed container `{0}` is not supported, only sequences are")]
    UnsupportedContainer(&'static str),

    #[error("`Option<{0}>` has no null encoding")]
    NullableValueType(PrimitiveKind),

    #[error("nested `Option<Option<_>>` is not supported")]
    NestedNullable,

    #[error("type `{0}` contains itself")]
    Recursive(&'static str),

    #[error("no default constructor, add `#[reflect(default)]`")]
    NotDefaultConstructible,
}

// -----------------------------------------------------------------------------
// ClassificationError

/// A type could not be described for the binary codec.
///
/// Raised when the descriptor of a type is first built, before any byte is
/// written or read. Not cached, the next attempt builds again.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot classify `{type_path}`{}: {fault}", MemberSuffix(.member))]
pub struct ClassificationError {
    /// The owning type.
    pub type_path: &'static str,
    /// The offending member, `None` when the fault concerns the type itself.
    pub member: Option<&'static str>,
    pub fault: ClassificationFault,
}

impl ClassificationError {
    #[inline]
    pub(crate) const fn new(
        type_path: &'static str,
        member: Option<&'static str>,
        fault: ClassificationFault,
    ) -> Self {
        Self {
            type_path,
            member,
            fault,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_type_and_member() {
        let err = ClassificationError::new(
            "demo::Track",
            Some("rating"),
            ClassificationFault::NullableValueType(PrimitiveKind::I32),
        );
        assert_eq!(
            err.to_string(),
            "cannot classify `demo::Track` member `rating`: `Option<i32>` has no null encoding"
        );

        let err = ClassificationError::new(
            "demo::Track",
            None,
            ClassificationFault::NotDefaultConstructible,
        );
        assert!(err.to_string().starts_with("cannot classify `demo::Track`: "));
    }
}
