use core::any::TypeId;
use core::fmt;

use crate::Reflect;
use crate::access::{Value, ValueError, ValueRef};
use crate::info::ValueKind;

// -----------------------------------------------------------------------------
// Accessors

pub(crate) type Getter =
    Box<dyn for<'a> Fn(&'a dyn Reflect) -> Option<ValueRef<'a>> + Send + Sync>;

pub(crate) type Setter =
    Box<dyn Fn(&mut dyn Reflect, Value) -> Result<(), ValueError> + Send + Sync>;

pub(crate) type Constructor = Box<dyn Fn() -> Box<dyn Reflect> + Send + Sync>;

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One readable and writable member of a [`TypeDescriptor`].
///
/// The name is diagnostic only, the wire format identifies members by position.
pub struct MemberDescriptor {
    name: &'static str,
    type_name: &'static str,
    kind: ValueKind,
    nullable: bool,
    getter: Getter,
    setter: Setter,
}

impl MemberDescriptor {
    pub(crate) fn new(
        name: &'static str,
        type_name: &'static str,
        kind: ValueKind,
        nullable: bool,
        getter: Getter,
        setter: Setter,
    ) -> Self {
        Self {
            name,
            type_name,
            kind,
            nullable,
            getter,
            setter,
        }
    }

    /// Returns the member name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the Rust type name of the member, e.g. `alloc::string::String`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Whether the member accepts an absent value (declared as `Option<_>`).
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Reads the member from `instance`.
    ///
    /// Returns `None` if `instance` is not of the owning type.
    #[inline]
    pub fn get<'a>(&self, instance: &'a dyn Reflect) -> Option<ValueRef<'a>> {
        (self.getter)(instance)
    }

    /// Writes `value` into the member of `instance`.
    #[inline]
    pub fn set(&self, instance: &mut dyn Reflect, value: Value) -> Result<(), ValueError> {
        (self.setter)(instance, value)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The cached, ordered member layout of one type.
///
/// # Examples
///
/// ```
/// use objser_reflect::{derive::Reflect, registry::TypeRegistryArc};
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Volume {
///     level: u8,
///     muted: bool,
/// }
///
/// let registry = TypeRegistryArc::new();
/// let descriptor = registry.get_or_build::<Volume>().unwrap();
///
/// assert_eq!(descriptor.member_len(), 2);
/// assert_eq!(descriptor.index_of("muted"), Some(1));
/// ```
pub struct TypeDescriptor {
    type_id: TypeId,
    type_path: &'static str,
    members: Box<[MemberDescriptor]>,
    skipped: Box<[&'static str]>,
    constructor: Constructor,
}

impl TypeDescriptor {
    pub(crate) fn new(
        type_id: TypeId,
        type_path: &'static str,
        members: Vec<MemberDescriptor>,
        skipped: Vec<&'static str>,
        constructor: Constructor,
    ) -> Self {
        Self {
            type_id,
            type_path,
            members: members.into_boxed_slice(),
            skipped: skipped.into_boxed_slice(),
            constructor,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the members in wire order.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Returns the member with the given name, if present.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Returns the wire position of the given member name.
    ///
    /// This is O(N) complexity.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    #[inline]
    pub fn member_len(&self) -> usize {
        self.members.len()
    }

    /// Names of declared members left out of the layout because they
    /// lack a getter or a setter.
    #[inline]
    pub fn skipped(&self) -> &[&'static str] {
        &self.skipped
    }

    /// Creates a default instance of the described type.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.constructor)()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_path", &self.type_path)
            .field("members", &self.members)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}
