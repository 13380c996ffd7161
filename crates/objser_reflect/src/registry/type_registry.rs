use core::any::{TypeId, type_name};
use core::fmt;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use objser_utils::TypeIdMap;
use objser_utils::hash::HashMap;

use crate::info::{TypeDescriptor, ValueKind};
use crate::registry::build::{BuildStack, build_descriptor, classify};
use crate::registry::ClassificationError;
use crate::{Field, Typed};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A cache of built [`TypeDescriptor`]s keyed by type identity.
///
/// Entries are never evicted or replaced. Use [`TypeRegistryArc`] to build
/// descriptors, this type only stores and looks them up.
pub struct TypeRegistry {
    descriptors: TypeIdMap<Arc<TypeDescriptor>>,
    type_path_to_id: HashMap<&'static str, TypeId>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            descriptors: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(objser_utils::hash::FixedHashState),
        }
    }

    /// Inserts `descriptor` unless its type is already present.
    ///
    /// Returns the descriptor that is stored afterwards, which is the
    /// existing one if there was a race.
    pub(crate) fn insert(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let type_id = descriptor.type_id();
        let type_path_to_id = &mut self.type_path_to_id;
        let stored = self.descriptors.get_or_insert_with(type_id, || {
            type_path_to_id.insert(descriptor.type_path(), type_id);
            Arc::new(descriptor)
        });
        Arc::clone(stored)
    }

    /// Whether a descriptor for the given [`TypeId`] has been built.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.descriptors.contains(&type_id)
    }

    /// Returns the descriptor of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&Arc<TypeDescriptor>> {
        self.descriptors.get(&type_id)
    }

    /// Returns the descriptor of the type with the given type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&Arc<TypeDescriptor>> {
        // Manual inline
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns an iterator over the cached descriptors, in no particular order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<TypeDescriptor>> {
        self.descriptors.values()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.descriptors.values().map(|d| d.type_path()))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shareable handle on a [`TypeRegistry`].
///
/// Cloning the handle shares the cache. Every [`Serializer`] owns one,
/// pass the same handle to several serializers to share descriptors.
///
/// [`Serializer`]: crate::binary::Serializer
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Creates a handle on a new, empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the descriptor of `T`, building it and its nested object
    /// types on first use.
    ///
    /// Idempotent: every later call returns the same `Arc`. A failed build
    /// caches nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use objser_reflect::derive::Reflect;
    /// use objser_reflect::registry::{ClassificationFault, TypeRegistryArc};
    ///
    /// #[derive(Reflect, Default)]
    /// #[reflect(default)]
    /// struct Library {
    ///     index: HashMap<String, u32>,
    /// }
    ///
    /// let registry = TypeRegistryArc::new();
    /// let err = registry.get_or_build::<Library>().unwrap_err();
    ///
    /// assert_eq!(err.member, Some("index"));
    /// assert!(matches!(err.fault, ClassificationFault::UnsupportedContainer(_)));
    /// assert!(registry.read().is_empty());
    /// ```
    pub fn get_or_build<T: Typed>(&self) -> Result<Arc<TypeDescriptor>, ClassificationError> {
        build_descriptor::<T>(self, &mut BuildStack::new())
    }

    /// Classifies `T` as a standalone value.
    ///
    /// Returns the value kind and whether `T` accepts null.
    pub fn classify<T: Field>(&self) -> Result<(ValueKind, bool), ClassificationError> {
        classify(
            T::shape(),
            self,
            &mut BuildStack::new(),
            type_name::<T>(),
            None,
        )
    }

    /// Builds the descriptor of every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Returns the number of registered types. Repeated calls are cheap.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it
    /// does nothing and returns `Ok(0)`.
    pub fn auto_register(&self) -> Result<usize, ClassificationError> {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(0)
        }
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::info::PrimitiveKind;
    use crate::registry::ClassificationFault;

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Leaf {
        value: i64,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Branch {
        name: Option<String>,
        leaf: Leaf,
        leaves: Vec<Leaf>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct SelfContained {
        children: Vec<SelfContained>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct NullableNumber {
        rating: Option<i32>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct DoubleOption {
        title: Option<Option<String>>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct WithDynamic {
        id: u8,
        plugin: Option<Box<dyn Reflect>>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct WithBTree {
        lookup: BTreeMap<u32, String>,
    }

    #[derive(Reflect)]
    struct NoDefault {
        value: u8,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Partial {
        kept: u8,
        #[reflect(readonly)]
        shown: u8,
        also_kept: u16,
    }

    #[test]
    fn builds_nested_descriptors_once() {
        let registry = TypeRegistryArc::new();
        let first = registry.get_or_build::<Branch>().unwrap();
        let second = registry.get_or_build::<Branch>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.read().len(), 2);
        assert!(registry.read().contains(TypeId::of::<Leaf>()));

        let leaf = registry.get_or_build::<Leaf>().unwrap();
        let nested = first.member("leaf").unwrap().kind().as_object().unwrap();
        assert!(Arc::ptr_eq(&leaf, nested));
    }

    #[test]
    fn member_order_and_nullability() {
        let registry = TypeRegistryArc::new();
        let branch = registry.get_or_build::<Branch>().unwrap();

        let names: Vec<_> = branch.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["name", "leaf", "leaves"]);

        let name = &branch.members()[0];
        assert!(name.is_nullable());
        assert_eq!(
            name.kind().as_primitive(),
            Some(PrimitiveKind::String)
        );
        assert!(!branch.members()[1].is_nullable());
        assert!(branch.members()[2].kind().as_sequence().is_some());
    }

    #[test]
    fn lookup_by_type_path() {
        let registry = TypeRegistryArc::new();
        let leaf = registry.get_or_build::<Leaf>().unwrap();
        let read = registry.read();
        let found = read.get_with_type_path(leaf.type_path()).unwrap();
        assert!(Arc::ptr_eq(&leaf, found));
        assert!(read.get_with_type_path("missing::Type").is_none());
    }

    #[test]
    fn recursive_type_is_rejected() {
        let registry = TypeRegistryArc::new();
        let err = registry.get_or_build::<SelfContained>().unwrap_err();
        assert_eq!(err.member, Some("children"));
        assert!(matches!(err.fault, ClassificationFault::Recursive(_)));
        assert!(registry.read().is_empty());
    }

    #[test]
    fn nullable_value_type_is_rejected() {
        let registry = TypeRegistryArc::new();
        let err = registry.get_or_build::<NullableNumber>().unwrap_err();
        assert_eq!(
            err.fault,
            ClassificationFault::NullableValueType(PrimitiveKind::I32)
        );
    }

    #[test]
    fn nested_nullable_is_rejected() {
        let registry = TypeRegistryArc::new();
        let err = registry.get_or_build::<DoubleOption>().unwrap_err();
        assert_eq!(err.fault, ClassificationFault::NestedNullable);
    }

    #[test]
    fn interface_and_map_are_rejected() {
        let registry = TypeRegistryArc::new();
        let err = registry.get_or_build::<WithDynamic>().unwrap_err();
        assert_eq!(err.member, Some("plugin"));
        assert!(matches!(err.fault, ClassificationFault::Interface(_)));

        let err = registry.get_or_build::<WithBTree>().unwrap_err();
        assert!(matches!(
            err.fault,
            ClassificationFault::UnsupportedContainer(_)
        ));
    }

    #[test]
    fn missing_constructor_is_rejected() {
        let registry = TypeRegistryArc::new();
        let err = registry.get_or_build::<NoDefault>().unwrap_err();
        assert_eq!(err.member, None);
        assert_eq!(err.fault, ClassificationFault::NotDefaultConstructible);
    }

    #[test]
    fn readonly_member_is_skipped() {
        let registry = TypeRegistryArc::new();
        let partial = registry.get_or_build::<Partial>().unwrap();
        assert_eq!(partial.member_len(), 2);
        assert_eq!(partial.index_of("also_kept"), Some(1));
        assert!(partial.member("shown").is_none());
        assert_eq!(partial.skipped(), ["shown"]);
    }

    #[test]
    fn classify_standalone_values() {
        let registry = TypeRegistryArc::new();

        let (kind, nullable) = registry.classify::<Option<Vec<String>>>().unwrap();
        assert!(nullable);
        assert_eq!(
            kind.as_sequence().and_then(ValueKind::as_primitive),
            Some(PrimitiveKind::String)
        );

        let err = registry.classify::<Option<u8>>().unwrap_err();
        assert_eq!(err.member, None);
    }

    #[test]
    fn concurrent_builds_share_one_descriptor() {
        let registry = TypeRegistryArc::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.get_or_build::<Branch>().unwrap())
            })
            .collect();

        let built: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = registry.get_or_build::<Branch>().unwrap();
        assert!(built.iter().all(|d| Arc::ptr_eq(d, &stored)));
    }
}
