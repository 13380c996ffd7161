use core::any::TypeId;

use std::sync::Arc;

use crate::access::MemberList;
use crate::info::{MemberDescriptor, Shape, TypeDescriptor, ValueKind};
use crate::registry::{ClassificationError, ClassificationFault, TypeRegistryArc};
use crate::{Reflect, Typed};

// -----------------------------------------------------------------------------
// BuildStack

/// The chain of types whose descriptors are currently being built.
///
/// A type found on the stack again contains itself.
pub(crate) struct BuildStack(Vec<TypeId>);

impl BuildStack {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    fn contains(&self, type_id: TypeId) -> bool {
        self.0.contains(&type_id)
    }
}

// -----------------------------------------------------------------------------
// Build

/// Returns the cached descriptor of `T`, building and caching it when absent.
///
/// The registry lock is never held while `describe` runs, concurrent builds
/// of the same type race and the first inserted descriptor wins.
pub(crate) fn build_descriptor<T: Typed>(
    registry: &TypeRegistryArc,
    stack: &mut BuildStack,
) -> Result<Arc<TypeDescriptor>, ClassificationError> {
    let type_id = TypeId::of::<T>();
    if let Some(descriptor) = registry.read().get(type_id) {
        return Ok(Arc::clone(descriptor));
    }

    let type_path = T::type_path();
    let Some(constructor) = T::constructor() else {
        return Err(ClassificationError::new(
            type_path,
            None,
            ClassificationFault::NotDefaultConstructible,
        ));
    };

    let mut list = MemberList::<T>::new();
    T::describe(&mut list);

    stack.0.push(type_id);
    let result = build_members(type_path, list, registry, stack);
    stack.0.pop();
    let (members, skipped) = result?;

    let descriptor = TypeDescriptor::new(
        type_id,
        type_path,
        members,
        skipped,
        Box::new(move || -> Box<dyn Reflect> { Box::new(constructor()) }),
    );

    let descriptor = registry.write().insert(descriptor);
    log::debug!(
        target: "objser::registry",
        "built descriptor for `{}` with {} members",
        descriptor.type_path(),
        descriptor.member_len(),
    );
    Ok(descriptor)
}

fn build_members<T: Typed>(
    type_path: &'static str,
    list: MemberList<T>,
    registry: &TypeRegistryArc,
    stack: &mut BuildStack,
) -> Result<(Vec<MemberDescriptor>, Vec<&'static str>), ClassificationError> {
    let decls = list.into_decls();
    let mut members = Vec::with_capacity(decls.len());
    let mut skipped = Vec::new();

    for decl in decls {
        let Some((getter, setter)) = decl.access else {
            skipped.push(decl.name);
            continue;
        };
        let (kind, nullable) =
            classify((decl.shape)(), registry, stack, type_path, Some(decl.name))?;
        members.push(MemberDescriptor::new(
            decl.name,
            decl.type_name,
            kind,
            nullable,
            getter,
            setter,
        ));
    }

    Ok((members, skipped))
}

// -----------------------------------------------------------------------------
// Classify

/// Classifies a declared shape, returning its kind and whether it accepts null.
pub(crate) fn classify(
    shape: Shape,
    registry: &TypeRegistryArc,
    stack: &mut BuildStack,
    owner: &'static str,
    member: Option<&'static str>,
) -> Result<(ValueKind, bool), ClassificationError> {
    match shape {
        Shape::Nullable(inner) => match inner() {
            Shape::Primitive(kind) if !kind.is_nullable() => Err(ClassificationError::new(
                owner,
                member,
                ClassificationFault::NullableValueType(kind),
            )),
            inner => Ok((classify_kind(inner, registry, stack, owner, member)?, true)),
        },
        shape => Ok((classify_kind(shape, registry, stack, owner, member)?, false)),
    }
}

fn classify_kind(
    shape: Shape,
    registry: &TypeRegistryArc,
    stack: &mut BuildStack,
    owner: &'static str,
    member: Option<&'static str>,
) -> Result<ValueKind, ClassificationError> {
    let fail = |fault| ClassificationError::new(owner, member, fault);

    match shape {
        Shape::Primitive(kind) => Ok(ValueKind::Primitive(kind)),
        Shape::Object(object) => {
            if stack.contains(object.type_id()) {
                return Err(fail(ClassificationFault::Recursive(object.type_path())));
            }
            object.build(registry, stack).map(ValueKind::Object)
        }
        Shape::Sequence(element) => {
            let (element, _) = classify(element(), registry, stack, owner, member)?;
            Ok(ValueKind::Sequence(Box::new(element)))
        }
        Shape::Nullable(_) => Err(fail(ClassificationFault::NestedNullable)),
        Shape::Map(type_name) => Err(fail(ClassificationFault::UnsupportedContainer(type_name))),
        Shape::Dynamic(type_name) => Err(fail(ClassificationFault::Interface(type_name))),
    }
}
