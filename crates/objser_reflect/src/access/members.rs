use core::marker::PhantomData;

use crate::access::{Field, Value, ValueError, ValueRef};
use crate::info::{Getter, Setter, Shape};
use crate::{Reflect, Typed};

// -----------------------------------------------------------------------------
// MemberDecl

/// One declared member, before classification.
pub(crate) struct MemberDecl {
    pub name: &'static str,
    pub type_name: &'static str,
    pub shape: fn() -> Shape,
    /// `None` for read-only and write-only declarations.
    pub access: Option<(Getter, Setter)>,
}

// -----------------------------------------------------------------------------
// MemberList

/// The ordered member declarations of `T`, filled by [`Typed::describe`].
///
/// Only members registered through [`field`](Self::field) take part in
/// encoding. Members registered through [`readonly`](Self::readonly) or
/// [`writeonly`](Self::writeonly) are recorded and then left out of the
/// descriptor without error.
pub struct MemberList<T: Typed> {
    decls: Vec<MemberDecl>,
    marker: PhantomData<fn(T)>,
}

impl<T: Typed> MemberList<T> {
    pub(crate) fn new() -> Self {
        Self {
            decls: Vec::new(),
            marker: PhantomData,
        }
    }

    pub(crate) fn into_decls(self) -> Vec<MemberDecl> {
        self.decls
    }

    /// Declares a member with both a getter and a setter.
    pub fn field<F: Field>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut Self {
        self.decls.push(MemberDecl {
            name,
            type_name: core::any::type_name::<F>(),
            shape: F::shape,
            access: Some((getter::<T, F>(get), setter::<T, F>(get_mut))),
        });
        self
    }

    /// Declares a member that can only be read. It is not encoded.
    pub fn readonly<F: Field>(&mut self, name: &'static str, _get: fn(&T) -> &F) -> &mut Self {
        self.skip::<F>(name)
    }

    /// Declares a member that can only be written. It is not encoded.
    pub fn writeonly<F: Field>(&mut self, name: &'static str, _set: fn(&mut T, F)) -> &mut Self {
        self.skip::<F>(name)
    }

    fn skip<F: Field>(&mut self, name: &'static str) -> &mut Self {
        self.decls.push(MemberDecl {
            name,
            type_name: core::any::type_name::<F>(),
            shape: F::shape,
            access: None,
        });
        self
    }

    /// Returns the number of declarations, including skipped ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Erased accessors

// The `for<'a>` bound fixes the closure signature, the output borrows the input.
#[inline(always)]
fn erase_getter<G>(get: G) -> Getter
where
    G: for<'a> Fn(&'a dyn Reflect) -> Option<ValueRef<'a>> + Send + Sync + 'static,
{
    Box::new(get)
}

#[inline(always)]
fn erase_setter<S>(set: S) -> Setter
where
    S: Fn(&mut dyn Reflect, Value) -> Result<(), ValueError> + Send + Sync + 'static,
{
    Box::new(set)
}

fn getter<T: Typed, F: Field>(get: fn(&T) -> &F) -> Getter {
    erase_getter(move |instance| instance.downcast_ref::<T>().map(|t| get(t).as_value()))
}

fn setter<T: Typed, F: Field>(get_mut: fn(&mut T) -> &mut F) -> Setter {
    erase_setter(move |instance, value| {
        let found = instance.reflect_type_path();
        let target = instance
            .downcast_mut::<T>()
            .ok_or(ValueError::TypeMismatch {
                expected: T::type_path(),
                found,
            })?;
        *get_mut(target) = F::from_value(value)?;
        Ok(())
    })
}
