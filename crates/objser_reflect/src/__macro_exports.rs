//! Items used by the code generated from `#[derive(Reflect)]`. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::registry::{ClassificationError, TypeRegistryArc};

    pub use inventory;

    /// A registration function submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&TypeRegistryArc) -> Result<(), ClassificationError>);

    inventory::collect!(__AutoRegisterFunc);

    /// Implemented by the derive macro for non-generic types.
    pub trait __RegisterType {
        fn __register(registry: &TypeRegistryArc) -> Result<(), ClassificationError>;
    }

    impl<T: crate::Typed> __RegisterType for T {
        #[inline]
        fn __register(registry: &TypeRegistryArc) -> Result<(), ClassificationError> {
            registry.get_or_build::<T>().map(|_| ())
        }
    }

    pub(crate) fn __register_types(registry: &TypeRegistryArc) -> Result<usize, ClassificationError> {
        let mut count = 0;
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry)?;
            count += 1;
        }
        Ok(count)
    }
}
