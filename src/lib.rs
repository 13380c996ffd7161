#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use objser_config as config;
pub use objser_reflect as reflect;
pub use objser_task as task;
pub use objser_utils as utils;

/// Commonly used items.
pub mod prelude {
    pub use crate::config::{ConfigError, ConfigStore};
    pub use crate::reflect::binary::{BinaryError, Serializer, SerializerBuilder};
    pub use crate::reflect::derive::Reflect;
    pub use crate::reflect::registry::{TypeRegistry, TypeRegistryArc};
    pub use crate::task::{TaskPool, TaskPoolBuilder, Worker, WorkerContext, WorkerError};
}
