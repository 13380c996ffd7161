#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod task_pool;
mod worker;

// -----------------------------------------------------------------------------
// Exports

pub use error::{Aborted, WorkerError};
pub use task_pool::{IoTaskPool, TaskPool, TaskPoolBuilder};
pub use worker::{Worker, WorkerContext, WorkerStatus};

/// Log target of thread lifecycle and worker events.
pub const LOG_TARGET: &str = "objser::task";

// -----------------------------------------------------------------------------
// Re-Exports

pub use async_io::block_on;
pub use async_task::Task;
pub use futures_lite;
