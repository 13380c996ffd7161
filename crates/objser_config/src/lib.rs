#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod file;
mod section;
mod store;

// -----------------------------------------------------------------------------
// Exports

pub use error::ConfigError;
pub use section::{ConfigEntry, ConfigSection};
pub use store::ConfigStore;

/// Log target of load fallbacks.
pub const LOG_TARGET: &str = "objser::config";
