//! Resolves application configuration at startup by overlaying values
//! fetched from AWS Parameter Store and Secrets Manager.
//!
//! An application declares, through ordinary configuration keys, which
//! external secrets should be fetched. [`post_process`] scans the layered
//! configuration, resolves the referenced parameters and secrets, and
//! publishes the result as the highest-priority layer before the
//! application starts serving traffic.

pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod resolve;

pub use config::{ConfigSources, PropertySource};
pub use error::{ResolveError, Result};
pub use resolve::post_process;
