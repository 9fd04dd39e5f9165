#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the reset driver.
pub const TRACING_TARGET_DRIVER: &str = "blobmime_core::driver";

/// Tracing target for storage access.
pub const TRACING_TARGET_STORE: &str = "blobmime_core::store";

mod driver;
mod error;
mod reporter;
mod resolver;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use driver::{Decision, DriverConfig, Outcome, ResetDriver, RunSummary, UpdatePolicy};
pub use error::{Error, Result};
pub use reporter::Reporter;
pub use resolver::{ContentTypeOverride, ContentTypeResolver, extension};
pub use store::{BlobEntry, BlobStore, ContainerStore};
