//! Prelude module for convenient imports.

pub use crate::driver::{DriverConfig, ResetDriver, RunSummary, UpdatePolicy};
pub use crate::error::{Error, Result};
pub use crate::reporter::Reporter;
pub use crate::resolver::{ContentTypeOverride, ContentTypeResolver};
pub use crate::store::{BlobEntry, BlobStore, ContainerStore};
