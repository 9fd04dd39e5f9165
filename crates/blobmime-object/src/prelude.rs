//! Convenience re-exports.

pub use crate::client::{BlobContainer, BlobPage, ListedBlob};
pub use crate::memory::{MemoryBlob, MemoryContainer};
pub use crate::providers::{AzureCredentials, AzureProvider, Client, ConnectionString};
pub use crate::types::Error;
