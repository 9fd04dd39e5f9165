//! Client trait for creating authenticated container clients.

use crate::types::Error;

/// Factory for a client bound to a single container of a storage provider.
///
/// Implementations validate the credentials and build the client. Whether the
/// container exists is checked separately through
/// [`BlobContainer::verify_reachable`](crate::client::BlobContainer::verify_reachable).
#[async_trait::async_trait]
pub trait Client: Sized + Send + 'static {
    /// Strongly-typed credentials for this provider.
    type Credentials: Send + Sync;

    /// Unique identifier (e.g. "azure").
    const ID: &'static str;

    /// Create a client instance.
    async fn connect(creds: &Self::Credentials) -> Result<Self, Error>;
}
