//! Storage seam used by the reset driver.
//!
//! [`BlobStore`] is what the [`ResetDriver`](crate::ResetDriver) talks to; the
//! production [`ContainerStore`] implements it over any
//! [`BlobContainer`], tests substitute an in-memory fake.

use std::sync::Arc;

use blobmime_object::client::{BlobContainer, ListedBlob};
use blobmime_object::providers::{AzureCredentials, AzureProvider, Client};
use blobmime_object::types::Error as ObjectError;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};

use crate::TRACING_TARGET_STORE;
use crate::error::{Error, Result};

/// Snapshot of one object as seen during listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// Object key.
    pub name: String,
    /// Content-type currently stored with the object, if any.
    pub content_type: Option<String>,
}

impl BlobEntry {
    /// Creates a new entry.
    pub fn new(name: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
        }
    }
}

impl From<ListedBlob> for BlobEntry {
    fn from(blob: ListedBlob) -> Self {
        Self {
            name: blob.name,
            content_type: blob.content_type,
        }
    }
}

/// A single container the driver can list and update.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Lazily lists every object in the container.
    ///
    /// An error means a listing page could not be fetched and the listing
    /// cannot continue.
    fn list(&self) -> BoxStream<'_, Result<BlobEntry, ObjectError>>;

    /// Replaces the content-type stored with `name`.
    ///
    /// The full desired value is always supplied; implementations must keep
    /// the object's body and other headers intact.
    async fn set_content_type(&self, name: &str, content_type: &str) -> Result<(), ObjectError>;
}

#[async_trait::async_trait]
impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn list(&self) -> BoxStream<'_, Result<BlobEntry, ObjectError>> {
        (**self).list()
    }

    async fn set_content_type(&self, name: &str, content_type: &str) -> Result<(), ObjectError> {
        (**self).set_content_type(name, content_type).await
    }
}

/// [`BlobStore`] over a [`BlobContainer`], optionally scoped to a name
/// prefix.
#[derive(Debug, Clone)]
pub struct ContainerStore {
    container: Arc<dyn BlobContainer>,
    prefix: String,
}

impl ContainerStore {
    /// Wraps a container client without checking it.
    pub fn new(container: impl BlobContainer + 'static) -> Self {
        Self {
            container: Arc::new(container),
            prefix: String::new(),
        }
    }

    /// Creates a client with `creds` and checks that its container can be
    /// listed before anything else happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if the client cannot be created or the
    /// container is missing or unreadable with the given credentials.
    pub async fn connect<C>(creds: &C::Credentials) -> Result<Self>
    where
        C: Client + BlobContainer,
    {
        let connect_error = |source: ObjectError| Error::Connect {
            provider: C::ID,
            source,
        };

        let container = C::connect(creds).await.map_err(connect_error)?;
        container.verify_reachable().await.map_err(connect_error)?;

        tracing::info!(
            target: TRACING_TARGET_STORE,
            provider = C::ID,
            container = %container.name(),
            "Container opened"
        );

        Ok(Self::new(container))
    }

    /// Connects to the Azure container described by `creds`.
    ///
    /// # Errors
    ///
    /// See [`ContainerStore::connect`].
    pub async fn connect_azure(creds: &AzureCredentials) -> Result<Self> {
        Self::connect::<AzureProvider>(creds).await
    }

    /// Restricts listing to names starting with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[async_trait::async_trait]
impl BlobStore for ContainerStore {
    fn list(&self) -> BoxStream<'_, Result<BlobEntry, ObjectError>> {
        self.container
            .list_pages(&self.prefix)
            .map_ok(|page| {
                stream::iter(
                    page.into_iter()
                        .map(|blob| Ok::<_, ObjectError>(BlobEntry::from(blob))),
                )
            })
            .try_flatten()
            .boxed()
    }

    async fn set_content_type(&self, name: &str, content_type: &str) -> Result<(), ObjectError> {
        self.container.set_content_type(name, content_type).await?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            name = %name,
            content_type = %content_type,
            "Content-type replaced"
        );

        Ok(())
    }
}
