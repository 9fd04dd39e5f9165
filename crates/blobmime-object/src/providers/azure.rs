//! Azure Blob Storage provider using [`azure_storage_blobs::prelude::ContainerClient`].

use std::fmt;

use azure_core::StatusCode;
use azure_core::error::ErrorKind;
use azure_core::request_options::IfMatchCondition;
use azure_storage::{CloudLocation, StorageCredentials};
use azure_storage_blobs::blob::Blob;
use azure_storage_blobs::prelude::{ClientBuilder, ContainerClient};
use derive_more::Deref;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};

use super::{Client, ConnectionString};
use crate::TRACING_TARGET;
use crate::client::{BlobContainer, BlobPage, ListedBlob};
use crate::types::Error;

/// Typed credentials for one Azure Blob Storage container.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AzureCredentials {
    /// Azure storage container name.
    pub container: String,
    /// Azure storage account name.
    pub account_name: String,
    /// Storage account access key.
    pub access_key: Option<String>,
    /// Shared Access Signature token, with or without the leading `?`.
    pub sas_token: Option<String>,
    /// Custom blob endpoint URL (sovereign clouds, Azure Stack).
    pub endpoint: Option<String>,
    /// Target the local storage emulator (Azurite) with its well-known account.
    pub use_emulator: bool,
}

impl AzureCredentials {
    /// Builds credentials for `container` from an account connection string.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is malformed or lacks an
    /// account name or a credential.
    pub fn from_connection_string(
        connection_string: &str,
        container: impl Into<String>,
    ) -> Result<Self, Error> {
        connection_string
            .parse::<ConnectionString>()?
            .into_credentials(container)
    }

    fn storage_credentials(&self) -> Result<StorageCredentials, Error> {
        if let Some(key) = &self.access_key {
            return Ok(StorageCredentials::access_key(
                self.account_name.clone(),
                key.clone(),
            ));
        }

        match &self.sas_token {
            Some(sas) => StorageCredentials::sas_token(sas.trim_start_matches('?'))
                .map_err(|e| Error::config("invalid SharedAccessSignature", AzureProvider::ID).with_source(e)),
            None => Ok(StorageCredentials::anonymous()),
        }
    }

    fn location(&self) -> CloudLocation {
        match &self.endpoint {
            Some(uri) => CloudLocation::Custom {
                account: self.account_name.clone(),
                uri: uri.clone(),
            },
            None => CloudLocation::Public {
                account: self.account_name.clone(),
            },
        }
    }
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("container", &self.container)
            .field("account_name", &self.account_name)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("use_emulator", &self.use_emulator)
            .finish()
    }
}

/// Azure Blob Storage container client.
#[derive(Debug, Clone, Deref)]
pub struct AzureProvider {
    container: String,
    #[deref]
    client: ContainerClient,
}

#[async_trait::async_trait]
impl Client for AzureProvider {
    type Credentials = AzureCredentials;

    const ID: &'static str = "azure";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        if creds.container.trim().is_empty() {
            return Err(Error::config("container name must not be empty", Self::ID));
        }

        let builder = if creds.use_emulator {
            ClientBuilder::emulator()
        } else {
            ClientBuilder::with_location(creds.location(), creds.storage_credentials()?)
        };

        tracing::info!(
            target: TRACING_TARGET,
            container = %creds.container,
            account = %creds.account_name,
            endpoint = ?creds.endpoint,
            emulator = creds.use_emulator,
            "Azure container client created"
        );

        Ok(Self {
            container: creds.container.clone(),
            client: builder.container_client(creds.container.clone()),
        })
    }
}

#[async_trait::async_trait]
impl BlobContainer for AzureProvider {
    fn name(&self) -> &str {
        &self.container
    }

    #[tracing::instrument(name = "azure.verify", skip(self), fields(container = %self.container))]
    async fn verify_reachable(&self) -> Result<(), Error> {
        match self.client.list_blobs().into_stream().next().await {
            None | Some(Ok(_)) => Ok(()),
            Some(Err(e)) => Err(unreachable(&self.container, e)),
        }
    }

    #[tracing::instrument(name = "azure.list_pages", skip(self), fields(container = %self.container))]
    fn list_pages(&self, prefix: &str) -> BoxStream<'_, Result<BlobPage, Error>> {
        let mut builder = self.client.list_blobs();
        if !prefix.is_empty() {
            builder = builder.prefix(prefix.to_string());
        }

        builder
            .into_stream()
            .map_ok(|page| page.blobs.blobs().map(ListedBlob::from).collect::<BlobPage>())
            .map_err(|e| from_azure(e, "list blobs"))
            .boxed()
    }

    #[tracing::instrument(name = "azure.set_content_type", skip(self), fields(container = %self.container))]
    async fn set_content_type(&self, name: &str, content_type: &str) -> Result<(), Error> {
        let blob = self.client.blob_client(name);

        let properties = blob
            .get_properties()
            .await
            .map_err(|e| from_azure(e, "get blob properties"))?
            .blob
            .properties;
        let etag = properties.etag.to_string();

        // Set Blob Properties replaces every content header, so the current
        // ones are sent back with only the content-type changed.
        blob.set_properties()
            .set_from_blob_properties(properties)
            .content_type(content_type.to_string())
            .if_match(IfMatchCondition::Match(etag))
            .await
            .map_err(|e| from_azure(e, "set blob properties"))?;

        tracing::debug!(
            target: TRACING_TARGET,
            name = %name,
            content_type = %content_type,
            "Blob content-type replaced"
        );

        Ok(())
    }
}

impl From<&Blob> for ListedBlob {
    fn from(blob: &Blob) -> Self {
        Self::new(blob.name.clone(), Some(blob.properties.content_type.as_str()))
    }
}

/// Throttling, timeouts and server errors are worth another attempt.
fn is_retryable(err: &azure_core::Error) -> bool {
    match err.kind() {
        ErrorKind::HttpResponse { status, .. } => matches!(
            status,
            StatusCode::RequestTimeout
                | StatusCode::TooManyRequests
                | StatusCode::InternalServerError
                | StatusCode::BadGateway
                | StatusCode::ServiceUnavailable
                | StatusCode::GatewayTimeout
        ),
        ErrorKind::Io => true,
        _ => false,
    }
}

/// The service error is kept as the source only, so a rendered chain
/// names it once.
fn unreachable(container: &str, err: azure_core::Error) -> Error {
    Error::connection(
        format!("container '{container}' is not reachable"),
        AzureProvider::ID,
        is_retryable(&err),
    )
    .with_source(err)
}

/// Convert an [`azure_core::Error`] into a crate [`Error`].
fn from_azure(err: azure_core::Error, operation: &str) -> Error {
    Error::runtime(format!("{operation} failed"), AzureProvider::ID, is_retryable(&err))
        .with_source(err)
}
