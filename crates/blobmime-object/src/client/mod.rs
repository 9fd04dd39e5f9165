//! Container client abstraction.
//!
//! [`BlobContainer`] is the handful of operations blobmime needs from a
//! blob container: a reachability check, a paged listing that already carries
//! each blob's content-type, and a header-only content-type update. Blob names
//! are passed through exactly as the service lists them.

use std::fmt;

use futures::stream::BoxStream;

use crate::types::Error;

mod listed_blob;

pub use listed_blob::ListedBlob;

/// One page of a container listing.
pub type BlobPage = Vec<ListedBlob>;

/// A single blob container.
#[async_trait::async_trait]
pub trait BlobContainer: fmt::Debug + Send + Sync {
    /// Name of the container.
    fn name(&self) -> &str;

    /// Checks that the container exists and can be listed with the
    /// configured credentials.
    async fn verify_reachable(&self) -> Result<(), Error>;

    /// Lazily lists the blobs whose name starts with `prefix`, one service
    /// page at a time.
    ///
    /// The prefix is a plain string prefix, not a path segment: `img`
    /// matches `img-1.png` and `images/a.png`. An empty prefix lists the
    /// whole container.
    fn list_pages(&self, prefix: &str) -> BoxStream<'_, Result<BlobPage, Error>>;

    /// Replaces the content-type of `name` without touching its body.
    ///
    /// Every other content header (cache control, encoding, language,
    /// disposition, MD5) keeps its current value.
    async fn set_content_type(&self, name: &str, content_type: &str) -> Result<(), Error>;
}
