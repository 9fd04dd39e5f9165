//! In-memory [`BlobContainer`] for tests and local experiments.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use futures::stream::{self, BoxStream};

use crate::client::{BlobContainer, BlobPage, ListedBlob};
use crate::types::Error;

const LABEL: &str = "memory";

/// Content headers stored with an in-memory blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBlob {
    /// `Content-Type`.
    pub content_type: Option<String>,
    /// `Cache-Control`.
    pub cache_control: Option<String>,
    /// `Content-Language`.
    pub content_language: Option<String>,
}

impl MemoryBlob {
    /// Creates a blob with only a content-type.
    pub fn with_content_type(content_type: Option<&str>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            ..Default::default()
        }
    }
}

/// Container holding blob headers in a sorted map.
///
/// Names are stored verbatim and listed in lexicographic order, split into
/// pages of `page_size` entries.
#[derive(Debug)]
pub struct MemoryContainer {
    name: String,
    blobs: Mutex<BTreeMap<String, MemoryBlob>>,
    page_size: usize,
    list_calls: AtomicUsize,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl MemoryContainer {
    /// Creates an empty container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blobs: Mutex::default(),
            page_size: 5000,
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Sets the listing page size; zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds or replaces a blob with only a content-type.
    pub fn insert(&self, name: impl Into<String>, content_type: Option<&str>) {
        self.insert_blob(name, MemoryBlob::with_content_type(content_type));
    }

    /// Adds or replaces a blob.
    pub fn insert_blob(&self, name: impl Into<String>, blob: MemoryBlob) {
        self.blobs().insert(name.into(), blob);
    }

    /// Returns the headers stored for `name`.
    pub fn blob(&self, name: &str) -> Option<MemoryBlob> {
        self.blobs().get(name).cloned()
    }

    /// Number of listings started so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    fn blobs(&self) -> MutexGuard<'_, BTreeMap<String, MemoryBlob>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl BlobContainer for MemoryContainer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn verify_reachable(&self) -> Result<(), Error> {
        Ok(())
    }

    fn list_pages(&self, prefix: &str) -> BoxStream<'_, Result<BlobPage, Error>> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let listed: Vec<ListedBlob> = self
            .blobs()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, blob)| ListedBlob::new(name.clone(), blob.content_type.as_deref()))
            .collect();

        let pages: Vec<Result<BlobPage, Error>> = listed
            .chunks(self.page_size)
            .map(|page| Ok(page.to_vec()))
            .collect();

        stream::iter(pages).boxed()
    }

    async fn set_content_type(&self, name: &str, content_type: &str) -> Result<(), Error> {
        let mut blobs = self.blobs();
        let Some(blob) = blobs.get_mut(name) else {
            return Err(Error::runtime(
                format!("blob '{name}' does not exist"),
                LABEL,
                false,
            ));
        };
        blob.content_type = Some(content_type.to_string());
        Ok(())
    }
}
