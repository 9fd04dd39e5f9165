//! Listing entries.

/// A blob as returned by a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedBlob {
    /// Blob name, exactly as stored.
    pub name: String,
    /// Stored content-type; `None` when the blob has none.
    pub content_type: Option<String>,
}

impl ListedBlob {
    /// Creates an entry, treating an empty content-type as absent.
    pub fn new(name: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type
                .map(str::trim)
                .filter(|ct| !ct.is_empty())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_type_is_absent() {
        assert_eq!(ListedBlob::new("a.bin", Some("")).content_type, None);
        assert_eq!(ListedBlob::new("a.bin", Some("  ")).content_type, None);
        assert_eq!(
            ListedBlob::new("a.json", Some("text/plain")).content_type.as_deref(),
            Some("text/plain")
        );
    }
}
