//! File extension to MIME type resolution.
//!
//! Lookups use the `mime_guess` table, the same extension mapping web
//! servers use. Resolution never fails: an unknown extension is a regular
//! `None` outcome that means "leave the object alone".

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Returns the lower-cased extension of the final path segment, including the
/// leading dot.
///
/// Keys without a `.` in their last segment, or ending in `.`, have no
/// extension.
///
/// ```
/// use blobmime_core::extension;
///
/// assert_eq!(extension("img/Logo.PNG").as_deref(), Some(".png"));
/// assert_eq!(extension("archive.tar.gz").as_deref(), Some(".gz"));
/// assert_eq!(extension("v1.2/README"), None);
/// ```
pub fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let dot = file_name.rfind('.')?;
    let ext = &file_name[dot..];
    (ext.len() > 1).then(|| ext.to_lowercase())
}

/// Resolves object keys to canonical content-types.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeResolver {
    overrides: HashMap<String, String>,
}

impl ContentTypeResolver {
    /// Creates a resolver backed by the standard extension table only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the mapping for `ext`, consulted before the standard
    /// table.
    ///
    /// `ext` is accepted with or without the leading dot and in any case.
    ///
    /// # Errors
    ///
    /// Returns an error if `ext` is empty or `content_type` is not a valid
    /// `type/subtype` MIME string.
    pub fn with_override(mut self, ext: &str, content_type: &str) -> Result<Self> {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() || ext.contains('/') {
            return Err(Error::invalid_mapping(ext, "extension must be a non-empty file suffix"));
        }

        let mime = mime::Mime::from_str(content_type.trim())
            .map_err(|e| Error::invalid_mapping(content_type, e.to_string()))?;

        self.overrides
            .insert(format!(".{}", ext.to_lowercase()), mime.to_string());
        Ok(self)
    }

    /// Adds every override in `overrides`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid mapping.
    pub fn with_overrides<'a>(
        self,
        overrides: impl IntoIterator<Item = &'a ContentTypeOverride>,
    ) -> Result<Self> {
        overrides.into_iter().try_fold(self, |resolver, o| {
            resolver.with_override(&o.extension, &o.content_type)
        })
    }

    /// Number of custom mappings.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Resolves the content-type for the object key `path`.
    ///
    /// Returns `None` when the key has no extension or the extension is not
    /// mapped.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let ext = extension(path)?;

        if let Some(content_type) = self.overrides.get(&ext) {
            return Some(content_type.clone());
        }

        mime_guess::from_ext(&ext[1..])
            .first_raw()
            .map(str::to_string)
    }
}

/// A user-supplied `.ext=type/subtype` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeOverride {
    /// Extension, as given.
    pub extension: String,
    /// Content-type, as given.
    pub content_type: String,
}

impl FromStr for ContentTypeOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((extension, content_type)) = s.split_once('=') else {
            return Err(Error::invalid_mapping(s, "expected '.ext=type/subtype'"));
        };

        let parsed = Self {
            extension: extension.trim().to_string(),
            content_type: content_type.trim().to_string(),
        };

        // Validate eagerly so the CLI rejects bad input at parse time.
        ContentTypeResolver::new().with_override(&parsed.extension, &parsed.content_type)?;
        Ok(parsed)
    }
}
