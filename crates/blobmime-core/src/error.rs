//! Error types for content-type reset runs.

use blobmime_object::types::Error as ObjectError;

/// Result type for blobmime-core operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that abort a run.
///
/// Per-object failures are not represented here: they are reported, counted
/// in the [`RunSummary`](crate::RunSummary) and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The container could not be opened (bad credential, missing container,
    /// authorization failure).
    #[error("failed to open {provider} container")]
    Connect {
        /// Provider identifier, e.g. `azure`.
        provider: &'static str,
        /// Underlying storage error.
        #[source]
        source: ObjectError,
    },

    /// A listing page could not be fetched.
    #[error("failed to list container objects")]
    Listing(#[source] ObjectError),

    /// A user-supplied extension mapping is invalid.
    #[error("invalid content-type mapping '{value}': {reason}")]
    InvalidMapping {
        /// The mapping as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl Error {
    /// Creates a new invalid mapping error.
    pub fn invalid_mapping(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMapping {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
