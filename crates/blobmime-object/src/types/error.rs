//! Minimal error type for container operations.

use std::fmt;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// A lightweight error carrying a message, an optional source, and a
/// retryable flag.
pub struct Error {
    message: String,
    source: Option<BoxedError>,
    retryable: bool,
}

impl Error {
    /// Create a runtime error formatted as `[{label}] {msg}`.
    pub fn runtime(msg: impl fmt::Display, label: &str, retryable: bool) -> Self {
        Self::labelled(msg, label, retryable)
    }

    /// Create a connection error formatted as `[{label}] {msg}`.
    pub fn connection(msg: impl fmt::Display, label: &str, retryable: bool) -> Self {
        Self::labelled(msg, label, retryable)
    }

    /// Create a non-retryable configuration error formatted as `[{label}] {msg}`.
    pub fn config(msg: impl fmt::Display, label: &str) -> Self {
        Self::labelled(msg, label, false)
    }

    fn labelled(msg: impl fmt::Display, label: &str, retryable: bool) -> Self {
        Self {
            message: format!("[{label}] {msg}"),
            source: None,
            retryable,
        }
    }

    /// Attach a source error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether the caller should retry this operation.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("retryable", &self.retryable)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_labelled() {
        let err = Error::config("missing AccountName", "azure");
        assert_eq!(err.to_string(), "[azure] missing AccountName");
        assert!(!err.is_retryable());
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("boom");
        let err = Error::runtime("list failed", "azure", true).with_source(io);
        assert!(err.is_retryable());
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("boom".to_string())
        );
    }
}
