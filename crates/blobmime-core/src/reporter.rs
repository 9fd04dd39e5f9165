//! Presentation hooks for a reset run.

use crate::driver::RunSummary;
use crate::store::BlobEntry;

/// Receives progress events from the [`ResetDriver`](crate::ResetDriver).
///
/// Every method has an empty default body, so implementations only override
/// the events they render. With a concurrency above one, events for
/// different objects may interleave.
pub trait Reporter: Send + Sync {
    /// An object is about to be inspected.
    fn inspecting(&self, _entry: &BlobEntry) {}

    /// The object's extension has no mapping; it is left untouched.
    fn unknown(&self, _entry: &BlobEntry) {}

    /// The stored content-type already matches `content_type`.
    fn unchanged(&self, _entry: &BlobEntry, _content_type: &str) {}

    /// The content-type is about to be replaced with `content_type`.
    ///
    /// In a dry run this is the last event for the object.
    fn updating(&self, _entry: &BlobEntry, _content_type: &str, _dry_run: bool) {}

    /// The content-type was replaced.
    fn updated(&self, _entry: &BlobEntry, _content_type: &str) {}

    /// Reading or updating the object `name` failed; the run continues.
    fn failed(&self, _name: &str, _error: &(dyn std::error::Error + 'static)) {}

    /// The listing is exhausted.
    fn finished(&self, _summary: &RunSummary) {}
}

/// Discards every event.
impl Reporter for () {}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn inspecting(&self, entry: &BlobEntry) {
        (**self).inspecting(entry);
    }

    fn unknown(&self, entry: &BlobEntry) {
        (**self).unknown(entry);
    }

    fn unchanged(&self, entry: &BlobEntry, content_type: &str) {
        (**self).unchanged(entry, content_type);
    }

    fn updating(&self, entry: &BlobEntry, content_type: &str, dry_run: bool) {
        (**self).updating(entry, content_type, dry_run);
    }

    fn updated(&self, entry: &BlobEntry, content_type: &str) {
        (**self).updated(entry, content_type);
    }

    fn failed(&self, name: &str, error: &(dyn std::error::Error + 'static)) {
        (**self).failed(name, error);
    }

    fn finished(&self, summary: &RunSummary) {
        (**self).finished(summary);
    }
}
