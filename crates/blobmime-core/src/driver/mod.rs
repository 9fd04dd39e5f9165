//! Content-type reset driver.
//!
//! The driver consumes the container listing lazily and runs a
//! resolve → decide → update pipeline per object. Per-object failures are
//! reported and counted; only a failed listing page ends the run early.

mod config;
mod policy;
mod summary;

use blobmime_object::types::Error as ObjectError;
use futures::{StreamExt, TryStreamExt};

pub use config::DriverConfig;
pub use policy::{Decision, UpdatePolicy};
pub use summary::{Outcome, RunSummary};

use crate::TRACING_TARGET_DRIVER;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::resolver::ContentTypeResolver;
use crate::store::{BlobEntry, BlobStore};

/// Walks a container and fixes content-types.
#[derive(Debug)]
pub struct ResetDriver<S, R> {
    store: S,
    resolver: ContentTypeResolver,
    reporter: R,
    config: DriverConfig,
}

impl<S, R> ResetDriver<S, R>
where
    S: BlobStore,
    R: Reporter,
{
    /// Creates a driver over `store`, reporting through `reporter`.
    pub fn new(
        store: S,
        resolver: ContentTypeResolver,
        reporter: R,
        config: DriverConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            reporter,
            config,
        }
    }

    /// Processes every listed object and returns the run summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Listing`] if a listing page cannot be fetched.
    /// Failures on individual objects never end the run.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!(
            target: TRACING_TARGET_DRIVER,
            policy = %self.config.policy,
            dry_run = self.config.dry_run,
            concurrency = self.config.concurrency.get(),
            overrides = self.resolver.override_count(),
            "Content-type reset started"
        );

        let summary = self
            .store
            .list()
            .map(|item| self.process(item))
            .buffer_unordered(self.config.concurrency.get())
            .try_fold(RunSummary::default(), |mut summary, outcome| async move {
                summary.record(outcome);
                Ok(summary)
            })
            .await?;

        tracing::info!(
            target: TRACING_TARGET_DRIVER,
            inspected = summary.inspected,
            updated = summary.updated,
            unchanged = summary.unchanged,
            unknown = summary.unknown,
            would_update = summary.would_update,
            failed = summary.failed,
            "Content-type reset completed"
        );

        self.reporter.finished(&summary);
        Ok(summary)
    }

    async fn process(&self, item: Result<BlobEntry, ObjectError>) -> Result<Outcome> {
        let entry = item.map_err(Error::Listing)?;

        self.reporter.inspecting(&entry);

        let resolved = self.resolver.resolve(&entry.name);
        let content_type = match self
            .config
            .policy
            .decide(entry.content_type.as_deref(), resolved)
        {
            Decision::Unknown => {
                self.reporter.unknown(&entry);
                return Ok(Outcome::Unknown);
            }
            Decision::Unchanged(content_type) => {
                self.reporter.unchanged(&entry, &content_type);
                return Ok(Outcome::Unchanged);
            }
            Decision::Update(content_type) => content_type,
        };

        self.reporter
            .updating(&entry, &content_type, self.config.dry_run);
        if self.config.dry_run {
            return Ok(Outcome::WouldUpdate);
        }

        match self
            .store
            .set_content_type(&entry.name, &content_type)
            .await
        {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET_DRIVER,
                    name = %entry.name,
                    previous = ?entry.content_type,
                    content_type = %content_type,
                    "Object updated"
                );
                self.reporter.updated(&entry, &content_type);
                Ok(Outcome::Updated)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_DRIVER,
                    name = %entry.name,
                    error = %error,
                    retryable = error.is_retryable(),
                    "Object update failed"
                );
                self.reporter.failed(&entry.name, &error);
                Ok(Outcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;

    use futures::stream::{self, BoxStream};

    use super::*;

    /// Listing item for [`FakeStore`].
    enum Item {
        Entry(BlobEntry),
        PageFailure,
    }

    /// In-memory store recording every update call.
    #[derive(Default)]
    struct FakeStore {
        items: Vec<Item>,
        failing: HashSet<&'static str>,
        updates: Mutex<Vec<(String, String)>>,
    }

    impl FakeStore {
        fn with(entries: &[(&str, Option<&str>)]) -> Self {
            Self {
                items: entries
                    .iter()
                    .map(|(name, ct)| Item::Entry(BlobEntry::new(*name, *ct)))
                    .collect(),
                ..Default::default()
            }
        }

        fn failing_on(mut self, name: &'static str) -> Self {
            self.failing.insert(name);
            self
        }

        fn updates(&self) -> Vec<(String, String)> {
            let mut updates = self.updates.lock().unwrap().clone();
            updates.sort();
            updates
        }
    }

    #[async_trait::async_trait]
    impl BlobStore for FakeStore {
        fn list(&self) -> BoxStream<'_, Result<BlobEntry, ObjectError>> {
            stream::iter(self.items.iter().map(|item| match item {
                Item::Entry(entry) => Ok(entry.clone()),
                Item::PageFailure => Err(ObjectError::connection(
                    "container not found",
                    "fake",
                    false,
                )),
            }))
            .boxed()
        }

        async fn set_content_type(
            &self,
            name: &str,
            content_type: &str,
        ) -> Result<(), ObjectError> {
            if self.failing.contains(name) {
                return Err(ObjectError::runtime("permission denied", "fake", false));
            }
            self.updates
                .lock()
                .unwrap()
                .push((name.to_string(), content_type.to_string()));
            Ok(())
        }
    }

    /// Reporter capturing failed names and the finished summary.
    #[derive(Default)]
    struct Recorder {
        inspected: Mutex<Vec<String>>,
        failed: Mutex<Vec<String>>,
        finished: Mutex<Option<RunSummary>>,
    }

    impl Reporter for Recorder {
        fn inspecting(&self, entry: &BlobEntry) {
            self.inspected.lock().unwrap().push(entry.name.clone());
        }

        fn failed(&self, name: &str, _error: &(dyn std::error::Error + 'static)) {
            self.failed.lock().unwrap().push(name.to_string());
        }

        fn finished(&self, summary: &RunSummary) {
            *self.finished.lock().unwrap() = Some(*summary);
        }
    }

    fn driver<'a>(
        store: &'a FakeStore,
        reporter: &'a Recorder,
        config: DriverConfig,
    ) -> ResetDriver<&'a FakeStore, &'a Recorder> {
        ResetDriver::new(store, ContentTypeResolver::new(), reporter, config)
    }

    #[tokio::test]
    async fn mixed_container_updates_only_mismatch() {
        let store = FakeStore::with(&[
            ("a.json", Some("text/plain")),
            ("b.png", Some("image/png")),
            ("c.unknownext", Some("")),
        ]);
        let reporter = Recorder::default();

        let summary = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.inspected, 3);
        assert_eq!(
            store.updates(),
            vec![("a.json".to_string(), "application/json".to_string())]
        );
        assert_eq!(*reporter.finished.lock().unwrap(), Some(summary));
    }

    #[tokio::test]
    async fn equal_ignoring_case_is_not_updated() {
        let store = FakeStore::with(&[("b.PNG", Some("IMAGE/PNG"))]);
        let reporter = Recorder::default();

        let summary = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.updated, 0);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn keys_without_extension_are_left_alone() {
        let store = FakeStore::with(&[("LICENSE", None), ("v1.2/README", Some("text/plain"))]);
        let reporter = Recorder::default();

        let summary = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.unknown, 2);
        assert!(store.updates().is_empty());
        assert!(reporter.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_container() {
        let store = FakeStore::default();
        let reporter = Recorder::default();

        let summary = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn failed_update_does_not_stop_the_run() {
        let store = FakeStore::with(&[
            ("one.json", Some("text/plain")),
            ("two.json", Some("text/plain")),
            ("three.json", None),
            ("four.css", Some("text/plain")),
        ])
        .failing_on("two.json");
        let reporter = Recorder::default();

        let summary = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.inspected, 4);
        assert_eq!(summary.updated, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(store.updates().len(), summary.updated);
        assert_eq!(*reporter.failed.lock().unwrap(), vec!["two.json".to_string()]);
        assert_eq!(reporter.inspected.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn listing_failure_after_entries_stops_the_run() {
        let mut store = FakeStore::with(&[("a.json", Some("text/plain"))]);
        store.items.push(Item::PageFailure);
        store
            .items
            .push(Item::Entry(BlobEntry::new("later.json", Some("text/plain"))));
        let reporter = Recorder::default();

        let err = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Listing(_)));
        assert!(
            !reporter
                .inspected
                .lock()
                .unwrap()
                .contains(&"later.json".to_string())
        );
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let store = FakeStore {
            items: vec![Item::PageFailure],
            ..Default::default()
        };
        let reporter = Recorder::default();

        let err = driver(&store, &reporter, DriverConfig::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Listing(_)));
        assert!(store.updates().is_empty());
        assert!(reporter.inspected.lock().unwrap().is_empty());
        assert!(reporter.finished.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn always_policy_rewrites_correct_types() {
        let store = FakeStore::with(&[
            ("b.png", Some("image/png")),
            ("c.unknownext", None),
        ]);
        let reporter = Recorder::default();
        let config = DriverConfig::default().with_policy(UpdatePolicy::Always);

        let summary = driver(&store, &reporter, config).run().await.unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(
            store.updates(),
            vec![("b.png".to_string(), "image/png".to_string())]
        );
    }

    #[tokio::test]
    async fn dry_run_issues_no_updates() {
        let store = FakeStore::with(&[("a.json", Some("text/plain")), ("b.png", None)]);
        let reporter = Recorder::default();
        let config = DriverConfig::default().with_dry_run(true);

        let summary = driver(&store, &reporter, config).run().await.unwrap();

        assert_eq!(summary.would_update, 2);
        assert_eq!(summary.updated, 0);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn concurrent_run_counts_every_object() {
        let names: Vec<String> = (0..50).map(|i| format!("obj{i}.json")).collect();
        let entries: Vec<(&str, Option<&str>)> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let current = if i % 2 == 0 { "text/plain" } else { "application/json" };
                (name.as_str(), Some(current))
            })
            .collect();
        let store = FakeStore::with(&entries);
        let reporter = Recorder::default();
        let config = DriverConfig::default()
            .with_concurrency(NonZeroUsize::new(8).unwrap());

        let summary = driver(&store, &reporter, config).run().await.unwrap();

        assert_eq!(summary.inspected, 50);
        assert_eq!(summary.updated, 25);
        assert_eq!(summary.unchanged, 25);
        assert_eq!(store.updates().len(), 25);
    }
}
