//! Per-domain seeding: transform, resolve assets, upsert, one entry at a
//! time.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, instrument, warn};

use contentseed_shared::{ContentDomain, Result};
use contentseed_store::DocumentStore;
use contentseed_transform::transform;

use crate::assets::AssetUploader;
use crate::pipeline::ProgressReporter;
use crate::report::{DomainReport, DomainStatus};
use crate::retry::RetryPolicy;
use crate::source::{SourceEntry, load_entries};
use crate::upsert::{UpsertOutcome, upsert};

/// Run-scoped state shared by every domain: the store, retry policy, and
/// asset cache.
pub struct Seeder<'a> {
    store: &'a dyn DocumentStore,
    retry: RetryPolicy,
    uploader: AssetUploader,
    data_dir: PathBuf,
    entry_delay: Duration,
}

impl<'a> Seeder<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        retry: RetryPolicy,
        data_dir: impl Into<PathBuf>,
        media_dir: impl Into<PathBuf>,
        entry_delay: Duration,
    ) -> Self {
        Self {
            store,
            retry,
            uploader: AssetUploader::new(media_dir),
            data_dir: data_dir.into(),
            entry_delay,
        }
    }

    pub fn uploader(&self) -> &AssetUploader {
        &self.uploader
    }

    /// Seed every entry of `domain` into `report`. Record failures are
    /// counted and never stop the domain.
    #[instrument(skip_all, fields(domain = domain.id()))]
    pub async fn seed_domain(
        &mut self,
        domain: ContentDomain,
        report: &mut DomainReport,
        progress: &dyn ProgressReporter,
    ) {
        let spec = domain.spec();
        report.status = DomainStatus::Running;

        let entries = match load_entries(&self.data_dir, &spec).await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                warn!(file = spec.file, "source file not found, skipping domain");
                report.status = DomainStatus::Skipped;
                progress.domain_finished(report);
                return;
            }
            Err(e) => {
                warn!(file = spec.file, error = %e, "could not load source file");
                report.record_failure(spec.file, &e);
                report.finish();
                log_summary(report);
                progress.domain_finished(report);
                return;
            }
        };

        let total = entries.len();
        progress.domain_started(&spec, total);
        info!(file = spec.file, entries = total, "seeding domain");

        for (index, entry) in entries.iter().enumerate() {
            if index > 0 && !self.entry_delay.is_zero() {
                tokio::time::sleep(self.entry_delay).await;
            }

            match self.seed_entry(domain, entry, report).await {
                Ok(outcome) => {
                    info!(
                        entry = %entry.key,
                        id = outcome.id(),
                        action = match outcome {
                            UpsertOutcome::Created(_) => "created",
                            UpsertOutcome::Updated(_) => "updated",
                        },
                        "entry seeded"
                    );
                    report.record_success(&outcome);
                    progress.entry_done(spec.id, &entry.key, true, index + 1, total);
                }
                Err(e) => {
                    warn!(entry = %entry.key, error = %e, "entry failed");
                    report.record_failure(&entry.key, &e);
                    progress.entry_done(spec.id, &entry.key, false, index + 1, total);
                }
            }
        }

        report.finish();
        log_summary(report);
        progress.domain_finished(report);
    }

    async fn seed_entry(
        &mut self,
        domain: ContentDomain,
        entry: &SourceEntry,
        report: &mut DomainReport,
    ) -> Result<UpsertOutcome> {
        let mut doc = transform(domain, &entry.key, &entry.value)?;
        let dropped = self
            .uploader
            .resolve_document(self.store, &self.retry, &mut doc.fields)
            .await;
        report.assets_dropped += dropped;
        upsert(self.store, &self.retry, &doc).await
    }
}

fn log_summary(report: &DomainReport) {
    info!(
        created = report.created,
        updated = report.updated,
        failed = report.failed,
        status = %report.status,
        "domain finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use contentseed_shared::DomainSpec;
    use contentseed_store::MemoryStore;
    use tokio::time::Instant;
    use uuid::Uuid;

    use crate::report::RunReport;

    /// Records when each entry finished.
    #[derive(Default)]
    struct Timeline {
        finished: Mutex<Vec<Instant>>,
    }

    impl ProgressReporter for Timeline {
        fn domain_started(&self, _spec: &DomainSpec, _entries: usize) {}
        fn entry_done(&self, _domain: &str, _entry: &str, _ok: bool, _current: usize, _total: usize) {
            self.finished.lock().unwrap().push(Instant::now());
        }
        fn domain_finished(&self, _report: &DomainReport) {}
        fn done(&self, _report: &RunReport) {}
    }

    #[tokio::test(start_paused = true)]
    async fn entries_are_spaced_by_the_configured_delay() {
        let root = std::env::temp_dir().join(format!("contentseed-seeder-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            root.join("faqs.json"),
            r#"{"a": {"title": "A"}, "b": {"title": "B"}, "c": {"title": "C"}}"#,
        )
        .unwrap();

        let store = MemoryStore::new();
        let delay = Duration::from_millis(300);
        let mut seeder = Seeder::new(&store, RetryPolicy::default(), &root, &root, delay);
        let mut report = DomainReport::new(ContentDomain::Faq);
        let timeline = Timeline::default();

        let start = Instant::now();
        seeder.seed_domain(ContentDomain::Faq, &mut report, &timeline).await;
        let elapsed = start.elapsed();
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(report.created, 3);
        let finished = timeline.finished.lock().unwrap();
        assert_eq!(finished.len(), 3);
        // No pause before the first entry, one between each later pair.
        assert!(finished[0] - start < delay);
        assert!(finished[1] - finished[0] >= delay);
        assert!(finished[2] - finished[1] >= delay);
        assert!(elapsed >= delay * 2);
    }
}
