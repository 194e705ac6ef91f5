//! End-to-end `seed` pipeline: every selected domain, in registry order.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, instrument};

use contentseed_shared::{AppConfig, ContentDomain, DomainSpec};
use contentseed_store::DocumentStore;

use crate::report::{DomainReport, RunReport};
use crate::retry::RetryPolicy;
use crate::seeder::Seeder;

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Directory holding one JSON file per domain.
    pub data_dir: PathBuf,
    /// Root that media paths in records are relative to.
    pub media_dir: PathBuf,
    /// Domains to seed; always run in registry order.
    pub domains: Vec<ContentDomain>,
    pub retry: RetryPolicy,
    /// Pause between entries.
    pub entry_delay: Duration,
    /// Recorded on the report; the caller picks the store.
    pub dry_run: bool,
}

impl SeedOptions {
    /// Options for every domain, taken from a loaded config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            data_dir: config.content.data_dir.clone(),
            media_dir: config.content.media_dir.clone(),
            domains: ContentDomain::ALL.to_vec(),
            retry: RetryPolicy::from(&config.retry),
            entry_delay: Duration::from_millis(config.throttle.entry_delay_ms),
            dry_run: false,
        }
    }
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// A domain's source file was loaded.
    fn domain_started(&self, spec: &DomainSpec, entries: usize);
    /// One entry finished, successfully or not.
    fn entry_done(&self, domain: &str, entry: &str, ok: bool, current: usize, total: usize);
    /// A domain reached a terminal state.
    fn domain_finished(&self, report: &DomainReport);
    /// The run completed.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn domain_started(&self, _spec: &DomainSpec, _entries: usize) {}
    fn entry_done(&self, _domain: &str, _entry: &str, _ok: bool, _current: usize, _total: usize) {}
    fn domain_finished(&self, _report: &DomainReport) {}
    fn done(&self, _report: &RunReport) {}
}

/// Seed the selected domains one after another.
///
/// Record-level failures end up in the report; this never fails. Setup
/// problems (credentials, config) are the caller's to catch before calling.
#[instrument(skip_all, fields(store = store.name(), domains = options.domains.len()))]
pub async fn run_seed(
    store: &dyn DocumentStore,
    options: &SeedOptions,
    progress: &dyn ProgressReporter,
) -> RunReport {
    let domains = in_registry_order(&options.domains);
    let mut report = RunReport::new(&domains, options.dry_run);
    let mut seeder = Seeder::new(
        store,
        options.retry,
        &options.data_dir,
        &options.media_dir,
        options.entry_delay,
    );

    info!(
        data_dir = %options.data_dir.display(),
        media_dir = %options.media_dir.display(),
        dry_run = options.dry_run,
        "starting seed run"
    );

    for (domain, domain_report) in domains.iter().zip(report.domains.iter_mut()) {
        seeder.seed_domain(*domain, domain_report, progress).await;
    }

    report.assets_uploaded = seeder.uploader().uploads();
    report.asset_cache_hits = seeder.uploader().cache_hits();
    report.finished_at = Some(Utc::now());

    info!(
        created = report.created(),
        updated = report.updated(),
        failed = report.failed(),
        skipped = report.skipped(),
        assets_uploaded = report.assets_uploaded,
        asset_cache_hits = report.asset_cache_hits,
        "seed run finished"
    );
    progress.done(&report);
    report
}

/// Registry order, without duplicates.
fn in_registry_order(selected: &[ContentDomain]) -> Vec<ContentDomain> {
    ContentDomain::ALL
        .into_iter()
        .filter(|d| selected.contains(d))
        .collect()
}
