//! Run report: per-domain counters and failures.

use chrono::{DateTime, Utc};
use serde::Serialize;

use contentseed_shared::{ContentDomain, SeedError};

use crate::upsert::UpsertOutcome;

/// Lifecycle of one domain within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    Pending,
    Running,
    Completed,
    CompletedWithFailures,
    /// The domain's source file does not exist.
    Skipped,
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DomainStatus::Pending => "pending",
            DomainStatus::Running => "running",
            DomainStatus::Completed => "completed",
            DomainStatus::CompletedWithFailures => "completed with failures",
            DomainStatus::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// A record that could not be seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    pub entry: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    #[serde(skip)]
    pub domain: ContentDomain,
    pub id: &'static str,
    pub status: DomainStatus,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Asset placeholders that could not be resolved and were dropped.
    pub assets_dropped: usize,
    pub failures: Vec<EntryFailure>,
}

impl DomainReport {
    pub fn new(domain: ContentDomain) -> Self {
        Self {
            domain,
            id: domain.id(),
            status: DomainStatus::Pending,
            created: 0,
            updated: 0,
            failed: 0,
            assets_dropped: 0,
            failures: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.created + self.updated
    }

    pub fn record_success(&mut self, outcome: &UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created(_) => self.created += 1,
            UpsertOutcome::Updated(_) => self.updated += 1,
        }
    }

    pub fn record_failure(&mut self, entry: &str, error: &SeedError) {
        self.failed += 1;
        self.failures.push(EntryFailure {
            entry: entry.to_string(),
            error: error.to_string(),
        });
    }

    /// Settle the final status once every entry has been processed.
    pub fn finish(&mut self) {
        self.status = if self.failed > 0 {
            DomainStatus::CompletedWithFailures
        } else {
            DomainStatus::Completed
        };
    }
}

/// Outcome of a whole run. Built as the run goes; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub domains: Vec<DomainReport>,
    pub assets_uploaded: usize,
    pub asset_cache_hits: usize,
}

impl RunReport {
    /// A report with every domain `Pending`.
    pub fn new(domains: &[ContentDomain], dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            domains: domains.iter().copied().map(DomainReport::new).collect(),
            assets_uploaded: 0,
            asset_cache_hits: 0,
        }
    }

    pub fn domain(&self, domain: ContentDomain) -> Option<&DomainReport> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    pub fn created(&self) -> usize {
        self.domains.iter().map(|d| d.created).sum()
    }

    pub fn updated(&self) -> usize {
        self.domains.iter().map(|d| d.updated).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.created() + self.updated()
    }

    pub fn failed(&self) -> usize {
        self.domains.iter().map(|d| d.failed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.domains
            .iter()
            .filter(|d| d.status == DomainStatus::Skipped)
            .count()
    }

    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}
