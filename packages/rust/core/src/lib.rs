//! Core seeding logic for contentseed.
//!
//! This crate ties the store and the record transformers together: retrying
//! remote calls, uploading media once per run, upserting documents by
//! natural key, and running domains in registry order into a [`RunReport`].

pub mod assets;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod seeder;
pub mod source;
pub mod upsert;

pub use assets::AssetUploader;
pub use pipeline::{ProgressReporter, SeedOptions, SilentProgress, run_seed};
pub use report::{DomainReport, DomainStatus, EntryFailure, RunReport};
pub use retry::RetryPolicy;
pub use upsert::{UpsertOutcome, upsert};
