//! Shared types, error model, and configuration for contentseed.
//!
//! This crate is the foundation depended on by all other contentseed crates.
//! It provides:
//! - [`SeedError`] — the unified error type
//! - The content-type registry ([`ContentDomain`], [`DomainSpec`], [`NaturalKey`])
//! - Configuration ([`AppConfig`], [`StoreCredentials`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ContentConfig, RetryConfig, StoreConfig, StoreCredentials,
    ThrottleConfig, init_config, load_config, load_config_from,
};
pub use error::{Result, SeedError};
pub use types::{ContentDomain, DomainSpec, NaturalKey, parse_domain_filter, slugify};
