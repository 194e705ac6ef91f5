//! Application configuration for contentseed.
//!
//! Config lives at `./contentseed.toml` unless `--config` points elsewhere.
//! Environment variables and CLI flags override config file values, which
//! override defaults. The write token is never stored in the file; the file
//! only names the environment variable holding it.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SeedError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "contentseed.toml";

static PROJECT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid regex"));

static DATASET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9~][a-z0-9_-]{0,63}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Config structs (matching contentseed.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote store connection settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Local content locations.
    #[serde(default)]
    pub content: ContentConfig,

    /// Retry policy for remote calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Request throttling between entries.
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Remote project identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Dataset inside the project.
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Dated API version (`YYYY-MM-DD`).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Name of the env var holding the write token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Override for the API host, e.g. a local mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: default_dataset(),
            api_version: default_api_version(),
            token_env: default_token_env(),
            base_url: None,
        }
    }
}

fn default_dataset() -> String {
    "production".into()
}
fn default_api_version() -> String {
    "2024-01-01".into()
}
fn default_token_env() -> String {
    "CMS_WRITE_TOKEN".into()
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding one JSON file per content domain.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Root that media paths inside the JSON files are relative to.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            media_dir: default_media_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_media_dir() -> PathBuf {
    PathBuf::from("public")
}

/// `[retry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further retry.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}
fn default_initial_delay() -> u64 {
    1000
}

/// `[throttle]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Pause between two entries of the same domain.
    #[serde(default = "default_entry_delay")]
    pub entry_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            entry_delay_ms: default_entry_delay(),
        }
    }
}

fn default_entry_delay() -> u64 {
    300
}

// ---------------------------------------------------------------------------
// Resolved credentials (runtime, merged from config + environment)
// ---------------------------------------------------------------------------

/// Everything needed to talk to the remote store. Built once, before any
/// domain runs; failing to build it is a fatal precondition.
#[derive(Clone)]
pub struct StoreCredentials {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub token: String,
    pub base_url: Url,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl StoreConfig {
    /// Resolve credentials, reading the token from the configured env var.
    pub fn resolve_credentials(&self) -> Result<StoreCredentials> {
        let token = std::env::var(&self.token_env).ok();
        self.resolve_credentials_with(token)
    }

    /// Resolve credentials with an explicitly supplied token.
    pub fn resolve_credentials_with(&self, token: Option<String>) -> Result<StoreCredentials> {
        let project_id = match self.project_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(SeedError::config(
                    "project id not set. Set CMS_PROJECT_ID or [store].project_id",
                ));
            }
        };
        if !PROJECT_ID_RE.is_match(&project_id) {
            return Err(SeedError::config(format!(
                "invalid project id '{project_id}': expected lowercase letters, digits and dashes"
            )));
        }
        if !DATASET_RE.is_match(&self.dataset) {
            return Err(SeedError::config(format!(
                "invalid dataset name '{}'",
                self.dataset
            )));
        }

        let token = match token {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => {
                return Err(SeedError::config(format!(
                    "write token not found. Set the {} environment variable.",
                    self.token_env
                )));
            }
        };

        let raw_base = self
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{project_id}.api.sanity.io"));
        let base_url = Url::parse(&raw_base)
            .map_err(|e| SeedError::config(format!("invalid base url '{raw_base}': {e}")))?;

        Ok(StoreCredentials {
            project_id,
            dataset: self.dataset.clone(),
            api_version: self.api_version.trim_start_matches('v').to_string(),
            token,
            base_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `path`, or from `./contentseed.toml` when `None`.
/// Returns defaults if the default file does not exist; an explicit path
/// must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) => load_config_from(p),
        None => {
            let default_path = PathBuf::from(CONFIG_FILE_NAME);
            if !default_path.exists() {
                tracing::debug!(path = ?default_path, "config file not found, using defaults");
                return Ok(AppConfig::default());
            }
            load_config_from(&default_path)
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SeedError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SeedError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(SeedError::config(format!(
            "{} already exists",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SeedError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SeedError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| SeedError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("CMS_WRITE_TOKEN"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[store]
project_id = "abc123"

[retry]
max_retries = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.store.project_id.as_deref(), Some("abc123"));
        assert_eq!(config.store.dataset, "production");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert_eq!(config.throttle.entry_delay_ms, 300);
        assert_eq!(config.content.media_dir, PathBuf::from("public"));
    }

    #[test]
    fn credentials_require_project_id() {
        let store = StoreConfig::default();
        let err = store
            .resolve_credentials_with(Some("tok".into()))
            .unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));
        assert!(err.to_string().contains("project id"));
    }

    #[test]
    fn credentials_require_token() {
        let store = StoreConfig {
            project_id: Some("abc123".into()),
            token_env: "CS_TEST_NONEXISTENT_TOKEN_12345".into(),
            ..StoreConfig::default()
        };
        let err = store.resolve_credentials().unwrap_err();
        assert!(err.to_string().contains("CS_TEST_NONEXISTENT_TOKEN_12345"));

        let err = store.resolve_credentials_with(Some("   ".into())).unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));
    }

    #[test]
    fn credentials_default_base_url() {
        let store = StoreConfig {
            project_id: Some("abc123".into()),
            api_version: "v2023-05-03".into(),
            ..StoreConfig::default()
        };
        let creds = store.resolve_credentials_with(Some("secret".into())).unwrap();
        assert_eq!(creds.base_url.as_str(), "https://abc123.api.sanity.io/");
        assert_eq!(creds.api_version, "2023-05-03");
        assert!(!format!("{creds:?}").contains("secret"));
    }

    #[test]
    fn credentials_reject_bad_identifiers() {
        let store = StoreConfig {
            project_id: Some("Bad Project".into()),
            ..StoreConfig::default()
        };
        assert!(store.resolve_credentials_with(Some("t".into())).is_err());

        let store = StoreConfig {
            project_id: Some("abc".into()),
            dataset: "Prod Data".into(),
            ..StoreConfig::default()
        };
        assert!(store.resolve_credentials_with(Some("t".into())).is_err());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("cs-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);
        let _ = std::fs::remove_dir_all(&dir);

        init_config(&path).expect("first init");
        let loaded = load_config(Some(&path)).expect("load");
        assert_eq!(loaded.store.dataset, "production");
        assert!(init_config(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
