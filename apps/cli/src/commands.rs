//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use contentseed_core::{
    DomainReport, DomainStatus, ProgressReporter, RunReport, SeedOptions, run_seed,
};
use contentseed_shared::{
    AppConfig, CONFIG_FILE_NAME, ContentDomain, DomainSpec, NaturalKey, init_config, load_config,
    parse_domain_filter,
};
use contentseed_store::{DocumentStore, HttpStore, MemoryStore};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// contentseed — seed a headless CMS from JSON content files.
#[derive(Parser)]
#[command(
    name = "contentseed",
    version,
    about = "Idempotently seed a headless CMS from local JSON content and media.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the config file (defaults to ./contentseed.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Upsert every content domain into the CMS.
    Seed(SeedArgs),

    /// List the known content domains in run order.
    Domains,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub(crate) struct SeedArgs {
    /// Only seed these domains (comma-separated ids, e.g. `seo,blog`).
    #[arg(long)]
    pub only: Option<String>,

    /// Run against an in-memory store; no credentials needed, nothing is
    /// written remotely.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the domain JSON files.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory media paths are relative to.
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Print the run report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreOverrides,
}

/// Store settings that override the config file.
#[derive(Args)]
pub(crate) struct StoreOverrides {
    /// CMS project id.
    #[arg(long, env = "CMS_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Target dataset.
    #[arg(long, env = "CMS_DATASET")]
    pub dataset: Option<String>,

    /// API version date, e.g. 2024-01-01.
    #[arg(long, env = "CMS_API_VERSION")]
    pub api_version: Option<String>,

    /// API base URL (defaults to the hosted API for the project).
    #[arg(long, env = "CMS_BASE_URL")]
    pub base_url: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default config file.
    Init,
    /// Print the resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "contentseed=info",
        1 => "contentseed=debug",
        _ => "contentseed=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Seed(args) => cmd_seed(config_path, args).await,
        Command::Domains => cmd_domains(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// seed
// ---------------------------------------------------------------------------

async fn cmd_seed(config_path: Option<&Path>, args: SeedArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args);

    let mut options = SeedOptions::from_config(&config);
    options.dry_run = args.dry_run;
    if let Some(only) = args.only.as_deref() {
        options.domains = parse_domain_filter(only)?;
    }
    if !options.data_dir.is_dir() {
        return Err(eyre!(
            "content directory {} does not exist",
            options.data_dir.display()
        ));
    }

    // Credentials are checked before any domain runs.
    let store: Box<dyn DocumentStore> = if args.dry_run {
        info!("dry run: writing to an in-memory store");
        Box::new(MemoryStore::new())
    } else {
        let credentials = config.store.resolve_credentials()?;
        info!(
            project_id = %credentials.project_id,
            dataset = %credentials.dataset,
            "seeding remote dataset"
        );
        Box::new(HttpStore::new(credentials)?)
    };

    let progress = CliProgress::new();
    let report = run_seed(store.as_ref(), &options, &progress).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &SeedArgs) {
    let overrides = &args.store;
    if let Some(project_id) = &overrides.project_id {
        config.store.project_id = Some(project_id.clone());
    }
    if let Some(dataset) = &overrides.dataset {
        config.store.dataset = dataset.clone();
    }
    if let Some(api_version) = &overrides.api_version {
        config.store.api_version = api_version.clone();
    }
    if let Some(base_url) = &overrides.base_url {
        config.store.base_url = Some(base_url.clone());
    }
    if let Some(data_dir) = &args.data_dir {
        config.content.data_dir = data_dir.clone();
    }
    if let Some(media_dir) = &args.media_dir {
        config.content.media_dir = media_dir.clone();
    }
}

fn print_summary(report: &RunReport) {
    println!();
    if report.dry_run {
        println!("  Dry run (in-memory store): nothing was written remotely.");
    }
    println!(
        "  {:<18} {:<24} {:>7} {:>7} {:>7}",
        "DOMAIN", "STATUS", "CREATED", "UPDATED", "FAILED"
    );
    for domain in &report.domains {
        println!(
            "  {:<18} {:<24} {:>7} {:>7} {:>7}",
            domain.id,
            domain.status.to_string(),
            domain.created,
            domain.updated,
            domain.failed
        );
    }
    println!();
    println!(
        "  Total: {} succeeded ({} created, {} updated), {} failed, {} skipped",
        report.succeeded(),
        report.created(),
        report.updated(),
        report.failed(),
        report.skipped()
    );
    println!(
        "  Assets: {} uploaded, {} cache hits",
        report.assets_uploaded, report.asset_cache_hits
    );
    if let Some(elapsed) = report.elapsed() {
        println!("  Time:   {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0);
    }

    let failures: Vec<_> = report
        .domains
        .iter()
        .flat_map(|d| d.failures.iter().map(move |f| (d.id, f)))
        .collect();
    if !failures.is_empty() {
        println!();
        println!("  Failures:");
        for (domain, failure) in failures {
            println!("    {domain}/{}: {}", failure.entry, failure.error);
        }
    }
    println!();
}

// ---------------------------------------------------------------------------
// Progress reporter (indicatif spinner)
// ---------------------------------------------------------------------------

struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn domain_started(&self, spec: &DomainSpec, entries: usize) {
        self.spinner
            .set_message(format!("Seeding {} ({entries} entries)", spec.id));
    }

    fn entry_done(&self, domain: &str, entry: &str, ok: bool, current: usize, total: usize) {
        let mark = if ok { "" } else { " (failed)" };
        self.spinner
            .set_message(format!("Seeding {domain} [{current}/{total}] {entry}{mark}"));
    }

    fn domain_finished(&self, report: &DomainReport) {
        if report.status == DomainStatus::Skipped {
            self.spinner.set_message(format!("Skipped {}", report.id));
        }
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// domains / config
// ---------------------------------------------------------------------------

fn cmd_domains() -> Result<()> {
    println!(
        "  {:<16} {:<22} {:<24} KEY",
        "DOMAIN", "FILE", "DOCUMENT TYPE"
    );
    for domain in ContentDomain::ALL {
        let spec = domain.spec();
        let key = match spec.natural_key {
            NaturalKey::Slug => "slug".to_string(),
            NaturalKey::Title => "title".to_string(),
            NaturalKey::Singleton(id) => format!("singleton ({id})"),
        };
        println!(
            "  {:<16} {:<22} {:<24} {key}",
            spec.id, spec.file, spec.doc_type
        );
    }
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    let path = init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_flags_parse() {
        let cli = Cli::try_parse_from([
            "contentseed",
            "seed",
            "--only",
            "seo,blog",
            "--dry-run",
            "--data-dir",
            "content",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Seed(args) => {
                assert_eq!(args.only.as_deref(), Some("seo,blog"));
                assert!(args.dry_run);
                assert_eq!(args.data_dir, Some(PathBuf::from("content")));
            }
            _ => panic!("expected seed"),
        }
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = AppConfig::default();
        let cli = Cli::try_parse_from([
            "contentseed",
            "seed",
            "--project-id",
            "abc123",
            "--dataset",
            "staging",
            "--media-dir",
            "static",
        ])
        .unwrap();
        let Command::Seed(args) = cli.command else {
            panic!("expected seed");
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.store.project_id.as_deref(), Some("abc123"));
        assert_eq!(config.store.dataset, "staging");
        assert_eq!(config.content.media_dir, PathBuf::from("static"));
    }
}
