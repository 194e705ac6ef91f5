//! contentseed CLI — idempotent content seeding for a headless CMS.
//!
//! Reads one JSON file per content domain, uploads referenced media once,
//! and creates or patches documents by natural key.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine; the environment may already be set.
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
