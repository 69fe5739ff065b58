//! quire CLI - a minimal markdown CMS
//!
//! Articles live as `<slug>.md` files in one directory. This binary provides:
//! - The HTTP server (`serve`): public article pages and the admin editor
//! - Article management from the shell (`new`, `list`, `show`, `delete`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::QuireConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "quire",
    author,
    version,
    about = "Minimal markdown CMS: one file per article, served over HTTP",
    long_about = "Store articles as markdown files with a small front matter header, \
                  publish them on a date, and edit them through a password-protected admin UI."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ./quire.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Article directory (overrides config and QUIRE_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (public site and admin editor)
    Serve(commands::serve::ServeArgs),
    /// Create an article and print its slug
    New(commands::articles::NewArgs),
    /// List articles, newest first
    List(commands::articles::ListArgs),
    /// Print an article body
    Show(commands::articles::ShowArgs),
    /// Delete an article
    Delete(commands::articles::DeleteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug })
        .context("Failed to initialize logging")?;

    // .env never overrides variables that are already set
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded .env from {}", path.display());
    }

    let mut config = QuireConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::New(args) => commands::run_new(args, &config)?,
        Commands::List(args) => commands::run_list(args, &config)?,
        Commands::Show(args) => commands::run_show(args, &config)?,
        Commands::Delete(args) => commands::run_delete(args, &config)?,
    }
    Ok(())
}
