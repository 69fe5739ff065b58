//! HTTP server command
//!
//! Opens the article store and runs the public site plus the admin editor.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use quire_core::{ArticleStore, MarkdownRenderer};
use quire_server::{run_server, AppState, Views};

use crate::config::QuireConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config, QUIRE_BIND and PORT)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: QuireConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }
    if let Some(timeout) = args.timeout {
        config.server.timeout_secs = timeout;
    }

    let store = ArticleStore::open(&config.data_dir).with_context(|| {
        format!("Failed to open article directory {}", config.data_dir.display())
    })?;
    let views = Views::new().context("Failed to compile page templates")?;

    if config.admin.is_none() {
        tracing::warn!(
            "No admin credentials configured (QUIRE_ADMIN_USER/QUIRE_ADMIN_PASSWORD); /admin is locked"
        );
    }

    let state = AppState::new(store, views, config.authorizer())
        .with_renderer(MarkdownRenderer::new(config.render_options()));

    tracing::info!("Starting quire server on {}", config.server.bind);

    // Run server (blocks until shutdown)
    run_server(state, config.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
