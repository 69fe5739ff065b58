//! quire configuration
//!
//! Layered, lowest to highest priority: built-in defaults, a TOML file
//! (`--config PATH`, or `./quire.toml` when present), environment variables
//! (a `.env` file is loaded first), then command-line flags.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quire_core::RenderOptions;
use quire_server::{Authorizer, DenyAll, ServerConfig, StaticCredentials};
use serde::Deserialize;
use tracing::warn;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "quire.toml";

/// Port used when `PORT` is set but unusable
const FALLBACK_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    /// Directory holding the `<slug>.md` files
    pub data_dir: PathBuf,
    pub server: ServerSection,
    /// Admin account; `/admin` stays locked without one
    pub admin: Option<AdminConfig>,
    pub render: RenderSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Markdown extensions, mirroring `quire_core::RenderOptions`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub allow_raw_html: bool,
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            server: ServerSection::default(),
            admin: None,
            render: RenderSection::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            bind: server.bind_addr,
            cors_permissive: server.cors_permissive,
            timeout_secs: server.request_timeout.as_secs(),
        }
    }
}

impl Default for RenderSection {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            tables: options.tables,
            footnotes: options.footnotes,
            strikethrough: options.strikethrough,
            tasklists: options.tasklists,
            allow_raw_html: options.allow_raw_html,
        }
    }
}

impl QuireConfig {
    /// Load from an explicit path (must exist), else `./quire.toml` if
    /// present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.is_file() {
                    return Ok(Self::default());
                }
                local
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML")
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Recognised: `QUIRE_DATA_DIR`, `QUIRE_BIND`, `PORT`,
    /// `QUIRE_ADMIN_USER` with `QUIRE_ADMIN_PASSWORD`, `QUIRE_CORS_PERMISSIVE`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QUIRE_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(bind) = lookup("QUIRE_BIND") {
            match bind.parse() {
                Ok(addr) => self.server.bind = addr,
                Err(_) => warn!("Invalid QUIRE_BIND value: {bind}. Keeping {}.", self.server.bind),
            }
        }

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.bind.set_port(port),
                Err(_) => {
                    warn!("Invalid PORT environment variable: {port}. Defaulting to {FALLBACK_PORT}.");
                    self.server.bind.set_port(FALLBACK_PORT);
                }
            }
        }

        match (lookup("QUIRE_ADMIN_USER"), lookup("QUIRE_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => {
                self.admin = Some(AdminConfig { username, password });
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("QUIRE_ADMIN_USER and QUIRE_ADMIN_PASSWORD must be set together; ignoring");
            }
            (None, None) => {}
        }

        if let Some(value) = lookup("QUIRE_CORS_PERMISSIVE") {
            match parse_flag(&value) {
                Some(flag) => self.server.cors_permissive = flag,
                None => warn!("Invalid QUIRE_CORS_PERMISSIVE value: {value}"),
            }
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.server.bind,
            cors_permissive: self.server.cors_permissive,
            request_timeout: Duration::from_secs(self.server.timeout_secs),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            tables: self.render.tables,
            footnotes: self.render.footnotes,
            strikethrough: self.render.strikethrough,
            tasklists: self.render.tasklists,
            allow_raw_html: self.render.allow_raw_html,
        }
    }

    pub fn authorizer(&self) -> Arc<dyn Authorizer> {
        match &self.admin {
            Some(admin) => Arc::new(StaticCredentials::new(&admin.username, &admin.password)),
            None => Arc::new(DenyAll),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
