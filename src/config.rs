//! Startup configuration.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. a YAML file named by `LANTERN_CONFIG`
//! 3. individual environment variables (`LISTEN`, `WEB_ROOT`, ...)
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:8080"
//!   max_connections: 256
//!   read_timeout_ms: 10000
//! static_files:
//!   root: "./www"
//! ```

use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_VAR: &str = "LANTERN_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub listen_addr: String,
    /// Upper bound on connections handled at once. `0` means unbounded.
    pub max_connections: usize,
    /// Longest accepted request line, terminator included.
    pub max_request_line: usize,
    /// How long to wait for the request line. Unset means wait forever.
    pub read_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_connections: 1024,
            max_request_line: 4096,
            read_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Web root; every served file lives under it.
    pub root: PathBuf,
    /// File served for `/`.
    pub index_file: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./www"),
            index_file: "index.html".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    pub fn load_from<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Some(max) = lookup("MAX_CONNECTIONS") {
            cfg.server.max_connections = parse_var("MAX_CONNECTIONS", &max)?;
        }
        if let Some(max) = lookup("MAX_REQUEST_LINE") {
            cfg.server.max_request_line = parse_var("MAX_REQUEST_LINE", &max)?;
        }
        if let Some(ms) = lookup("READ_TIMEOUT_MS") {
            cfg.server.read_timeout_ms = Some(parse_var("READ_TIMEOUT_MS", &ms)?);
        }
        if let Some(root) = lookup("WEB_ROOT") {
            cfg.static_files.root = PathBuf::from(root);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.max_request_line == 0 {
            bail!("server.max_request_line must be greater than zero");
        }
        let mut parts = Path::new(&self.static_files.index_file).components();
        let single_name = matches!(parts.next(), Some(Component::Normal(_))) && parts.next().is_none();
        if !single_name {
            bail!(
                "static_files.index_file must be a plain file name, got {:?}",
                self.static_files.index_file
            );
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{name} must be a number, got {value:?}"))
}
