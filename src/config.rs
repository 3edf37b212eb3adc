//! Runtime configuration.
//!
//! Values come from three layers, highest precedence first: the
//! `MAXSTUDIO_GRAPHQL_URL` environment variable (endpoint only), the
//! optional `config.toml` in the platform config directory, and the
//! built-in defaults below.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the GraphQL endpoint.
pub const ENDPOINT_ENV: &str = "MAXSTUDIO_GRAPHQL_URL";

/// Endpoint used when neither the environment nor the config file sets one.
pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:8000/graphql/";

pub const DEFAULT_PLAYER_COMMAND: &str = "mpv";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphQL endpoint. Overridden by [`ENDPOINT_ENV`].
    pub graphql_url: String,
    /// Directory of the durable credential store. Tilde is expanded.
    pub storage_dir: Option<String>,
    pub player: PlayerConfig,
    pub streaming: StreamingConfig,
}

/// External media player used as the playback surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Whether the player opens HLS playlists by itself.
    pub native_hls: bool,
}

/// Adaptive streaming session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Resolve master playlists client-side before handing a variant to the player.
    pub enabled: bool,
    /// Upper bound in bits per second when picking a variant.
    pub max_bandwidth: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            storage_dir: None,
            player: PlayerConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PLAYER_COMMAND.to_string(),
            args: Vec::new(),
            native_hls: true,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bandwidth: None,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing file yields the defaults; the endpoint override is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };

        config.apply_env_override(std::env::var(ENDPOINT_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Replace the endpoint with `value` when it is set and non-empty.
    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.graphql_url = url;
        }
    }

    /// Directory for the durable credential store.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Some(PathBuf::from(shellexpand::tilde(dir).to_string())),
            None => project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "maxstudio", "maxstudio")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
