//! Configuration for the casa remote.
//!
//! A small TOML file plus `CASA_*` environment overrides, validated and
//! translated into `casa_core::RemoteConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use casa_core::RemoteConfig;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Base address of the remote (e.g., "http://localhost:3000").
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub reconnect: ReconnectSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reconnect: ReconnectSettings::default(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

/// Reconnect backoff. Delays are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconnectSettings {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Unset retries forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_retries: None,
        }
    }
}

fn default_initial_delay_ms() -> u64 {
    1_000
}
fn default_max_delay_ms() -> u64 {
    30_000
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "casa", "casa").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("casa");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file is not an
/// error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CASA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Validate and build the runtime `RemoteConfig`.
    pub fn to_remote_config(&self) -> Result<RemoteConfig, ConfigError> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        let settings = &self.reconnect;

        if settings.initial_delay_ms == 0 {
            return Err(ConfigError::Validation {
                field: "reconnect.initial_delay_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if settings.max_delay_ms < settings.initial_delay_ms {
            return Err(ConfigError::Validation {
                field: "reconnect.max_delay_ms".into(),
                reason: format!(
                    "{} is below initial_delay_ms ({})",
                    settings.max_delay_ms, settings.initial_delay_ms
                ),
            });
        }

        Ok(RemoteConfig {
            endpoint,
            reconnect_initial_delay: Duration::from_millis(settings.initial_delay_ms),
            reconnect_max_delay: Duration::from_millis(settings.max_delay_ms),
            reconnect_max_retries: settings.max_retries,
        })
    }
}

/// Parse an endpoint and check it can be reached over a WebSocket.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" | "ws" | "wss" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("unsupported scheme '{other}' (use http, https, ws or wss)"),
        }),
    }
}
