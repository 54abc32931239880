//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.apimenu/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::recycle::Creator;
use crate::core::state::DEFAULT_RETENTION_LABEL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiMenuConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub recycle: RecycleConfig,
    pub creator: Option<Creator>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub project_id: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RecycleConfig {
    pub retention_label: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 50;
pub const DEFAULT_PROJECT_ID: &str = "1";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub project_id: String,
    pub log_level: LevelFilter,
    pub retention_label: String,
    pub creator: Creator,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.apimenu/`, the home of config, ledger and log files.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".apimenu"))
}

/// Returns the path to `~/.apimenu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.apimenu/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ApiMenuConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ApiMenuConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ApiMenuConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ApiMenuConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ApiMenuConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# apimenu configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# project_id = "1"                   # Or set APIMENU_PROJECT_ID
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"

# [remote]
# base_url = "http://localhost:8001" # Or set APIMENU_BASE_URL
# token = "..."                      # Or set APIMENU_TOKEN
# timeout_secs = 50

# [recycle]
# retention_label = "30 days"

# [creator]
# id = "u1"
# name = "Jane Doe"
# username = "jane"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Overrides taken from the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub project_id: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ApiMenuConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &ApiMenuConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("APIMENU_BASE_URL"))
        .or_else(|| config.remote.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Token: env → config
    let token = env("APIMENU_TOKEN").or_else(|| config.remote.token.clone());

    // Project: CLI → env → config → default
    let project_id = cli
        .project_id
        .clone()
        .or_else(|| env("APIMENU_PROJECT_ID"))
        .or_else(|| config.general.project_id.clone())
        .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

    let log_level = match config.general.log_level.as_deref() {
        None => LevelFilter::Debug,
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using debug", level);
            LevelFilter::Debug
        }),
    };

    ResolvedConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        token,
        timeout_secs: config.remote.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        project_id,
        log_level,
        retention_label: config
            .recycle
            .retention_label
            .clone()
            .unwrap_or_else(|| DEFAULT_RETENTION_LABEL.to_string()),
        creator: config.creator.clone().unwrap_or_default(),
    }
}
