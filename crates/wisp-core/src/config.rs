use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::{FetchOptions, DEFAULT_USER_AGENT};

/// Global configuration loaded from `~/.config/wisp/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WispConfig {
    /// `User-Agent` header sent with every HTTP request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// TCP connect deadline in seconds (missing or 0 = wait on the OS).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Per read/write socket deadline in seconds (missing or 0 = none).
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    /// File shown when no URI is given on the command line.
    #[serde(default)]
    pub default_file: Option<PathBuf>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for WispConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: Some(15),
            read_timeout_secs: Some(30),
            default_file: None,
        }
    }
}

impl WispConfig {
    /// Transport settings for the fetcher.
    pub fn fetch_options(&self) -> FetchOptions {
        let secs = |v: Option<u64>| v.filter(|s| *s > 0).map(Duration::from_secs);
        FetchOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: secs(self.connect_timeout_secs),
            read_timeout: secs(self.read_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wisp")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WispConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WispConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WispConfig = toml::from_str(&data)?;
    Ok(cfg)
}
