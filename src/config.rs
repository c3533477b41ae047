use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default listing page (ZDZiT Olsztyn GTFS publisher).
const DEFAULT_LISTING_URL: &str = "https://zdzit.olsztyn.eu/gtfs/";
/// Default destination, relative to the working directory.
const DEFAULT_OUTPUT_PATH: &str = "gtfs_zdzit_olsztyn_latest.zip";

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_allow_insecure_fallback() -> bool {
    true
}

/// Global configuration loaded from `~/.config/gtfs-fetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Listing page that publishes the GTFS archives.
    pub listing_url: String,
    /// Destination path for the downloaded archive (overwritten each run).
    pub output_path: String,
    /// Whole-request timeout for the listing-page fetch, in seconds.
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    /// Retry once with TLS verification disabled after a verification
    /// failure. Set to false to fail hard on a bad certificate instead.
    #[serde(default = "default_allow_insecure_fallback")]
    pub allow_insecure_fallback: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            page_timeout_secs: default_page_timeout_secs(),
            allow_insecure_fallback: default_allow_insecure_fallback(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gtfs-fetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
