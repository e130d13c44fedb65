use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::query::SearchOptions;

const APP_NAME: &str = "ocrfind";
const CONFIG_FILE: &str = "config.json";
const STORE_DIR: &str = "store";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fan per-image term matching out across the rayon pool
    #[serde(default = "default_parallel_evaluation")]
    pub parallel_evaluation: bool,

    /// Corpora smaller than this are always evaluated sequentially
    #[serde(default = "default_parallel_min_images")]
    pub parallel_min_images: usize,

    /// Maximum number of results printed by the CLI (0 = unlimited)
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_parallel_evaluation() -> bool {
    true
}

fn default_parallel_min_images() -> usize {
    256
}

fn default_limit() -> usize {
    0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            parallel_evaluation: default_parallel_evaluation(),
            parallel_min_images: default_parallel_min_images(),
            default_limit: default_limit(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Search options derived from this configuration
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.default_limit,
            parallel: self.parallel_evaluation,
            parallel_min_images: self.parallel_min_images,
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Default directory of the JSON record store
pub fn get_store_dir() -> Result<PathBuf> {
    Ok(get_app_data_dir()?.join(STORE_DIR))
}
