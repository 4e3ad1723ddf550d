use crate::model::widgets::WidgetSet;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markup file shown instead of the bundled showcase
    pub page_path: Option<String>,
    pub widgets: WidgetSet,
    pub repo_owner: String,
    pub repo_name: String,
    pub api_base: String,
    /// Per-request timeout for the repository API
    pub api_timeout_ms: u64,
    /// Skip the network and show the fallback repository data
    pub offline: bool,
    pub toast_duration_ms: u64,
    pub tick_rate_ms: u64,
    /// Used when `CARD_SHOWCASE_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_path: None,
            widgets: WidgetSet::default(),
            repo_owner: "SyntaxSidekick".to_string(),
            repo_name: "modern-card-collection".to_string(),
            api_base: "https://api.github.com".to_string(),
            api_timeout_ms: 5000,
            offline: false,
            toast_duration_ms: 3000,
            tick_rate_ms: 50,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".card-showcase"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Key/value store backing the theme and form autosave
    pub fn store_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("store.json"))
    }

    pub fn log_dir() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("logs"))
    }

    /// Load the saved config, or the defaults when there is none
    pub fn load() -> Config {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }
}
