use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::theme::ThemeMode;

/// Hosted chat endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://relie-backend-zq69.onrender.com/chat";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat endpoint receiving `POST {user_id, message}`
    pub endpoint: String,

    /// Maximum number of stored history entries; `0` keeps everything
    pub history_limit: usize,

    /// Where exported transcripts are written
    pub download_dir: PathBuf,

    /// Relie home directory
    #[serde(skip)]
    pub relie_home: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration. Sizes are in terminal columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: ThemeMode,
    pub sidebar_width: u16,
    pub sidebar_min: u16,
    pub sidebar_max: u16,
    /// Terminal widths at or below this hide the sidebar
    pub narrow_breakpoint: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            sidebar_width: 30,
            sidebar_min: 20,
            sidebar_max: 50,
            narrow_breakpoint: 76,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        let download_dir = dirs::download_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            history_limit: 200,
            download_dir,
            relie_home: home.join(".relie"),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `~/.relie/config.toml`
    pub fn load() -> Result<Self> {
        let relie_home = Self::default_home()?;
        fs::create_dir_all(&relie_home)
            .context("Failed to create .relie directory")?;

        let config_path = relie_home.join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.relie_home = relie_home;

        // First run: leave an editable copy of the defaults behind
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }

    /// Load configuration from an explicit file, falling back to defaults
    /// when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .context("Failed to read config file")?;
            toml::from_str::<Config>(&content)
                .context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.relie_home = Self::default_home()
            .unwrap_or_else(|_| Config::default().relie_home);
        config.ui.normalize();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = self.relie_home.join("config.toml");
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// History cap as understood by the store
    pub fn history_cap(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }

    /// Override the endpoint, e.g. from the command line
    pub fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
    }

    fn default_home() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".relie"))
    }
}

impl UiConfig {
    /// Keep the sidebar bounds ordered and the initial width inside them
    fn normalize(&mut self) {
        if self.sidebar_min > self.sidebar_max {
            std::mem::swap(&mut self.sidebar_min, &mut self.sidebar_max);
        }
        self.sidebar_width = self.sidebar_width.clamp(self.sidebar_min, self.sidebar_max);
    }
}
