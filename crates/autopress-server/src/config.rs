//! Server configuration.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (AUTOPRESS_DIR, AUTOPRESS_DATABASE_PATH, HUGGINGFACE_API_KEY)
//! 2. Config file (<data dir>/config.toml)
//! 3. Default values

use anyhow::{Context, Result};
use autopress_core::generation::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use autopress_core::generation::{ClientOptions, GenerationParams};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::SchedulerConfig;

/// Environment variable holding the generation service credential
pub const API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

/// Environment variable overriding the database file location
pub const DATABASE_PATH_VAR: &str = "AUTOPRESS_DATABASE_PATH";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for autopress data
    pub data_dir: PathBuf,
    /// Path to configuration file
    pub config_path: PathBuf,
    /// Database path
    pub database_path: PathBuf,
    /// Generation service credential; `None` selects fallback content
    pub api_key: Option<String>,
    /// Generation service settings
    pub generation: GenerationSection,
    /// Parsed schedule
    pub schedule: SchedulerConfig,
}

/// On-disk `config.toml` layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub generation: GenerationSection,

    #[serde(default)]
    pub schedule: ScheduleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_length")]
    pub max_length: u32,

    #[serde(default = "default_min_length")]
    pub min_length: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSection {
    /// Daily generation time, `HH:MM` in UTC
    #[serde(default = "default_daily_at")]
    pub daily_at: String,

    #[serde(default = "default_target_inventory")]
    pub target_inventory: u64,

    #[serde(default = "default_replenish_delay_ms")]
    pub replenish_delay_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_length() -> u32 {
    GenerationParams::default().max_length
}

fn default_min_length() -> u32 {
    GenerationParams::default().min_length
}

fn default_temperature() -> f32 {
    GenerationParams::default().temperature
}

fn default_top_p() -> f32 {
    GenerationParams::default().top_p
}

fn default_daily_at() -> String {
    "02:00".to_string()
}

fn default_target_inventory() -> u64 {
    3
}

fn default_replenish_delay_ms() -> u64 {
    2000
}

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AUTOPRESS_DIR") {
        return PathBuf::from(dir);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".autopress")
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            daily_at: default_daily_at(),
            target_inventory: default_target_inventory(),
            replenish_delay_ms: default_replenish_delay_ms(),
        }
    }
}

impl GenerationSection {
    /// Client settings for the generation service
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            params: GenerationParams {
                max_length: self.max_length,
                min_length: self.min_length,
                temperature: self.temperature,
                top_p: self.top_p,
            },
        }
    }
}

impl ScheduleSection {
    /// Parse into scheduler settings, validating `daily_at`
    pub fn parse(&self) -> Result<SchedulerConfig> {
        let daily_at = NaiveTime::parse_from_str(self.daily_at.trim(), "%H:%M")
            .with_context(|| format!("Invalid schedule.daily_at {:?}, expected HH:MM", self.daily_at))?;

        Ok(SchedulerConfig {
            daily_at,
            target_inventory: self.target_inventory,
            replenish_delay: Duration::from_millis(self.replenish_delay_ms),
        })
    }
}

impl Config {
    /// Load configuration from the environment and the default data directory
    ///
    /// Standard directory structure:
    /// ```text
    /// ~/.autopress/
    /// ├── config.toml           # Optional configuration
    /// └── articles.db           # Article database
    /// ```
    pub fn load() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).ok();
        let database_path = std::env::var_os(DATABASE_PATH_VAR).map(PathBuf::from);
        Ok(Self::load_from(&default_data_dir(), api_key)?.with_database_path(database_path))
    }

    /// Replace the database location when an override is given
    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) {
            self.database_path = path;
        }
        self
    }

    /// Load configuration rooted at `data_dir`
    pub fn load_from(data_dir: &Path, api_key: Option<String>) -> Result<Self> {
        std::fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        let config_path = data_dir.join("config.toml");
        let file = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str::<FileConfig>(&content).context("Failed to parse config file")?
        } else {
            FileConfig::default()
        };

        let schedule = file.schedule.parse()?;
        let database_path = file
            .database_path
            .unwrap_or_else(|| data_dir.join("articles.db"));

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            config_path,
            database_path,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            generation: file.generation,
            schedule,
        })
    }
}
