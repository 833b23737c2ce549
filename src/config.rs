// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::atomic_write;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Context attached to any failure to load the config file.
pub const INVALID_CONFIG: &str = "Invalid configuration";

fn default_true() -> bool {
    true
}

fn default_url() -> String {
    "https://www.penriceacademy.org/page/?title=Term+Dates&pid=49".to_string()
}

fn default_titlecase_words() -> Vec<String> {
    ["term", "holiday", "half", "INSET"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn default_calendar_prefix() -> String {
    "Penrice".to_string()
}

fn default_prodid() -> String {
    "-//Penrice Academy//EN".to_string()
}

fn default_content_selectors() -> Vec<String> {
    vec![
        "section.user-content".to_string(),
        "div.content__region".to_string(),
    ]
}

fn default_skip_words() -> Vec<String> {
    vec![
        "privacy".to_string(),
        "cookies".to_string(),
        "updated".to_string(),
    ]
}

fn default_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_initial_retry_delay_ms() -> u64 {
    1000
}

fn default_output_path() -> PathBuf {
    PathBuf::from("penrice.ics")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("log.txt")
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_url")]
    pub url: String,

    /// Emit the events parsed straight from the page.
    #[serde(default = "default_true")]
    pub create_scraped_events: bool,
    /// Emit the holidays inferred between term end and term start.
    #[serde(default = "default_true")]
    pub create_holiday_events: bool,

    #[serde(default = "default_titlecase_words")]
    pub titlecase_words: Vec<String>,
    #[serde(default = "default_calendar_prefix")]
    pub calendar_prefix: String,
    #[serde(default = "default_prodid")]
    pub prodid: String,

    #[serde(default = "default_content_selectors")]
    pub content_selectors: Vec<String>,
    #[serde(default = "default_skip_words")]
    pub skip_words: Vec<String>,

    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            // Match the serde defaults
            create_scraped_events: true,
            create_holiday_events: true,
            titlecase_words: default_titlecase_words(),
            calendar_prefix: default_calendar_prefix(),
            prodid: default_prodid(),
            content_selectors: default_content_selectors(),
            skip_words: default_skip_words(),
            retries: 3,
            timeout_secs: 60,
            initial_retry_delay_ms: 1000,
            output_path: default_output_path(),
            log_path: default_log_path(),
        }
    }
}

impl Config {
    /// Load the configuration from the context's config file.
    /// Returns a contextualized error if the file is missing, unreadable or invalid.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }
        Self::load_from_path(&path)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    pub fn is_invalid_config_error(err: &Error) -> bool {
        err.chain().any(|cause| cause.to_string() == INVALID_CONFIG)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retries == 0 {
            anyhow::bail!("retries must be at least 1");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }
        if self.content_selectors.is_empty() {
            anyhow::bail!("content_selectors must name at least one selector");
        }
        Ok(())
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        atomic_write(&path, toml_str)?;
        Ok(path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_retry_delay(&self) -> Duration {
        Duration::from_millis(self.initial_retry_delay_ms)
    }
}
