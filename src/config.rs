// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::model::enhance::{
    CATEGORY_KEYWORDS, HIGH_PRIORITY_KEYWORDS, LOW_PRIORITY_KEYWORDS, Vocabulary,
};
use crate::model::parser::ParseOptions;
use anyhow::{Context, Error, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_high_priority_keywords() -> Vec<String> {
    words(HIGH_PRIORITY_KEYWORDS)
}
fn default_low_priority_keywords() -> Vec<String> {
    words(LOW_PRIORITY_KEYWORDS)
}
fn default_category_keywords() -> Vec<String> {
    words(CATEGORY_KEYWORDS)
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Read a free-standing "ASAP" as `#high` in plain parsing too.
    #[serde(default)]
    pub asap_marker: bool,
    /// Run the keyword enhancer after parsing.
    #[serde(default = "default_true")]
    pub enhance: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_high_priority_keywords")]
    pub high_priority_keywords: Vec<String>,
    #[serde(default = "default_low_priority_keywords")]
    pub low_priority_keywords: Vec<String>,
    #[serde(default = "default_category_keywords")]
    pub category_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        // Match the serde defaults
        Self {
            asap_marker: false,
            enhance: true,
            log_level: default_log_level(),
            high_priority_keywords: default_high_priority_keywords(),
            low_priority_keywords: default_low_priority_keywords(),
            category_keywords: default_category_keywords(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        Ok(config)
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

    /// Detects whether an error means the config file was missing, either via
    /// the explicit message or an IO `NotFound` anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, toml_str)
            .with_context(|| format!("Failed to write '{}'", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace '{}'", path.display()))?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary {
            high_priority: self.high_priority_keywords.clone(),
            low_priority: self.low_priority_keywords.clone(),
            categories: self.category_keywords.clone(),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            asap_marker: self.asap_marker,
        }
    }

    /// Unknown level names fall back to `Warn`.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or_else(|_| {
            log::warn!("Unknown log_level '{}', using 'warn'", self.log_level);
            LevelFilter::Warn
        })
    }
}
