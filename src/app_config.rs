use anyhow::{Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::language::{default_approximations, LanguageCode};

/// Application configuration module
/// This module handles loading, validating and saving configuration for the
/// translation core: backend availability, the cloud service endpoint, and
/// the (deliberately configurable) detection approximation table.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default source language short code, or "auto"
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Default target language short code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Neural backend configuration
    #[serde(default)]
    pub neural: NeuralConfig,

    /// Cloud fallback configuration
    #[serde(default)]
    pub cloud: CloudConfig,

    /// OCR language hint passed to the engine
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    /// Detector labels with no exact counterpart, collapsed to a supported
    /// short code. Lossy by design; kept in configuration so deployments can
    /// tune or disable the substitutions.
    #[serde(default = "default_detect_approximations")]
    pub detect_approximations: HashMap<String, String>,

    /// Whether to persist translation history
    #[serde(default = "default_history_enabled")]
    pub history_enabled: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Neural backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NeuralConfig {
    /// Whether the neural backend is configured at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Warm all three model handles at startup instead of on first use
    #[serde(default)]
    pub preload: bool,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self { enabled: true, preload: false }
    }
}

/// Cloud fallback configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloudConfig {
    /// Whether the cloud fallback is configured
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Service endpoint URL
    #[serde(default = "default_cloud_endpoint")]
    pub endpoint: String,

    /// API key, empty when the service does not require one
    #[serde(default)]
    pub api_key: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_cloud_endpoint(),
            api_key: String::new(),
        }
    }
}

/// Log level wrapper
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_cloud_endpoint() -> String {
    "https://libretranslate.com".to_string()
}

fn default_history_enabled() -> bool {
    true
}

fn default_true() -> bool {
    true
}

fn default_detect_approximations() -> HashMap<String, String> {
    default_approximations()
        .into_iter()
        .map(|(label, code)| (label, code.short().to_string()))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            neural: NeuralConfig::default(),
            cloud: CloudConfig::default(),
            ocr_language: default_ocr_language(),
            detect_approximations: default_detect_approximations(),
            history_enabled: default_history_enabled(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config file {}", path.as_ref().display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring invalid config file: {}", e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("failed to write config file {}", path.as_ref().display()))?;
        Ok(())
    }

    /// The default per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("echopath").join("conf.json"))
    }

    /// The approximation table with codes resolved; invalid entries are
    /// logged and skipped rather than guessed at
    pub fn approximations(&self) -> HashMap<String, LanguageCode> {
        let mut map = HashMap::new();
        for (label, short) in &self.detect_approximations {
            match LanguageCode::from_short(short) {
                Some(code) => {
                    map.insert(label.clone(), code);
                }
                None => warn!(
                    "Ignoring approximation {} -> {}: not a supported code",
                    label, short
                ),
            }
        }
        map
    }
}
