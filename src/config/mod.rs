//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

use crate::error::AppForgeError;
use crate::wizard::guides::DEFAULT_REPORT_BASE_URL;
use crate::wizard::{SecretPolicy, SessionOptions, ValidationPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Wizard behavior
    #[serde(default)]
    pub wizard: WizardConfig,

    /// Export screen and guide output
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write debug logs as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardConfig {
    /// "lenient" (issues shown only) or "strict" (issues block Next)
    #[serde(default)]
    pub validation: ValidationPolicy,

    /// Clear the draft when starting over after an export
    #[serde(default)]
    pub clear_draft_on_reset: bool,

    /// Draft preset loaded at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Simulated build duration in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Directory guides are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Write passwords into the signing guide in plaintext
    #[serde(default)]
    pub include_passwords: bool,

    /// Report page opened from the export screen
    #[serde(default = "default_report_base_url")]
    pub report_base_url: String,
}

fn default_delay_ms() -> u64 {
    5500
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_base_url() -> String {
    DEFAULT_REPORT_BASE_URL.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            output_dir: default_output_dir(),
            include_passwords: false,
            report_base_url: default_report_base_url(),
        }
    }
}

impl ExportConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn secret_policy(&self) -> SecretPolicy {
        SecretPolicy::from_include_passwords(self.include_passwords)
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.config/appforge/config.toml
    /// 3. Local config: ./appforge.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        if let Some(system_config_path) = Self::system_config_path()
            && system_config_path.exists()
        {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = config.merge_from_file(&system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = config.merge_from_file(&local_config_path)?;
        }

        config = Self::apply_env_overrides(config)?;

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let config = Self::default().merge_from_file(path)?;
        let config = Self::apply_env_overrides(config)?;

        tracing::debug!("Configuration loaded successfully from custom path");
        Ok(config)
    }

    /// Get the system config path: ~/.config/appforge/config.toml
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("appforge").join("config.toml"))
    }

    /// Get the local config path: ./appforge.toml
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("./appforge.toml")
    }

    /// Overlay a TOML file on `self`. Only keys the file sets change, so a
    /// local file naming one key keeps the rest of the system config.
    fn merge_from_file(self, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let overlay: toml::Value = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        let mut merged = toml::Value::try_from(&self).context("Failed to serialize config")?;
        merge_values(&mut merged, overlay);
        merged
            .try_into()
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn apply_env_overrides(config: Self) -> Result<Self> {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// Apply `APPFORGE_*` overrides read through `lookup`
    fn apply_overrides_from<F>(mut config: Self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(log_level) = lookup("APPFORGE_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        if let Some(delay) = lookup("APPFORGE_EXPORT_DELAY_MS") {
            config.export.delay_ms = delay
                .trim()
                .parse()
                .with_context(|| format!("APPFORGE_EXPORT_DELAY_MS is not a number: {}", delay))?;
        }

        if let Some(dir) = lookup("APPFORGE_OUTPUT_DIR") {
            config.export.output_dir = PathBuf::from(dir);
        }

        if let Some(base) = lookup("APPFORGE_REPORT_BASE") {
            config.export.report_base_url = base;
        }

        Ok(config)
    }

    /// Options handed to each new wizard session
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            policy: self.wizard.validation,
            clear_draft_on_reset: self.wizard.clear_draft_on_reset,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(AppForgeError::Config(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            ))
            .into());
        }

        if url::Url::parse(&self.export.report_base_url).is_err() {
            return Err(AppForgeError::Config(format!(
                "export.report_base_url is not an absolute URL: {}",
                self.export.report_base_url
            ))
            .into());
        }

        if let Some(preset) = &self.wizard.preset
            && !preset.exists()
        {
            tracing::warn!("Configured preset does not exist: {:?}", preset);
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}

/// Recursively overlay tables; any other value replaces what was there
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
