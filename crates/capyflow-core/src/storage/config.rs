//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default focus/break durations for a fresh state
//! - Engagement thresholds (line break, idle sleep, wake animation)
//! - Log level
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::app::Tunables;
use crate::capy::WAKE_SECS;
use crate::engagement::{AWAY_THRESHOLD_SECS, IDLE_TIMEOUT_SECS};
use crate::error::{ConfigError, CoreError};
use crate::timer::{DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN};

pub const CONFIG_FILE: &str = "config.toml";

/// Durations used when no persisted state exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementConfig {
    #[serde(default = "default_away_threshold")]
    pub away_threshold_secs: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_wake_secs")]
    pub wake_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `CAPYFLOW_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub engagement: EngagementConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_focus_duration() -> u32 {
    DEFAULT_FOCUS_MIN
}
fn default_break_duration() -> u32 {
    DEFAULT_BREAK_MIN
}
fn default_away_threshold() -> u32 {
    AWAY_THRESHOLD_SECS
}
fn default_idle_timeout() -> u64 {
    IDLE_TIMEOUT_SECS
}
fn default_wake_secs() -> u64 {
    WAKE_SECS
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            break_duration: default_break_duration(),
        }
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            away_threshold_secs: default_away_threshold(),
            idle_timeout_secs: default_idle_timeout(),
            wake_secs: default_wake_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(format!("{e}")))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot set a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `<data dir>/config.toml`.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Change one value in memory, keeping the existing value's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// [`Config::apply`] then save to the data directory.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Every key with its current value, as TOML.
    pub fn list(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".into(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Overwrite the stored config with defaults.
    pub fn reset() -> Result<Self, CoreError> {
        let cfg = Self::default();
        cfg.save()?;
        Ok(cfg)
    }

    pub fn tunables(&self) -> Tunables {
        Tunables {
            away_threshold_secs: self.engagement.away_threshold_secs.max(1),
            idle_timeout_secs: self.engagement.idle_timeout_secs,
            wake_secs: self.engagement.wake_secs,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("[engagement]\naway_threshold_secs = 45\n").unwrap();
        assert_eq!(parsed.engagement.away_threshold_secs, 45);
        assert_eq!(parsed.engagement.idle_timeout_secs, 300);
        assert_eq!(parsed.defaults.focus_duration, 25);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.focus_duration").as_deref(), Some("25"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("warn"));
        assert!(cfg.get("defaults.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.apply("engagement.wake_secs", "3").unwrap();
        cfg.apply("logging.level", "debug").unwrap();
        assert_eq!(cfg.engagement.wake_secs, 3);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("defaults.long_break", "15"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.apply("nope", "1").is_err());
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("defaults.focus_duration", "soon"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(cfg.apply("engagement", "{}").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("defaults.break_duration", "10").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().defaults.break_duration, 10);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "defaults = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn tunables_follow_engagement_section() {
        let mut cfg = Config::default();
        cfg.apply("engagement.away_threshold_secs", "0").unwrap();
        let t = cfg.tunables();
        assert_eq!(t.away_threshold_secs, 1);
        assert_eq!(t.idle_timeout_secs, 300);
    }
}
