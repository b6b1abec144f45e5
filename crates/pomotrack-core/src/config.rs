//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Timer settings (durations, auto-start flags, long-break cadence)
//! - Task list display defaults
//!
//! Configuration is stored at `~/.config/pomotrack/config.toml`, or under
//! `$POMOTRACK_CONFIG_DIR` when that is set. Only preferences live here;
//! the session and the task list exist in memory only.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError, Result};
use crate::task::TaskFilter;
use crate::timer::Settings;

pub const CONFIG_DIR_ENV: &str = "POMOTRACK_CONFIG_DIR";
const CONFIG_FILE: &str = "config.toml";

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Filter applied by `task list` when none is given.
    #[serde(default)]
    pub default_filter: TaskFilter,
    /// Append interval progress to status lines.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_filter: TaskFilter::All,
            show_progress: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: Settings,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Returns `$POMOTRACK_CONFIG_DIR` or `~/.config/pomotrack/`, creating it.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn config_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pomotrack"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
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
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|_| ConfigError::invalid(key, format!("'{value}' is not a boolean")))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| {
                        ConfigError::invalid(key, format!("'{value}' is not a whole number"))
                    })?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(ConfigError::invalid(key, "is a table, not a value"));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load from the default directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?)
    }

    /// Load `config.toml` from `dir`, writing defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// See [`Config::load`]. A file with out-of-range timer values is
    /// rejected as well.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                cfg.timer.validate()?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(dir)?;
                tracing::info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let path = Self::path_in(dir);
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
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

    /// Set a value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the key's type, or the result fails settings validation. `self` is
    /// unchanged on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)
            .map_err(|e| CoreError::from(ConfigError::invalid(key, e.to_string())))?;
        updated.timer.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save to the default directory.
    ///
    /// # Errors
    ///
    /// See [`Config::set_value`] and [`Config::save`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// All settable keys with their current values, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, body) in sections {
                if let serde_json::Value::Object(fields) = body {
                    for (field, value) in fields {
                        let rendered = match value {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        out.push((format!("{section}.{field}"), rendered));
                    }
                }
            }
        }
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
