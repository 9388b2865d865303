//! Shell preferences persisted next to the data store.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::utils::{ensure_dir, PathResolver};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_UNLOCK_WARNING_THRESHOLD: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid configuration: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Where `export` writes files. Defaults to `<data dir>/exports`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// Consecutive failed unlocks before the shell shows the lockout warning.
    #[serde(default = "Config::default_unlock_warning_threshold")]
    pub unlock_warning_threshold: u32,
    /// Pretend the terminal has an enrolled biometric sensor.
    #[serde(default)]
    pub biometrics_hardware: bool,
}

impl Config {
    fn default_ui_color_enabled() -> bool {
        true
    }

    fn default_unlock_warning_threshold() -> u32 {
        DEFAULT_UNLOCK_WARNING_THRESHOLD
    }

    pub fn export_dir_or(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(base))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui_color_enabled: Self::default_ui_color_enabled(),
            export_dir: None,
            unlock_warning_threshold: Self::default_unlock_warning_threshold(),
            biometrics_hardware: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            path: PathResolver::config_file_in(base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means defaults; a malformed one is an error.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path());
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.unlock_warning_threshold, 5);
        assert_eq!(
            config.export_dir_or(temp.path()),
            temp.path().join("exports")
        );
    }

    #[test]
    fn save_and_reload() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path());
        let config = Config {
            ui_color_enabled: false,
            biometrics_hardware: true,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults_and_garbage_is_rejected() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path());
        ensure_dir(manager.path().parent().unwrap()).unwrap();
        fs::write(manager.path(), r#"{"ui_color_enabled": false}"#).unwrap();
        let config = manager.load().unwrap();
        assert!(!config.ui_color_enabled);
        assert_eq!(config.unlock_warning_threshold, 5);

        fs::write(manager.path(), "not json").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }
}
