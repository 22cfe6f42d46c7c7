use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

pub const API_KEY_ENV: &str = "TIMEBRIDGE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub mapping_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            api_url: String::new(),
            api_key: String::new(),
            mapping_file: String::new(),
        }
    }
}

impl Settings {
    /// The API key, preferring the environment over the settings file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(self.api_key.clone()).filter(|k| !k.trim().is_empty()))
    }

    /// Mapping path from the command line, falling back to the stored one.
    pub fn mapping_path(&self, override_path: Option<&str>) -> Result<PathBuf> {
        match override_path {
            Some(p) => Ok(PathBuf::from(shellexpand_path(p))),
            None if !self.mapping_file.is_empty() => Ok(PathBuf::from(&self.mapping_file)),
            None => Err(BridgeError::Settings(
                "no mapping file configured. Pass --mapping or run `timebridge init --mapping <file>`."
                    .into(),
            )),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("timebridge")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("timebridge")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BridgeError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            api_url: "https://example.teamwork.com".to_string(),
            api_key: "twp_abc".to_string(),
            mapping_file: "/tmp/mapping.json".to_string(),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.api_url, "https://example.teamwork.com");
        assert_eq!(loaded.mapping_file, "/tmp/mapping.json");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert!(s.api_url.is_empty());
        assert!(s.mapping_file.is_empty());
    }

    #[test]
    fn test_mapping_path_requires_a_source() {
        let s = Settings::default();
        assert!(matches!(s.mapping_path(None), Err(BridgeError::Settings(_))));
        let s = Settings {
            mapping_file: "/etc/map.json".into(),
            ..Settings::default()
        };
        assert_eq!(s.mapping_path(None).unwrap(), PathBuf::from("/etc/map.json"));
    }

    #[test]
    fn test_stored_api_key_used_when_env_unset() {
        let s = Settings {
            api_key: "stored".into(),
            ..Settings::default()
        };
        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(s.resolved_api_key().as_deref(), Some("stored"));
        }
        let empty = Settings::default();
        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(empty.resolved_api_key(), None);
        }
    }
}
