use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::organ::Organ;

/// Backend origin used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Backend origin, e.g. `http://localhost:8000`. Stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    pub fn new(base: &str) -> Self {
        let trimmed = base.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            Self(DEFAULT_API_BASE.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an absolute endpoint path (`/api/identify`) onto the origin.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(DEFAULT_API_BASE.to_string())
    }
}

impl std::fmt::Display for ApiBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub api_base: Option<String>,
    pub default_organ: Option<Organ>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_default_organ(organ: Organ) -> Result<()> {
        Self::save_default_organ_to(&Self::get_config_path()?, organ)
    }

    /// Update only the default organ. A file that does not parse is left untouched.
    pub fn save_default_organ_to(path: &Path, organ: Organ) -> Result<()> {
        let mut config = Self::load_from(path)?;
        config.default_organ = Some(organ);
        config.save_to(path)
    }

    /// Resolve the backend origin. An explicit value (CLI flag or env var,
    /// already merged by the caller) wins over the config file.
    pub fn resolve_api_base(&self, explicit: Option<&str>) -> ApiBase {
        explicit
            .filter(|s| !s.trim().is_empty())
            .or(self.api_base.as_deref())
            .map(ApiBase::new)
            .unwrap_or_default()
    }

    pub fn organ(&self) -> Organ {
        self.default_organ.unwrap_or_default()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("ayurdrishti").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_trims_trailing_slash() {
        let base = ApiBase::new("http://example.test:9000/");
        assert_eq!(base.as_str(), "http://example.test:9000");
        assert_eq!(base.endpoint("/api/identify"), "http://example.test:9000/api/identify");
    }

    #[test]
    fn blank_api_base_falls_back_to_default() {
        assert_eq!(ApiBase::new("  ").as_str(), DEFAULT_API_BASE);
        assert_eq!(ApiBase::default().as_str(), "http://localhost:8000");
    }

    #[test]
    fn explicit_base_wins_over_config_file() {
        let config = Config {
            api_base: Some("http://from-file:8000".into()),
            default_organ: None,
        };
        assert_eq!(config.resolve_api_base(Some("http://flag:1")).as_str(), "http://flag:1");
        assert_eq!(config.resolve_api_base(None).as_str(), "http://from-file:8000");
        assert_eq!(config.resolve_api_base(Some("")).as_str(), "http://from-file:8000");
        assert_eq!(Config::new().resolve_api_base(None), ApiBase::default());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let missing = Config::load_from(&path).unwrap();
        assert!(missing.api_base.is_none());
        assert_eq!(missing.organ(), Organ::Leaf);

        let config = Config {
            api_base: Some("http://10.0.0.2:8000".into()),
            default_organ: Some(Organ::Bark),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(loaded.organ(), Organ::Bark);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn saving_organ_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base": "http://10.0.0.2:8000"}"#).unwrap();

        Config::save_default_organ_to(&path, Organ::Bark).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(loaded.organ(), Organ::Bark);
    }

    #[test]
    fn saving_organ_never_overwrites_a_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let broken = r#"{"api_base": "http://10.0.0.2:8000",}"#;
        fs::write(&path, broken).unwrap();

        assert!(Config::save_default_organ_to(&path, Organ::Bark).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }
}
