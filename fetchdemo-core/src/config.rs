use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    delay::LoaderDelay,
    location::{self, Location},
    posts::DEFAULT_POSTS_URL,
    weather::DEFAULT_WEATHER_BASE_URL,
};

/// User preferences stored on disk.
///
/// Example TOML:
/// ```toml
/// delay_ms = 500
/// default_location = "banff"
///
/// [endpoints]
/// posts_url = "https://jsonplaceholder.typicode.com/posts"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Minimum loader time; one of the [`LoaderDelay`] choices.
    pub delay_ms: Option<u64>,

    /// Location key used by the weather screen when none is given.
    pub default_location: Option<String>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Overrides for the two backends.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Endpoints {
    pub posts_url: Option<String>,
    pub weather_base_url: Option<String>,
}

impl Config {
    /// Configured loader delay, falling back to the default choice.
    pub fn loader_delay(&self) -> Result<LoaderDelay> {
        match self.delay_ms {
            None => Ok(LoaderDelay::default()),
            Some(ms) => LoaderDelay::try_from(ms).with_context(|| {
                "Invalid `delay_ms` in config.\n\
                 Hint: run `fetchdemo configure` to pick a supported value."
            }),
        }
    }

    pub fn set_loader_delay(&mut self, delay: LoaderDelay) {
        self.delay_ms = Some(delay.as_millis());
    }

    /// Configured default location, or Lake Louise when unset.
    pub fn default_location(&self) -> Result<&'static Location> {
        match self.default_location.as_deref() {
            None => Ok(location::default_location()),
            Some(key) => location::find(key).with_context(|| {
                "Invalid `default_location` in config.\n\
                 Hint: run `fetchdemo locations` to see the supported keys."
            }),
        }
    }

    pub fn set_default_location(&mut self, location: &Location) {
        self.default_location = Some(location.key.to_string());
    }

    pub fn posts_url(&self) -> &str {
        self.endpoints.posts_url.as_deref().unwrap_or(DEFAULT_POSTS_URL)
    }

    pub fn weather_base_url(&self) -> &str {
        self.endpoints
            .weather_base_url
            .as_deref()
            .unwrap_or(DEFAULT_WEATHER_BASE_URL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "fetchdemo", "fetchdemo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fetchdemo-config-test-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let cfg = Config::default();

        assert_eq!(cfg.loader_delay().unwrap(), LoaderDelay::default());
        assert_eq!(cfg.default_location().unwrap().key, "lake-louise");
        assert_eq!(cfg.posts_url(), DEFAULT_POSTS_URL);
        assert_eq!(cfg.weather_base_url(), DEFAULT_WEATHER_BASE_URL);
    }

    #[test]
    fn invalid_delay_carries_hint() {
        let cfg = Config {
            delay_ms: Some(123),
            ..Config::default()
        };
        let msg = format!("{:#}", cfg.loader_delay().unwrap_err());

        assert!(msg.contains("Invalid `delay_ms`"));
        assert!(msg.contains("123"));
    }

    #[test]
    fn unknown_location_carries_hint() {
        let cfg = Config {
            default_location: Some("narnia".into()),
            ..Config::default()
        };
        let msg = format!("{:#}", cfg.default_location().unwrap_err());

        assert!(msg.contains("Hint: run `fetchdemo locations`"));
        assert!(msg.contains("Unknown location 'narnia'"));
    }

    #[test]
    fn setters_store_keys() {
        let mut cfg = Config::default();
        cfg.set_loader_delay(LoaderDelay::try_from(2000_u64).unwrap());
        cfg.set_default_location(location::find("tokyo").unwrap());

        assert_eq!(cfg.delay_ms, Some(2000));
        assert_eq!(cfg.default_location().unwrap().name, "Tokyo");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let cfg = Config::load_from(&scratch_path("missing")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = scratch_path("save");
        let mut cfg = Config::default();
        cfg.set_loader_delay(LoaderDelay::try_from(500_u64).unwrap());
        cfg.endpoints.posts_url = Some("http://localhost:8080/posts".into());

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        let _ = fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(loaded, cfg);
        assert_eq!(loaded.posts_url(), "http://localhost:8080/posts");
    }

    #[test]
    fn malformed_file_reports_path() {
        let path = scratch_path("broken");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "delay_ms = [").unwrap();

        let err = Config::load_from(&path).unwrap_err().to_string();
        let _ = fs::remove_dir_all(path.parent().unwrap());

        assert!(err.contains("Failed to parse config file"));
    }
}
