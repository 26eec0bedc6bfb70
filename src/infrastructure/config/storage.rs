use super::app_config::AppConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// The config path has no parent to create.
    #[error("config path {0:?} has no parent directory")]
    NoParent(PathBuf),
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The config could not be serialized.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Reads and writes a single `config.toml`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Resolves the config file: `explicit` when given, else the platform default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` if no explicit path is given and
    /// the platform has no config directory.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_config_path().ok_or(ConfigError::ConfigDirNotFound)?,
        };
        Ok(Self { path })
    }

    /// Returns the resolved config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration. A missing file is created with defaults; an
    /// unparsable one is left alone and defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Config file not found, writing defaults");
            let config = AppConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let text = fs::read_to_string(&self.path)?;
        let config = toml::from_str::<AppConfig>(&text).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Invalid config file, using defaults");
            AppConfig::default()
        });
        debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }

    /// Atomically replaces the config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be serialized or written.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| ConfigError::NoParent(self.path.clone()))?;
        fs::create_dir_all(dir)?;

        let text = toml::to_string_pretty(config)?;
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(text.as_bytes())?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let store = ConfigStore::locate(Some(&path)).unwrap();

        let config = store.load().unwrap();

        assert!(config.cache.disk_enabled);
        assert_eq!(store.path(), path.as_path());
        assert!(path.exists());
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.cache.fetch_timeout_secs, config.cache.fetch_timeout_secs);
    }

    #[test]
    fn test_loads_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[cache]\nfetch_timeout_secs = 7\n").unwrap();

        let config = ConfigStore::locate(Some(&path)).unwrap().load().unwrap();

        assert_eq!(config.cache.fetch_timeout_secs, 7);
        assert!(config.cache.single_flight);
    }

    #[test]
    fn test_invalid_file_falls_back_and_is_kept() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let config = ConfigStore::locate(Some(&path)).unwrap().load().unwrap();

        assert_eq!(config.cache.fetch_timeout_secs, 30);
        assert_eq!(fs::read_to_string(&path).unwrap(), "this is = = not toml");
    }

    #[test]
    fn test_save_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::locate(Some(&temp.path().join("config.toml"))).unwrap();
        let mut config = AppConfig::default();
        config.cache.max_concurrent_downloads = 9;

        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap().cache.max_concurrent_downloads, 9);
    }
}
