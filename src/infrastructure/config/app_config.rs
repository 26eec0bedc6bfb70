//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;
use crate::infrastructure::image::CacheServiceConfig;
use crate::infrastructure::recipes::DEFAULT_RECIPES_ENDPOINT;

const APP_NAME: &str = "recipeshelf";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "recipeshelf";

const MEGABYTE: u64 = 1024 * 1024;
const MIN_TIMEOUT_SECS: u64 = 1;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level.
    #[default]
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Image cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Recipe list configuration.
    #[serde(default)]
    pub recipes: RecipesConfig,
}

/// Image cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Memory tier budget in bytes.
    #[serde(default = "default_memory_budget")]
    pub memory_budget_bytes: u64,

    /// Advisory disk tier budget in bytes.
    #[serde(default = "default_disk_budget")]
    pub disk_budget_bytes: u64,

    /// Disk tier directory. Defaults to the platform cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Persist images on disk.
    #[serde(default = "default_true")]
    pub disk_enabled: bool,

    /// Coalesce concurrent requests for the same image.
    #[serde(default = "default_true")]
    pub single_flight: bool,

    /// Network request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum concurrent image downloads when prefetching.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: default_memory_budget(),
            disk_budget_bytes: default_disk_budget(),
            cache_dir: None,
            disk_enabled: true,
            single_flight: true,
            fetch_timeout_secs: default_timeout_secs(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

impl CacheConfig {
    /// Returns the network timeout. Zero is raised to one second.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(if self.fetch_timeout_secs == 0 {
            MIN_TIMEOUT_SECS
        } else {
            self.fetch_timeout_secs
        })
    }

    /// Converts to the cache service configuration.
    #[must_use]
    pub fn to_service_config(&self) -> CacheServiceConfig {
        CacheServiceConfig {
            memory_budget_bytes: usize::try_from(self.memory_budget_bytes).unwrap_or(usize::MAX),
            disk_budget_bytes: self.disk_budget_bytes,
            cache_dir: self.cache_dir.clone(),
            disk_enabled: self.disk_enabled,
            single_flight: self.single_flight,
            fetch_timeout: self.fetch_timeout(),
            max_concurrent_downloads: self.max_concurrent_downloads,
        }
    }
}

/// Recipe list configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipesConfig {
    /// Recipe list endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_memory_budget() -> u64 {
    50 * MEGABYTE
}

const fn default_disk_budget() -> u64 {
    200 * MEGABYTE
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_concurrent_downloads() -> usize {
    4
}

fn default_endpoint() -> String {
    DEFAULT_RECIPES_ENDPOINT.to_string()
}

impl AppConfig {
    /// Applies command line overrides on top of file values.
    pub fn merge_args(&mut self, args: &CliArgs) {
        if let Some(path) = &args.config {
            self.config = Some(path.clone());
        }
        if let Some(path) = &args.log_path {
            self.log_path = Some(path.clone());
        }
        if let Some(level) = args.log_level {
            self.log_level = level;
        }
        if let Some(endpoint) = &args.endpoint {
            self.recipes.endpoint.clone_from(endpoint);
        }
        if let Some(dir) = &args.cache_dir {
            self.cache.cache_dir = Some(dir.clone());
        }
        if let Some(mb) = args.memory_budget_mb {
            self.cache.memory_budget_bytes = mb.saturating_mul(MEGABYTE);
        }
        if let Some(mb) = args.disk_budget_mb {
            self.cache.disk_budget_bytes = mb.saturating_mul(MEGABYTE);
        }
        if let Some(secs) = args.timeout_secs {
            self.cache.fetch_timeout_secs = secs;
        }
        if let Some(n) = args.max_concurrent_downloads {
            self.cache.max_concurrent_downloads = n;
        }
        if args.no_disk_cache {
            self.cache.disk_enabled = false;
        }
        if args.no_single_flight {
            self.cache.single_flight = false;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::default(),
            cache: CacheConfig::default(),
            recipes: RecipesConfig::default(),
        }
    }
}
