use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(
    name = "recipeshelf",
    version,
    about = "Browse recipes with a tiered memory/disk/network image cache",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "RECIPESHELF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Recipe list endpoint.
    #[arg(long, value_name = "URL", env = "RECIPESHELF_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Disk cache directory.
    #[arg(long, value_name = "PATH", env = "RECIPESHELF_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Memory cache budget in megabytes.
    #[arg(long, value_name = "MB")]
    pub memory_budget_mb: Option<u64>,

    /// Disk cache budget in megabytes.
    #[arg(long, value_name = "MB")]
    pub disk_budget_mb: Option<u64>,

    /// Network request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum concurrent image downloads.
    #[arg(long, value_name = "N")]
    pub max_concurrent_downloads: Option<usize>,

    /// Keep images in memory only.
    #[arg(long)]
    pub no_disk_cache: bool,

    /// Let concurrent requests for one image fetch independently.
    #[arg(long)]
    pub no_single_flight: bool,

    /// Only show recipes of this cuisine.
    #[arg(long, value_name = "NAME")]
    pub cuisine: Option<String>,

    /// Download thumbnails of the listed recipes into the cache.
    #[arg(long)]
    pub prefetch: bool,

    /// Print the available cuisines and exit.
    #[arg(long)]
    pub list_cuisines: bool,
}
