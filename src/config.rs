//! dateindex configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. The merged [`IndexerConfig`] is immutable and shared
//! by every dispatcher.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{IndexError, Result};
use crate::reconciler::DEFAULT_DIR_MODE;

/// What a failed index mutation does to the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop every dispatcher and exit non-zero
    #[default]
    FailFast,
    /// Log the failure and keep watching
    SkipEvent,
}

/// Configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub index: IndexSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub policy: PolicySection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Index tree settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSection {
    /// Mode for created year/month directories
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            dir_mode: default_dir_mode(),
        }
    }
}

/// Watcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSection {
    #[serde(default = "default_true")]
    pub recursive: bool,

    #[serde(default)]
    pub scan_existing: bool,

    /// How long a dispatcher waits for an event before checking for shutdown
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_poll_timeout_ms() -> u64 {
    100
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            recursive: true,
            scan_existing: false,
            poll_timeout_ms: default_poll_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicySection {
    #[serde(default)]
    pub on_fs_error: FailurePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| IndexError::ConfigError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| IndexError::ConfigError {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Index root
    pub target: PathBuf,
    /// Directories to watch
    pub sources: Vec<PathBuf>,
    pub dir_mode: u32,
    pub recursive: bool,
    pub scan_existing: bool,
    pub poll_timeout: Duration,
    pub on_fs_error: FailurePolicy,
    pub log_level: String,
}

impl IndexerConfig {
    /// Build from defaults only
    pub fn new(target: impl Into<PathBuf>, sources: Vec<PathBuf>) -> Self {
        Self::from_file(target.into(), sources, ConfigFile::default())
    }

    fn from_file(target: PathBuf, sources: Vec<PathBuf>, file: ConfigFile) -> Self {
        Self {
            target,
            sources,
            dir_mode: file.index.dir_mode,
            recursive: file.watch.recursive,
            scan_existing: file.watch.scan_existing,
            poll_timeout: Duration::from_millis(file.watch.poll_timeout_ms.max(1)),
            on_fs_error: file.policy.on_fs_error,
            log_level: file.logging.level,
        }
    }

    /// Merge the config file named on the command line (if any) with the flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Self::from_file(cli.target.clone(), cli.sources.clone(), file);
        if let Some(policy) = cli.on_fs_error {
            config.on_fs_error = policy;
        }
        if cli.scan_existing {
            config.scan_existing = true;
        }
        if cli.no_recursive {
            config.recursive = false;
        }
        if cli.verbose {
            config.log_level = "debug".to_string();
        }
        Ok(config)
    }

    /// Check that every source is a directory and the target is not a file.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(IndexError::ConfigError {
                message: "at least one source directory is required".to_string(),
            });
        }
        for source in &self.sources {
            if !source.is_dir() {
                return Err(IndexError::ConfigError {
                    message: format!("source {} is not a directory", source.display()),
                });
            }
        }
        if self.target.exists() && !self.target.is_dir() {
            return Err(IndexError::ConfigError {
                message: format!("target {} is not a directory", self.target.display()),
            });
        }
        Ok(())
    }
}
