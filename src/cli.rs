//! CLI argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::config::FailurePolicy;

/// Keep a year/month symlink index of dated files
#[derive(Parser, Debug)]
#[command(name = "dateindex")]
#[command(about = "Watches source directories and indexes dated files as <target>/<year>/<month>/<file> symlinks")]
#[command(version)]
pub struct Cli {
    /// Index root directory
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Source directories to watch
    #[arg(value_name = "SOURCE", required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "DATEINDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// What a failed index mutation does (overrides the config file)
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_fs_error: Option<FailurePolicy>,

    /// Index files already present in the sources before watching
    #[arg(long)]
    pub scan_existing: bool,

    /// Watch only the top level of each source
    #[arg(long)]
    pub no_recursive: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
