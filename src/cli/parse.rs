//! CLI parse: clap types for autotitle. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// autotitle CLI - automatic titles for content records
#[derive(Parser)]
#[command(name = "autotitle")]
#[command(about = "Generate content record titles from per-bundle patterns")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/autotitle.toml is read from here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show title status of configured bundles
    Status {
        /// Only this entity type
        #[arg(long)]
        entity_type: Option<String>,
        /// Only this bundle (requires --entity-type)
        #[arg(long, requires = "entity_type")]
        bundle: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the titles records would receive, without changing them
    Preview {
        /// JSON file holding an array of records
        records: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Regenerate titles for records that need one
    Regenerate {
        /// JSON file holding an array of records
        records: PathBuf,
        /// Write changed records back to the file
        #[arg(long)]
        write: bool,
        /// Stop at the first failing record
        #[arg(long)]
        fail_fast: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands (validate, show)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the loaded configuration
    Validate,
    /// Print the effective configuration as TOML
    Show,
}
