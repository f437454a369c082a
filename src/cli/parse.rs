//! CLI parse: clap types for metric-fanout. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// metric-fanout CLI - emit metric events through configured sinks
#[derive(Parser, Debug)]
#[command(name = "metric-fanout")]
#[command(about = "Fan metric events out to a fixed set of registered sinks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the well-known metric keys
    Keys {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Emit an event through the configured sinks and report what they saw
    Emit {
        /// Metric key; unknown keys are delivered as-is
        key: String,
        /// Signed integer value
        #[arg(long, conflicts_with_all = ["text", "error_code"], allow_hyphen_values = true)]
        value: Option<i64>,
        /// Text value
        #[arg(long, conflicts_with = "error_code")]
        text: Option<String>,
        /// Error code value
        #[arg(long)]
        error_code: Option<u32>,
        /// Number of times to emit
        #[arg(long, default_value = "1")]
        repeat: u32,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration
    Config {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
}
