use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `datastory` binary.
#[derive(Debug, Parser)]
#[command(
    name = "datastory",
    version,
    about = "Turn statistical analysis results into audience-specific narratives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration (threshold tables, rule cut-offs, story text)
    #[arg(short, long, global = true, env = "DATASTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write technical, business and general reports plus the insight export
    Report {
        /// Analysis-results JSON document
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the bundle is written into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// File name prefix for every file in the bundle
        #[arg(short, long, default_value = "analysis")]
        base_name: String,
    },

    /// Print one audience's report to stdout
    Render {
        #[arg(short, long)]
        input: PathBuf,

        /// technical, business or general
        #[arg(short, long, default_value = "technical")]
        audience: String,
    },

    /// Write the structured insight export
    Export {
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the executive dashboard
    Summary {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Classify a single metric value
    Classify {
        /// correlation, variance_explained or outlier_rate
        #[arg(short, long)]
        metric: String,

        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}
