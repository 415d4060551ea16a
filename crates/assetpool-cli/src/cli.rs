//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "assetpool")]
#[command(about = "Export asset pools from a running process", version)]
pub struct Cli {
    /// Target configuration file
    #[arg(short, long, default_value = "assetpool.toml", env = "ASSETPOOL_CONFIG")]
    pub config: PathBuf,

    /// Attach to this PID instead of searching by process name
    #[arg(short, long)]
    pub pid: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the descriptor of each selected pool
    Pools(Selection),

    /// List the assets currently held in each selected pool
    List {
        #[command(flatten)]
        selection: Selection,

        /// Print handles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode and export the assets of each selected pool
    Export {
        #[command(flatten)]
        selection: Selection,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Ndjson)]
        format: ExportFormat,

        /// Output file (ndjson/json) or directory (raw); defaults to stdout or
        /// the configured output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Which asset types to operate on; everything registered when empty
#[derive(Args, Debug, Clone, Default)]
pub struct Selection {
    /// Asset type name (repeatable)
    #[arg(short, long = "asset")]
    pub assets: Vec<String>,

    /// Setting group, e.g. "Physics" (repeatable)
    #[arg(short, long = "group")]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One JSON object per asset
    Ndjson,
    /// A single JSON document grouped by asset type
    Json,
    /// Byte fields written as files
    Raw,
}
