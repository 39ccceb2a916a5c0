//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use rollcall::{CollisionPolicy, OutputFormat};
use std::path::PathBuf;

/// Rollcall: reconcile self-reported personnel records against reference rosters
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match an input file against reference rosters and export partitions
    Run {
        /// Path to the input file (XLSX/XLS/ODS/CSV/TSV)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory of reference files, one per category (CSV/TSV)
        #[arg(short, long, value_name = "DIR")]
        references: PathBuf,

        /// Input worksheet name (workbook inputs only)
        #[arg(short, long)]
        sheet: Option<String>,

        /// TOML file with column names and output labels
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path (default: filtered-<input stem>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "xlsx")]
        format: OutputFormat,

        /// How to resolve reference records sharing a key (last, first, reject)
        #[arg(long, value_name = "POLICY")]
        on_collision: Option<CollisionPolicy>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect a reference directory without reconciling anything
    References {
        /// Directory of reference files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// TOML file with column names
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
