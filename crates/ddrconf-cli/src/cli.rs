use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ddrconf",
    about = "DDR register configuration comparison and dump tool",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two timing datasets table by table
    Compare(CompareArgs),
    /// Print every table of one dataset with sizes and checksums
    Dump(DumpArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    /// Reference dataset (.json or .toml)
    pub left: PathBuf,
    /// Dataset to check against the reference
    pub right: PathBuf,
    /// Show a detailed list of duplicate registers
    #[arg(long)]
    pub list_duplicates: bool,
    /// Comparison settings file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the relocation lookahead window
    #[arg(long)]
    pub window: Option<usize>,
    /// Show long runs of matching registers inside reordered tables
    #[arg(long)]
    pub show_matched_runs: bool,
    /// Rows shown per side of a relocated block
    #[arg(long, default_value_t = ddrconf_report::DEFAULT_MAX_BLOCK_ROWS)]
    pub max_block_rows: usize,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Dataset to dump (.json or .toml)
    pub path: PathBuf,
}
