use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "treemerge",
    version,
    about = "Merge #include-style file trees and explore the inclusion graph",
    long_about = "Recursively expand include directives into a single flattened output and \
inspect how the included files relate: a logical reference tree and a physical folder tree, \
aligned row for row, with duplicates and cycles called out."
)]
pub struct Cli {
    /// Suppress non-essential status output
    #[arg(long, global = true, default_value_t = false)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve all includes and emit the flattened content
    Merge {
        /// Root file to expand
        file: PathBuf,
        /// Destination path; committed atomically, only after the whole
        /// merge succeeds. Defaults to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Path to a TOML configuration file (default: treemerge.toml next
        /// to the root file)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the inclusion hierarchy as a tree
    Tree {
        /// Root file to expand
        file: PathBuf,
        /// Which view to render (default: aligned, or the config's
        /// tree.default_view when set)
        #[arg(long, value_enum)]
        view: Option<TreeView>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Dump the dependency graph, occurrence counts, and duplicate ids
    Graph {
        /// Root file to expand
        file: PathBuf,
        /// Write JSON to this path instead of stdout
        #[arg(long)]
        json: Option<PathBuf>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeView {
    /// Logical reference tree
    Reference,
    /// Physical directory-grouped tree
    Folders,
    /// Both views side by side, row for row
    Aligned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
