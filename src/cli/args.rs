//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Convert Tygem (.gib), WBaduk (.ngf) and Pandanet (.ugf/.ugi) Go records to SGF
#[derive(Parser, Debug)]
#[command(name = "kifu2sgf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/kifu2sgf/kifu2sgf.toml)
    #[arg(short, long, global = true, env = "KIFU2SGF_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert record files (directories are searched recursively)
    Convert {
        /// Record files or directories
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        /// Write converted records into this directory
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output_dir: Option<PathBuf>,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,

        /// Print SGF to stdout instead of writing files
        #[arg(long, conflicts_with_all = ["output_dir", "force"])]
        stdout: bool,

        /// Extension of written records
        #[arg(short, long)]
        extension: Option<String>,
    },

    /// Show the normalized property tree of a record
    Show {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List supported record formats
    Formats,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
