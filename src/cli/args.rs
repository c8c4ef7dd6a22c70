//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Search and highlight leaf labels of a rendered SVG tree
#[derive(Parser, Debug)]
#[command(name = "treesites")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show and color labels containing the query
    Search {
        /// Rendered tree (SVG)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Query text; defaults to the value stored in the input field
        #[arg(short, long)]
        query: Option<String>,
        /// Treat the query as a regular expression
        #[arg(long)]
        regex: bool,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Hide all labels and empty the query field
    Clear {
        /// Rendered tree (SVG)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Highlight the label of one leaf, as if its marker was clicked
    Highlight {
        /// Rendered tree (SVG)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        marker: MarkerArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List leaves with their label state
    Leaves {
        /// Rendered tree (SVG)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

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

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Write the result here instead of rewriting the input
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct MarkerArgs {
    /// Element id of the marker
    #[arg(long)]
    pub id: Option<String>,
    /// Position of the leaf in document order (0-based)
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file location
    Path,
    /// Print a commented template
    Template,
}
