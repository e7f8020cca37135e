use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command line interface for citemark
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "citemark: highlight cited chunks in rendered HTML"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// Where the chunks to highlight come from.
#[derive(Args, Debug, Clone, Default)]
pub struct ChunkArgs {
  /// JSON file with the chunks: an array of strings, an array of objects
  /// with a `text` field, or an object with a `chunks` array.
  #[arg(long = "chunks")]
  pub chunks_file: Option<PathBuf>,

  /// A chunk given inline (can be specified multiple times)
  #[arg(long = "chunk", action = clap::ArgAction::Append)]
  pub chunk: Vec<String>,
}

/// All supported subcommands for the citemark CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new citemark configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "citemark.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Highlight chunks in one or more HTML documents.
  Highlight {
    /// HTML file or directory to process (can be specified multiple times).
    #[arg(short, long, required = true, action = clap::ArgAction::Append)]
    input: Vec<PathBuf>,

    #[command(flatten)]
    chunks: ChunkArgs,

    /// Write the highlighted document to this file.
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write every highlighted document into this directory.
    #[arg(short = 'O', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,

    /// CSS selector of the element to search in.
    #[arg(long)]
    container: Option<String>,
  },

  /// Print where each chunk is found, as JSON, without modifying anything.
  Locate {
    /// HTML file to search.
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    chunks: ChunkArgs,

    /// CSS selector of the element to search in.
    #[arg(long)]
    container: Option<String>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
