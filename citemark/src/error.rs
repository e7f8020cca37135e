use std::io;

use citemark_config::ConfigError;
use citemark_core::HighlightError;
use thiserror::Error;

/// Top-level error type for the citemark crate.
#[derive(Debug, Error)]
pub enum CitemarkError {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Highlighting error: {0}")]
  Highlight(#[from] HighlightError),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Invalid chunk file {path}: {source}")]
  Chunks {
    path:   String,
    source: serde_json::Error,
  },

  #[error("Processing {0} panicked")]
  Panicked(String),

  #[error("Invalid input: {0}")]
  Input(String),

  #[error("Thread pool error: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for citemark operations.
pub type Result<T> = std::result::Result<T, CitemarkError>;
