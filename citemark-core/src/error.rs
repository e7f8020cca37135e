use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// Errors raised around the engine, never by it.
///
/// Locating and highlighting chunks cannot fail; these cover scoping and
/// serializing HTML documents.
#[derive(Debug, Error)]
pub enum HighlightError {
  #[error("Invalid container selector: {0}")]
  InvalidSelector(String),

  #[error("No element matches container selector: {0}")]
  ContainerNotFound(String),

  #[error("Failed to serialize document: {0}")]
  Serialize(#[from] io::Error),

  #[error("Serialized document is not valid UTF-8: {0}")]
  Utf8(#[from] FromUtf8Error),
}

/// Result type for HTML-level operations.
pub type HighlightResult<T> = Result<T, HighlightError>;
