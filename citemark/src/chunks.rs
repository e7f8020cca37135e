//! Loading the chunks to highlight.
use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
  cli::ChunkArgs,
  error::{CitemarkError, Result},
};

/// A single chunk entry as found in a chunk file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChunkEntry {
  Text(String),
  Object { text: String },
}

impl ChunkEntry {
  fn into_text(self) -> String {
    match self {
      Self::Text(text) | Self::Object { text } => text,
    }
  }
}

/// Accepted shapes of a chunk file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChunkFile {
  List(Vec<ChunkEntry>),
  Wrapped { chunks: Vec<ChunkEntry> },
}

/// Parse chunk texts from a JSON document.
///
/// Accepts `["..."]`, `[{"text": "..."}]` or `{"chunks": [...]}`. Extra
/// fields on chunk objects (ids, scores, metadata) are ignored.
///
/// # Errors
///
/// Returns an error if `json` has none of these shapes.
pub fn parse_chunks(json: &str) -> serde_json::Result<Vec<String>> {
  let file: ChunkFile = serde_json::from_str(json)?;
  let entries = match file {
    ChunkFile::List(entries) | ChunkFile::Wrapped { chunks: entries } => {
      entries
    },
  };
  Ok(entries.into_iter().map(ChunkEntry::into_text).collect())
}

/// Read and parse a chunk file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_chunks(path: &Path) -> Result<Vec<String>> {
  let content = fs::read_to_string(path)?;
  parse_chunks(&content).map_err(|source| {
    CitemarkError::Chunks {
      path: path.display().to_string(),
      source,
    }
  })
}

/// Collect the chunks named on the command line: the chunk file first, then
/// inline chunks in order.
///
/// # Errors
///
/// Returns an error if the chunk file cannot be loaded, or if no chunk was
/// given at all.
pub fn collect_chunks(args: &ChunkArgs) -> Result<Vec<String>> {
  let mut chunks = match args.chunks_file {
    Some(ref path) => load_chunks(path)?,
    None => Vec::new(),
  };
  chunks.extend(args.chunk.iter().cloned());

  if args.chunks_file.is_none() && chunks.is_empty() {
    return Err(CitemarkError::Input(
      "no chunks given, use --chunks FILE or --chunk TEXT".to_string(),
    ));
  }

  log::debug!("Collected {} chunk(s)", chunks.len());
  Ok(chunks)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_string_array() {
    let chunks = parse_chunks(r#"["alpha beta", "gamma"]"#).unwrap();
    assert_eq!(chunks, ["alpha beta", "gamma"]);
  }

  #[test]
  fn test_parse_objects_with_extra_fields() {
    let chunks = parse_chunks(
      r#"[{"text": "alpha", "score": 0.9}, {"id": 3, "text": "beta"}]"#,
    )
    .unwrap();
    assert_eq!(chunks, ["alpha", "beta"]);
  }

  #[test]
  fn test_parse_wrapped_mixed() {
    let chunks =
      parse_chunks(r#"{"chunks": ["alpha", {"text": "beta"}]}"#).unwrap();
    assert_eq!(chunks, ["alpha", "beta"]);
  }

  #[test]
  fn test_parse_rejects_other_shapes() {
    assert!(parse_chunks(r#"{"text": "alpha"}"#).is_err());
    assert!(parse_chunks("[1, 2]").is_err());
    assert!(parse_chunks("not json").is_err());
  }

  #[test]
  fn test_collect_requires_some_chunk() {
    assert!(matches!(
      collect_chunks(&ChunkArgs::default()),
      Err(CitemarkError::Input(_))
    ));

    let args = ChunkArgs {
      chunks_file: None,
      chunk:       vec!["alpha".to_string()],
    };
    assert_eq!(collect_chunks(&args).unwrap(), ["alpha"]);
  }
}
