//! Head/tail anchor search for a single chunk.
//!
//! A chunk rarely appears byte-identical in rendered markup, so instead of an
//! exact search the chunk is bounded by its first and last few words. The
//! span runs from the first occurrence of the head to the *last* occurrence
//! of the tail at or after it. The widest span wins, so a tail phrase that
//! recurs further down the document extends the match up to it.
use log::{debug, trace};

use crate::{normalize, range::Range};

/// The head and tail phrases of a normalized chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
  pub head: String,
  pub tail: String,
}

impl Anchors {
  /// Derive anchors of `anchor_words` words from `chunk`.
  ///
  /// Returns `None` if the chunk normalizes to the empty string. A chunk with
  /// at most `anchor_words` words has identical head and tail. An
  /// `anchor_words` of zero is treated as one.
  #[must_use]
  pub fn from_chunk(chunk: &str, anchor_words: usize) -> Option<Self> {
    let normalized = normalize(chunk);
    if normalized.is_empty() {
      return None;
    }

    let words: Vec<&str> = normalized.split(' ').collect();
    let n = anchor_words.clamp(1, words.len());
    Some(Self {
      head: words[..n].join(" "),
      tail: words[words.len() - n..].join(" "),
    })
  }

  /// Locate these anchors in the normalized document `haystack`.
  #[must_use]
  pub fn locate(&self, haystack: &str) -> Option<Range> {
    let start = haystack.find(&self.head)?;
    let last_tail = haystack[start..].rfind(&self.tail)?;
    Some(Range::new(start, start + last_tail + self.tail.len()))
  }
}

/// Find the normalized-space range of `chunk` inside `haystack`.
///
/// Returns `None` when the chunk is blank, its head does not occur, or no
/// occurrence of its tail lies at or after the head. None of these are
/// errors; the chunk simply contributes no highlight.
#[must_use]
pub fn find_chunk_range(
  haystack: &str,
  chunk: &str,
  anchor_words: usize,
) -> Option<Range> {
  let Some(anchors) = Anchors::from_chunk(chunk, anchor_words) else {
    debug!("Skipping blank chunk");
    return None;
  };

  trace!("Chunk anchors: head={:?} tail={:?}", anchors.head, anchors.tail);

  let found = anchors.locate(haystack);
  match found {
    Some(range) => trace!("Chunk located at {}..{}", range.start, range.end),
    None => {
      debug!(
        "No match for chunk starting with {:?} and ending with {:?}",
        anchors.head, anchors.tail
      );
    },
  }
  found
}

#[cfg(test)]
mod tests {
  use super::*;

  const DOC: &str = "The quick brown fox jumps over the lazy dog";

  #[test]
  fn test_anchors_long_chunk() {
    let anchors = Anchors::from_chunk("quick brown fox jumps", 2).unwrap();
    assert_eq!(anchors.head, "quick brown");
    assert_eq!(anchors.tail, "fox jumps");
  }

  #[test]
  fn test_anchors_short_chunk_head_equals_tail() {
    let anchors = Anchors::from_chunk(" quick\n brown ", 2).unwrap();
    assert_eq!(anchors.head, "quick brown");
    assert_eq!(anchors.tail, "quick brown");

    let single = Anchors::from_chunk("fox", 3).unwrap();
    assert_eq!(single.head, "fox");
    assert_eq!(single.tail, "fox");
  }

  #[test]
  fn test_anchors_blank_chunk() {
    assert!(Anchors::from_chunk("", 2).is_none());
    assert!(Anchors::from_chunk(" \n\t", 2).is_none());
  }

  #[test]
  fn test_zero_anchor_words_uses_one() {
    let anchors = Anchors::from_chunk("a b c", 0).unwrap();
    assert_eq!(anchors.head, "a");
    assert_eq!(anchors.tail, "c");
  }

  #[test]
  fn test_find_exact() {
    let range = find_chunk_range(DOC, "quick brown fox", 2).unwrap();
    assert_eq!(range.slice(DOC), Some("quick brown fox"));
  }

  #[test]
  fn test_find_tolerates_whitespace_noise() {
    let range = find_chunk_range(DOC, "quick\n\n   brown fox\tjumps", 2).unwrap();
    assert_eq!(range.slice(DOC), Some("quick brown fox jumps"));
  }

  #[test]
  fn test_find_ignores_middle_mismatch() {
    // Only the anchors have to match, the middle is free.
    let range =
      find_chunk_range(DOC, "quick brown CAT JUMPED over the", 2).unwrap();
    assert_eq!(range.slice(DOC), Some("quick brown fox jumps over the"));
  }

  #[test]
  fn test_find_uses_last_tail_occurrence() {
    let doc = "alpha beta gamma end here more gamma end here";
    let range = find_chunk_range(doc, "beta gamma end here", 2).unwrap();
    assert_eq!(range.start, doc.find("beta").unwrap());
    assert_eq!(range.end, doc.len());
  }

  #[test]
  fn test_find_tail_before_head_is_no_match() {
    let doc = "lazy dog then the quick brown";
    assert!(find_chunk_range(doc, "quick brown lazy dog", 2).is_none());
  }

  #[test]
  fn test_find_missing_head() {
    assert!(find_chunk_range(DOC, "slow green turtle", 2).is_none());
  }

  #[test]
  fn test_find_in_empty_document() {
    assert!(find_chunk_range("", "anything", 2).is_none());
  }
}
