//! Normalized document string and its map back to the raw segments.
use crate::{normalize::word_spans, segment::Segment};

/// Where a byte of the normalized string came from.
///
/// `start..end` is the span of the *word* the byte belongs to, in the raw
/// text of segment `segment`. Separator spaces map to a zero-length position
/// at the end of the preceding word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
  pub segment: usize,
  pub start:   usize,
  pub end:     usize,
}

/// The whitespace-collapsed concatenation of all segments plus one
/// [`IndexEntry`] per byte of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedIndex {
  text:    String,
  entries: Vec<IndexEntry>,
}

impl NormalizedIndex {
  /// Build the normalized string for `segments`.
  ///
  /// The result equals [`crate::normalize`] applied to all segment texts
  /// joined by a space; whitespace-only segments contribute nothing.
  #[must_use]
  pub fn build<N>(segments: &[Segment<N>]) -> Self {
    let capacity = segments.iter().map(|s| s.text.len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    let mut entries = Vec::with_capacity(capacity);
    let mut previous: Option<IndexEntry> = None;

    for (segment, seg) in segments.iter().enumerate() {
      for (start, end) in word_spans(&seg.text) {
        if let Some(prev) = previous {
          text.push(' ');
          entries.push(IndexEntry {
            segment: prev.segment,
            start:   prev.end,
            end:     prev.end,
          });
        }

        let entry = IndexEntry {
          segment,
          start,
          end,
        };
        text.push_str(&seg.text[start..end]);
        entries.extend(std::iter::repeat_n(entry, end - start));
        previous = Some(entry);
      }
    }

    debug_assert_eq!(text.len(), entries.len());
    Self { text, entries }
  }

  /// The normalized document string.
  #[must_use]
  pub fn text(&self) -> &str {
    &self.text
  }

  /// The source of the byte at `index` of the normalized string.
  #[must_use]
  pub fn entry(&self, index: usize) -> Option<&IndexEntry> {
    self.entries.get(index)
  }

  /// Entries for the bytes `start..end`, clamped to the string length.
  #[must_use]
  pub fn entries(&self, start: usize, end: usize) -> &[IndexEntry] {
    let end = end.min(self.entries.len());
    self.entries.get(start..end).unwrap_or_default()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.text.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }
}
