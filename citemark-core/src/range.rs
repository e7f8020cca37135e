//! Half-open ranges and merging.
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` of byte offsets.
///
/// Depending on context the offsets point either into the normalized
/// document string or into the raw text of a single segment.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Range {
  pub start: usize,
  pub end:   usize,
}

impl Range {
  #[must_use]
  pub const fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.end.saturating_sub(self.start)
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.end <= self.start
  }

  /// Slice `text` by this range.
  ///
  /// Returns `None` if the range is out of bounds or does not fall on `char`
  /// boundaries.
  #[must_use]
  pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
    text.get(self.start..self.end)
  }
}

impl From<std::ops::Range<usize>> for Range {
  fn from(r: std::ops::Range<usize>) -> Self {
    Self::new(r.start, r.end)
  }
}

/// Merge ranges into the minimal sorted set of disjoint ranges covering them.
///
/// Ranges are sorted by start; a range whose start lies at or before the end
/// of the range being built is folded into it. Touching ranges (`a.end ==
/// b.start`) are therefore merged as well.
#[must_use]
pub fn merge_ranges(mut ranges: Vec<Range>) -> Vec<Range> {
  ranges.sort_unstable_by_key(|r| (r.start, r.end));

  let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
  for range in ranges {
    match merged.last_mut() {
      Some(last) if range.start <= last.end => {
        last.end = last.end.max(range.end);
      },
      _ => merged.push(range),
    }
  }
  merged
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_merge_empty() {
    assert!(merge_ranges(Vec::new()).is_empty());
  }

  #[test]
  fn test_merge_overlapping_and_unsorted() {
    let merged = merge_ranges(vec![
      Range::new(10, 14),
      Range::new(0, 5),
      Range::new(3, 8),
      Range::new(20, 25),
      Range::new(12, 13),
    ]);
    assert_eq!(merged, vec![
      Range::new(0, 8),
      Range::new(10, 14),
      Range::new(20, 25)
    ]);
  }

  #[test]
  fn test_merge_touching() {
    let merged = merge_ranges(vec![Range::new(5, 9), Range::new(0, 5)]);
    assert_eq!(merged, vec![Range::new(0, 9)]);
  }

  #[test]
  fn test_merge_keeps_gaps() {
    let merged = merge_ranges(vec![Range::new(0, 4), Range::new(5, 9)]);
    assert_eq!(merged.len(), 2);
  }

  #[test]
  fn test_merge_output_is_disjoint() {
    let input: Vec<Range> = (0..50)
      .map(|i| Range::new((i * 7) % 40, (i * 7) % 40 + (i % 5)))
      .collect();
    let merged = merge_ranges(input.clone());
    for pair in merged.windows(2) {
      assert!(pair[0].end < pair[1].start, "{pair:?} not disjoint");
    }
    for r in input.iter().filter(|r| !r.is_empty()) {
      assert!(
        merged.iter().any(|m| m.start <= r.start && r.end <= m.end),
        "{r:?} not covered"
      );
    }
  }

  #[test]
  fn test_slice() {
    let text = "héllo";
    assert_eq!(Range::new(0, 3).slice(text), Some("hé"));
    assert_eq!(Range::new(0, 2).slice(text), None);
    assert_eq!(Range::new(4, 10).slice(text), None);
  }
}
