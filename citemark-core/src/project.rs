//! Projection of normalized ranges back onto raw segment text.
use std::collections::BTreeMap;

use crate::{
  index_map::NormalizedIndex,
  range::{Range, merge_ranges},
};

/// Per-segment highlight ranges, keyed by segment index.
///
/// Each value is sorted and disjoint, with offsets into that segment's raw
/// text.
pub type SegmentRanges = BTreeMap<usize, Vec<Range>>;

/// Project normalized-space `ranges` onto the raw text of the segments they
/// touch.
///
/// For every range, each normalized byte inside it is looked up in `index`
/// and the minimum start and maximum end are accumulated per segment. A
/// segment touched by several ranges ends up with their projections merged.
#[must_use]
pub fn project_ranges(
  index: &NormalizedIndex,
  ranges: &[Range],
) -> SegmentRanges {
  let mut projected: BTreeMap<usize, Vec<Range>> = BTreeMap::new();

  for range in ranges {
    let mut touched: BTreeMap<usize, Range> = BTreeMap::new();
    for entry in index.entries(range.start, range.end) {
      touched
        .entry(entry.segment)
        .and_modify(|r| {
          r.start = r.start.min(entry.start);
          r.end = r.end.max(entry.end);
        })
        .or_insert_with(|| Range::new(entry.start, entry.end));
    }

    for (segment, r) in touched {
      if !r.is_empty() {
        projected.entry(segment).or_default().push(r);
      }
    }
  }

  projected
    .into_iter()
    .map(|(segment, ranges)| (segment, merge_ranges(ranges)))
    .collect()
}
