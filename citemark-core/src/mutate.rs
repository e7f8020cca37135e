//! In-place splitting of highlighted segments.
use log::debug;

use crate::{
  project::SegmentRanges,
  range::Range,
  segment::{Piece, Segment, TextDocument},
};

/// Split `text` into alternating plain and marked pieces.
///
/// `ranges` must be sorted and disjoint; ranges that are out of bounds or do
/// not fall on `char` boundaries are skipped.
#[must_use]
pub fn split_pieces<'a>(text: &'a str, ranges: &[Range]) -> Vec<Piece<'a>> {
  let mut pieces = Vec::with_capacity(ranges.len() * 2 + 1);
  let mut cursor = 0;

  for range in ranges {
    if range.start < cursor || range.is_empty() {
      continue;
    }
    let (Some(gap), Some(marked)) =
      (text.get(cursor..range.start), range.slice(text))
    else {
      continue;
    };

    if !gap.is_empty() {
      pieces.push(Piece::Plain(gap));
    }
    pieces.push(Piece::Marked(marked));
    cursor = range.end;
  }

  if let Some(rest) = text.get(cursor..)
    && !rest.is_empty()
  {
    pieces.push(Piece::Plain(rest));
  }
  pieces
}

/// Apply per-segment `ranges` to `document`.
///
/// Segments are replaced back to front, so replacing one never disturbs a
/// segment that is still waiting to be processed. Returns the first highlight
/// unit in document order, or `None` if no segment received a highlight.
pub fn apply_ranges<D: TextDocument + ?Sized>(
  document: &mut D,
  segments: &[Segment<D::Node>],
  ranges: &SegmentRanges,
) -> Option<D::Mark> {
  let mut first = None;
  let mut created = 0usize;

  for (&index, seg_ranges) in ranges.iter().rev() {
    let Some(segment) = segments.get(index) else {
      debug!("Ignoring ranges for unknown segment {index}");
      continue;
    };

    let pieces = split_pieces(&segment.text, seg_ranges);
    if !pieces.iter().any(Piece::is_marked) {
      continue;
    }

    let marks = document.replace_leaf(&segment.node, &pieces);
    created += marks.len();
    if let Some(mark) = marks.into_iter().next() {
      first = Some(mark);
    }
  }

  debug!(
    "Created {created} highlight unit(s) across {} segment(s)",
    ranges.len()
  );
  first
}
