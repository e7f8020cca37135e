//! The highlighting pipeline.
//!
//! Highlighting runs in two phases. [`Highlighter::plan`] is read-only: it
//! collects segments, builds the normalized index, locates every chunk,
//! merges the results and projects them onto the segments.
//! [`Highlighter::apply`] then performs all mutations in one back-to-front
//! pass. [`Highlighter::highlight`] does both.
//!
//! # Examples
//!
//! ```
//! use citemark_core::{HighlightOptions, Highlighter, SegmentList};
//!
//! let mut doc = SegmentList::new(["The quick ", "brown", " fox jumps"]);
//! let highlighter = Highlighter::new(HighlightOptions::default());
//!
//! let first = highlighter.highlight(&mut doc, &["quick brown fox"]);
//! assert!(first.is_some());
//! assert_eq!(doc.marked_texts(), ["quick", "brown", "fox"]);
//! ```
use log::debug;
use serde::Serialize;

use crate::{
  anchor::find_chunk_range,
  index_map::NormalizedIndex,
  mutate::apply_ranges,
  project::{SegmentRanges, project_ranges},
  range::{Range, merge_ranges},
  segment::{Segment, TextDocument, collect_segments},
};

/// Options shared by the engine and the document implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
  /// Number of words in the head and tail anchors of a chunk.
  pub anchor_words: usize,

  /// Element name used for highlight units in HTML documents.
  pub tag: String,

  /// Class put on every highlight unit in HTML documents.
  pub class: String,

  /// Elements whose text never takes part in matching.
  pub skip_elements: Vec<String>,

  /// CSS selector restricting HTML highlighting to the first matching
  /// element.
  pub container: Option<String>,

  /// `id` given to the first highlight unit of an HTML document, so it can
  /// be scrolled to.
  pub first_id: Option<String>,
}

impl HighlightOptions {
  pub const DEFAULT_ANCHOR_WORDS: usize = 2;
  pub const DEFAULT_CLASS: &'static str = "chunk-highlight";
  pub const DEFAULT_TAG: &'static str = "span";

  /// Elements skipped when no explicit list is configured.
  #[must_use]
  pub fn default_skip_elements() -> Vec<String> {
    ["head", "script", "style", "noscript", "template"]
      .into_iter()
      .map(String::from)
      .collect()
  }
}

impl Default for HighlightOptions {
  fn default() -> Self {
    Self {
      anchor_words:  Self::DEFAULT_ANCHOR_WORDS,
      tag:           Self::DEFAULT_TAG.to_string(),
      class:         Self::DEFAULT_CLASS.to_string(),
      skip_elements: Self::default_skip_elements(),
      container:     None,
      first_id:      None,
    }
  }
}

/// Locates chunks in a [`TextDocument`] and highlights them.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
  options: HighlightOptions,
}

/// The read-only outcome of locating chunks in a document.
#[derive(Debug, Clone)]
pub struct HighlightPlan<N> {
  segments:       Vec<Segment<N>>,
  index:          NormalizedIndex,
  chunk_ranges:   Vec<Option<Range>>,
  merged:         Vec<Range>,
  segment_ranges: SegmentRanges,
}

impl Highlighter {
  #[must_use]
  pub const fn new(options: HighlightOptions) -> Self {
    Self { options }
  }

  #[must_use]
  pub const fn options(&self) -> &HighlightOptions {
    &self.options
  }

  /// Locate `chunks` in `document` without modifying it.
  pub fn plan<D, S>(&self, document: &D, chunks: &[S]) -> HighlightPlan<D::Node>
  where
    D: TextDocument + ?Sized,
    S: AsRef<str>,
  {
    let segments = collect_segments(document);
    let index = NormalizedIndex::build(&segments);

    if chunks.is_empty() {
      debug!("No chunks to highlight");
    } else if index.is_empty() {
      debug!(
        "Document has no text; none of {} chunk(s) can match",
        chunks.len()
      );
    }

    let chunk_ranges: Vec<Option<Range>> = if index.is_empty() {
      vec![None; chunks.len()]
    } else {
      chunks
        .iter()
        .map(|chunk| {
          find_chunk_range(index.text(), chunk.as_ref(), self.options.anchor_words)
        })
        .collect()
    };

    let merged = merge_ranges(chunk_ranges.iter().flatten().copied().collect());
    let segment_ranges = project_ranges(&index, &merged);

    debug!(
      "Matched {}/{} chunk(s) into {} range(s) over {} segment(s)",
      chunk_ranges.iter().flatten().count(),
      chunks.len(),
      merged.len(),
      segment_ranges.len()
    );

    HighlightPlan {
      segments,
      index,
      chunk_ranges,
      merged,
      segment_ranges,
    }
  }

  /// Apply a plan produced by [`Highlighter::plan`] for the same, unmodified
  /// document.
  ///
  /// Returns the first highlight unit in document order.
  pub fn apply<D>(
    &self,
    document: &mut D,
    plan: &HighlightPlan<D::Node>,
  ) -> Option<D::Mark>
  where
    D: TextDocument + ?Sized,
  {
    if plan.segment_ranges.is_empty() {
      return None;
    }
    apply_ranges(document, &plan.segments, &plan.segment_ranges)
  }

  /// Locate `chunks` in `document` and highlight them in place.
  ///
  /// Chunks that cannot be located are skipped; the others are still
  /// highlighted. Returns the first highlight unit in document order, or
  /// `None` if nothing matched. With no chunks, the document is left
  /// untouched.
  pub fn highlight<D, S>(&self, document: &mut D, chunks: &[S]) -> Option<D::Mark>
  where
    D: TextDocument + ?Sized,
    S: AsRef<str>,
  {
    let plan = self.plan(document, chunks);
    self.apply(document, &plan)
  }
}

impl<N> HighlightPlan<N> {
  /// The normalized document text used for matching.
  #[must_use]
  pub fn normalized_text(&self) -> &str {
    self.index.text()
  }

  /// Normalized-space range of every chunk, in input order.
  #[must_use]
  pub fn chunk_ranges(&self) -> &[Option<Range>] {
    &self.chunk_ranges
  }

  /// The merged, disjoint highlight cover in normalized space.
  #[must_use]
  pub fn merged_ranges(&self) -> &[Range] {
    &self.merged
  }

  /// Per-segment ranges, keyed by segment position in [`Self::segments`].
  #[must_use]
  pub const fn segment_ranges(&self) -> &SegmentRanges {
    &self.segment_ranges
  }

  /// The non-empty segments the plan was built from.
  #[must_use]
  pub fn segments(&self) -> &[Segment<N>] {
    &self.segments
  }

  /// Whether applying this plan would change the document.
  #[must_use]
  pub fn is_noop(&self) -> bool {
    self.segment_ranges.is_empty()
  }

  /// Summarize the plan for reporting.
  #[must_use]
  pub fn report(&self) -> LocateReport {
    let text = self.index.text();
    let chunks = self
      .chunk_ranges
      .iter()
      .enumerate()
      .map(|(index, range)| {
        ChunkMatch {
          index,
          range: *range,
          text: range.and_then(|r| r.slice(text)).map(str::to_string),
        }
      })
      .collect();

    LocateReport {
      chunks,
      merged: self.merged.clone(),
      highlighted_segments: self.segment_ranges.len(),
    }
  }
}

/// Serializable summary of a [`HighlightPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocateReport {
  /// One entry per input chunk, in input order.
  pub chunks: Vec<ChunkMatch>,

  /// Disjoint highlight cover in normalized space.
  pub merged: Vec<Range>,

  /// Number of segments that would receive at least one highlight.
  pub highlighted_segments: usize,
}

/// Where a single chunk was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkMatch {
  /// Position of the chunk in the input.
  pub index: usize,

  /// Normalized-space range, `None` if the chunk was not found.
  pub range: Option<Range>,

  /// Normalized document text covered by the range.
  pub text: Option<String>,
}

impl LocateReport {
  /// Number of chunks that were located.
  #[must_use]
  pub fn matched(&self) -> usize {
    self.chunks.iter().filter(|c| c.range.is_some()).count()
  }
}
