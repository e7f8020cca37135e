//! # citemark-core
//!
//! Locate retrieved text fragments ("chunks") inside an already rendered
//! document and highlight them in place.
//!
//! Chunks returned by a retrieval or citation backend seldom match the
//! rendered text byte for byte: markup adds and removes whitespace, and a
//! single sentence can be spread over several inline elements. The engine
//! therefore works on a whitespace-normalized view of the document, bounds
//! every chunk by its first and last few words, and maps the matches back onto
//! the original text leaves.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "html")] {
//! use citemark_core::{HighlightOptions, highlight_html};
//!
//! let html = "<p>The <b>quick brown</b>\n   fox jumps over the lazy dog</p>";
//! let outcome =
//!   highlight_html(html, &["quick brown fox"], &HighlightOptions::default())
//!     .unwrap();
//!
//! assert!(outcome.highlighted);
//! assert!(outcome.html.contains(
//!   r#"<b><span class="chunk-highlight">quick brown</span></b>"#
//! ));
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`collect_segments`] gathers the non-empty text leaves in document order.
//! 2. [`NormalizedIndex`] joins them into one normalized string with a map
//!    back to every leaf.
//! 3. [`find_chunk_range`] locates each chunk by its head and tail anchors.
//! 4. [`merge_ranges`] folds all matches into a disjoint cover.
//! 5. [`project_ranges`] maps the cover back onto per-leaf ranges.
//! 6. [`apply_ranges`] splits the affected leaves, back to front.
//!
//! [`Highlighter`] runs the whole pipeline over any [`TextDocument`].
//! [`SegmentList`] is an in-memory document; with the `html` feature (on by
//! default) [`HtmlDocument`] works on a parsed HTML tree.

mod anchor;
mod error;
mod highlighter;
#[cfg(feature = "html")] mod html;
mod index_map;
mod list;
mod mutate;
mod normalize;
pub mod process;
mod project;
mod range;
mod segment;

pub use crate::{
  anchor::{Anchors, find_chunk_range},
  error::{HighlightError, HighlightResult},
  highlighter::{
    ChunkMatch,
    HighlightOptions,
    HighlightPlan,
    Highlighter,
    LocateReport,
  },
  index_map::{IndexEntry, NormalizedIndex},
  list::{MarkRef, OwnedPiece, SegmentList, Slot},
  mutate::{apply_ranges, split_pieces},
  normalize::{normalize, word_spans, words},
  project::{SegmentRanges, project_ranges},
  range::{Range, merge_ranges},
  segment::{Piece, Segment, TextDocument, collect_segments},
};
#[cfg(feature = "html")]
pub use crate::html::{
  HtmlDocument,
  HtmlOutcome,
  highlight_html,
  highlight_html_safe,
};
