//! The document abstraction the engine operates on.
//!
//! The engine does not know about HTML. It sees a document as an ordered
//! sequence of text-bearing leaves, each of which can be replaced in place by
//! a sequence of plain and highlighted pieces.

/// A document whose text leaves can be enumerated and replaced in place.
pub trait TextDocument {
  /// Handle to a text leaf. Handles must stay valid while *other* leaves are
  /// replaced.
  type Node: Clone;

  /// Handle to a highlight unit created by [`TextDocument::replace_leaf`].
  type Mark;

  /// All text leaves in document order (depth-first, pre-order), including
  /// empty ones.
  fn text_leaves(&self) -> Vec<(Self::Node, String)>;

  /// Replace the leaf `node` with `pieces`, in order.
  ///
  /// Returns a handle for every [`Piece::Marked`] piece, in the order they
  /// appear in `pieces`.
  fn replace_leaf(&mut self, node: &Self::Node, pieces: &[Piece<'_>])
  -> Vec<Self::Mark>;
}

/// One piece of a split leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
  Plain(&'a str),
  Marked(&'a str),
}

impl<'a> Piece<'a> {
  #[must_use]
  pub const fn text(&self) -> &'a str {
    match self {
      Self::Plain(t) | Self::Marked(t) => t,
    }
  }

  #[must_use]
  pub const fn is_marked(&self) -> bool {
    matches!(self, Self::Marked(_))
  }
}

/// A non-empty text leaf together with its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<N> {
  pub node: N,
  pub text: String,
}

/// Collect the non-empty text leaves of `document`, in document order.
///
/// Empty leaves contribute nothing to matching and are dropped here so the
/// index bookkeeping downstream never has to special-case them.
pub fn collect_segments<D: TextDocument + ?Sized>(
  document: &D,
) -> Vec<Segment<D::Node>> {
  document
    .text_leaves()
    .into_iter()
    .filter(|(_, text)| !text.is_empty())
    .map(|(node, text)| Segment { node, text })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SegmentList;

  #[test]
  fn test_collect_skips_empty_leaves() {
    let doc = SegmentList::new(["a", "", "  ", "b"]);
    let segments = collect_segments(&doc);
    let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["a", "  ", "b"]);
    let nodes: Vec<_> = segments.iter().map(|s| s.node).collect();
    assert_eq!(nodes, [0, 2, 3]);
  }

  #[test]
  fn test_piece_accessors() {
    assert_eq!(Piece::Plain("x").text(), "x");
    assert!(Piece::Marked("y").is_marked());
    assert!(!Piece::Plain("y").is_marked());
  }
}
