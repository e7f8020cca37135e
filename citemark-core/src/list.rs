//! An in-memory [`TextDocument`]: an ordered list of strings.
//!
//! Useful for callers that keep their text outside of a markup tree, and for
//! exercising the engine without parsing anything.
use crate::segment::{Piece, TextDocument};

/// One slot of a [`SegmentList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
  /// Untouched text.
  Text(String),
  /// Text that was split into highlighted and plain pieces.
  Split(Vec<OwnedPiece>),
}

/// An owned [`Piece`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPiece {
  pub text:   String,
  pub marked: bool,
}

impl From<&Piece<'_>> for OwnedPiece {
  fn from(piece: &Piece<'_>) -> Self {
    Self {
      text:   piece.text().to_string(),
      marked: piece.is_marked(),
    }
  }
}

/// Handle to a highlighted piece of a [`SegmentList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkRef {
  pub slot:  usize,
  pub piece: usize,
}

/// An ordered list of text segments with replace-in-place semantics.
///
/// Only [`Slot::Text`] slots are reported as leaves, so already split slots
/// are invisible to a later run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentList {
  slots: Vec<Slot>,
}

impl SegmentList {
  pub fn new<I, S>(texts: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      slots: texts.into_iter().map(|t| Slot::Text(t.into())).collect(),
    }
  }

  #[must_use]
  pub fn slots(&self) -> &[Slot] {
    &self.slots
  }

  /// Whether no slot has been split yet.
  #[must_use]
  pub fn is_pristine(&self) -> bool {
    self.slots.iter().all(|s| matches!(s, Slot::Text(_)))
  }

  /// Text of every highlighted piece, in document order.
  #[must_use]
  pub fn marked_texts(&self) -> Vec<&str> {
    self
      .pieces()
      .filter(|&(_, marked)| marked)
      .map(|(text, _)| text)
      .collect()
  }

  /// Text of the piece `mark` points at.
  #[must_use]
  pub fn mark_text(&self, mark: MarkRef) -> Option<&str> {
    match self.slots.get(mark.slot)? {
      Slot::Split(pieces) => {
        pieces
          .get(mark.piece)
          .filter(|p| p.marked)
          .map(|p| p.text.as_str())
      },
      Slot::Text(_) => None,
    }
  }

  /// All text with highlight boundaries removed.
  #[must_use]
  pub fn plain_text(&self) -> String {
    self.pieces().map(|(text, _)| text).collect()
  }

  /// Render the list with every highlighted piece wrapped in `open` and
  /// `close`.
  #[must_use]
  pub fn render(&self, open: &str, close: &str) -> String {
    let mut out = String::new();
    for (text, marked) in self.pieces() {
      if marked {
        out.push_str(open);
        out.push_str(text);
        out.push_str(close);
      } else {
        out.push_str(text);
      }
    }
    out
  }

  fn pieces(&self) -> impl Iterator<Item = (&str, bool)> {
    self.slots.iter().flat_map(|slot| {
      let (text, split): (Option<&str>, &[OwnedPiece]) = match slot {
        Slot::Text(text) => (Some(text.as_str()), &[]),
        Slot::Split(pieces) => (None, pieces.as_slice()),
      };
      text
        .map(|t| (t, false))
        .into_iter()
        .chain(split.iter().map(|p| (p.text.as_str(), p.marked)))
    })
  }
}

impl TextDocument for SegmentList {
  type Mark = MarkRef;
  type Node = usize;

  fn text_leaves(&self) -> Vec<(usize, String)> {
    self
      .slots
      .iter()
      .enumerate()
      .filter_map(|(i, slot)| {
        match slot {
          Slot::Text(text) => Some((i, text.clone())),
          Slot::Split(_) => None,
        }
      })
      .collect()
  }

  fn replace_leaf(&mut self, node: &usize, pieces: &[Piece<'_>]) -> Vec<MarkRef> {
    let Some(slot) = self.slots.get_mut(*node) else {
      return Vec::new();
    };

    *slot = Slot::Split(pieces.iter().map(OwnedPiece::from).collect());
    pieces
      .iter()
      .enumerate()
      .filter(|(_, p)| p.is_marked())
      .map(|(piece, _)| {
        MarkRef {
          slot: *node,
          piece,
        }
      })
      .collect()
  }
}
