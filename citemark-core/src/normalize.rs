//! Whitespace normalization used for matching.
//!
//! Rendered markup rarely reproduces the whitespace of the text a chunk was
//! cut from: line breaks become spaces, indentation leaks in from templates,
//! inline elements introduce or swallow separators. All matching therefore
//! happens on a normalized form where every whitespace run is a single space.

/// Collapse every maximal run of whitespace into a single space and trim both
/// ends.
///
/// Whitespace is anything [`char::is_whitespace`] accepts, which includes
/// tabs, newlines, non-breaking spaces and the Unicode space separators.
///
/// # Examples
///
/// ```
/// use citemark_core::normalize;
///
/// assert_eq!(normalize("  quick\n\tbrown   fox "), "quick brown fox");
/// assert_eq!(normalize("\u{a0}\n"), "");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for word in words(text) {
    if !out.is_empty() {
      out.push(' ');
    }
    out.push_str(word);
  }
  out
}

/// Iterate over the words of `text`, where a word is a maximal run of
/// non-whitespace characters.
///
/// This is the single boundary rule shared by [`normalize`] and the index
/// mapper, so the two can never disagree on where a word starts.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
  text.split(char::is_whitespace).filter(|w| !w.is_empty())
}

/// Like [`words`], but yields the byte span of every word inside `text`.
pub fn word_spans(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
  let mut cursor = 0;
  std::iter::from_fn(move || {
    let rest = &text[cursor..];
    let lead = rest.find(|c: char| !c.is_whitespace())?;
    let start = cursor + lead;
    let len = text[start..]
      .find(char::is_whitespace)
      .unwrap_or(text.len() - start);
    cursor = start + len;
    Some((start, cursor))
  })
}
