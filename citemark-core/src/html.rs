//! HTML documents backed by a kuchikikiki DOM.
//!
//! Text nodes are the leaves. A highlighted text node is replaced by a run of
//! text nodes and marker elements (`<span class="chunk-highlight">` by
//! default) inserted in its place.
//!
//! Input without a document wrapper (`<html>`, `<head>`, `<body>` or a
//! doctype) is treated as a fragment and serialized back without one.
use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use log::debug;
use markup5ever::{LocalName, QualName, ns};
use serde::Serialize;

use crate::{
  error::{HighlightError, HighlightResult},
  highlighter::{HighlightOptions, Highlighter, LocateReport},
  process::process_safe,
  segment::{Piece, TextDocument},
};

/// A parsed HTML document, optionally scoped to one container element.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
  document:      NodeRef,
  root:          NodeRef,
  tag:           String,
  class:         String,
  skip_elements: Vec<String>,
  fragment:      bool,
}

const DOCUMENT_TAGS: [&str; 4] = ["!doctype", "html", "head", "body"];

/// Whether `html` lacks any document-level tag.
fn is_fragment(html: &str) -> bool {
  let lower = html.to_ascii_lowercase();
  !lower.match_indices('<').any(|(i, _)| {
    let rest = &lower[i + 1..];
    DOCUMENT_TAGS.iter().any(|tag| {
      rest.strip_prefix(tag).is_some_and(|after| {
        after.starts_with(|c: char| {
          c.is_ascii_whitespace() || c == '>' || c == '/'
        })
      })
    })
  })
}

impl HtmlDocument {
  /// Parse `html`, either as a full document or as a fragment.
  #[must_use]
  pub fn parse(html: &str, options: &HighlightOptions) -> Self {
    use tendril::TendrilSink;

    let mut document =
      Self::from_node(kuchikikiki::parse_html().one(html), options);
    document.fragment = is_fragment(html);
    document
  }

  /// Wrap an already parsed node. The node is both the scope and what
  /// [`HtmlDocument::to_html`] serializes.
  #[must_use]
  pub fn from_node(node: NodeRef, options: &HighlightOptions) -> Self {
    Self {
      document:      node.clone(),
      root:          node,
      tag:           options.tag.clone(),
      class:         options.class.clone(),
      skip_elements: options.skip_elements.clone(),
      fragment:      false,
    }
  }

  /// Restrict matching to the first element matching the CSS `selector`.
  ///
  /// # Errors
  ///
  /// Returns [`HighlightError::InvalidSelector`] if `selector` does not
  /// parse, or [`HighlightError::ContainerNotFound`] if nothing matches.
  pub fn scoped(mut self, selector: &str) -> HighlightResult<Self> {
    let container = self
      .document
      .select(selector)
      .map_err(|()| HighlightError::InvalidSelector(selector.to_string()))?
      .next()
      .ok_or_else(|| HighlightError::ContainerNotFound(selector.to_string()))?;

    self.root = container.as_node().clone();
    Ok(self)
  }

  /// The node matching is restricted to.
  #[must_use]
  pub const fn root(&self) -> &NodeRef {
    &self.root
  }

  /// The whole document.
  #[must_use]
  pub const fn document(&self) -> &NodeRef {
    &self.document
  }

  /// All highlight units currently in the scope.
  #[must_use]
  pub fn marks(&self) -> Vec<NodeRef> {
    self
      .root
      .inclusive_descendants()
      .filter(|node| self.is_marker(node))
      .collect()
  }

  /// Set the `id` attribute of `mark`.
  pub fn set_id(&self, mark: &NodeRef, id: &str) {
    if let Some(element) = mark.as_element() {
      element.attributes.borrow_mut().insert("id", id.to_string());
    }
  }

  /// Whether the document was parsed from a fragment.
  #[must_use]
  pub const fn is_fragment(&self) -> bool {
    self.fragment
  }

  /// Serialize the whole document. A fragment is serialized without the
  /// `<html>`, `<head>` and `<body>` wrappers the parser added.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails or produces invalid UTF-8.
  pub fn to_html(&self) -> HighlightResult<String> {
    let mut out = Vec::new();
    if self.fragment {
      for section in self.document.children().flat_map(|html| html.children())
      {
        for child in section.children() {
          child.serialize(&mut out)?;
        }
      }
    } else {
      self.document.serialize(&mut out)?;
    }
    Ok(String::from_utf8(out)?)
  }

  fn is_marker(&self, node: &NodeRef) -> bool {
    node.as_element().is_some_and(|element| {
      &*element.name.local == self.tag.as_str()
        && element
          .attributes
          .borrow()
          .get("class")
          .is_some_and(|c| c.split_whitespace().any(|c| c == self.class))
    })
  }

  fn is_skipped(&self, node: &NodeRef) -> bool {
    if self.skip_elements.is_empty() {
      return false;
    }

    let mut parent = node.parent();
    while let Some(p) = parent {
      if let Some(element) = p.as_element()
        && self
          .skip_elements
          .iter()
          .any(|skip| skip.eq_ignore_ascii_case(&element.name.local))
      {
        return true;
      }
      if p == self.root {
        break;
      }
      parent = p.parent();
    }
    false
  }

  fn new_marker(&self, text: &str) -> NodeRef {
    let marker = NodeRef::new_element(
      QualName::new(None, ns!(html), LocalName::from(self.tag.as_str())),
      vec![(ExpandedName::new("", "class"), Attribute {
        prefix: None,
        value:  self.class.clone(),
      })],
    );
    marker.append(NodeRef::new_text(text));
    marker
  }
}

impl TextDocument for HtmlDocument {
  type Mark = NodeRef;
  type Node = NodeRef;

  fn text_leaves(&self) -> Vec<(NodeRef, String)> {
    self
      .root
      .inclusive_descendants()
      .filter_map(|node| {
        let text = node.as_text()?.borrow().clone();
        (!self.is_skipped(&node)).then_some((node, text))
      })
      .collect()
  }

  fn replace_leaf(&mut self, node: &NodeRef, pieces: &[Piece<'_>]) -> Vec<NodeRef> {
    let mut marks = Vec::new();
    for piece in pieces {
      match piece {
        Piece::Plain(text) => node.insert_before(NodeRef::new_text(*text)),
        Piece::Marked(text) => {
          let marker = self.new_marker(text);
          node.insert_before(marker.clone());
          marks.push(marker);
        },
      }
    }
    node.detach();
    marks
  }
}

/// Result of [`highlight_html`].
#[derive(Debug, Clone, Serialize)]
pub struct HtmlOutcome {
  /// The highlighted document, or the input unchanged if nothing matched.
  pub html: String,

  /// Whether at least one highlight unit was created.
  pub highlighted: bool,

  /// Where each chunk was found.
  pub report: LocateReport,
}

/// Highlight `chunks` inside the HTML string `html`.
///
/// Honors [`HighlightOptions::container`] and [`HighlightOptions::first_id`].
/// When nothing matches, the input is returned byte for byte.
///
/// # Errors
///
/// Returns an error if the container selector is invalid or matches nothing,
/// or if the document cannot be serialized.
pub fn highlight_html<S: AsRef<str>>(
  html: &str,
  chunks: &[S],
  options: &HighlightOptions,
) -> HighlightResult<HtmlOutcome> {
  let mut document = HtmlDocument::parse(html, options);
  if let Some(selector) = &options.container {
    document = document.scoped(selector)?;
  }

  let highlighter = Highlighter::new(options.clone());
  let plan = highlighter.plan(&document, chunks);
  let report = plan.report();

  if plan.is_noop() {
    debug!("Nothing to highlight, leaving document untouched");
    return Ok(HtmlOutcome {
      html: html.to_string(),
      highlighted: false,
      report,
    });
  }

  let first = highlighter.apply(&mut document, &plan);
  if let (Some(mark), Some(id)) = (&first, &options.first_id) {
    document.set_id(mark, id);
  }

  Ok(HtmlOutcome {
    html: document.to_html()?,
    highlighted: first.is_some(),
    report,
  })
}

/// Like [`highlight_html`], but never fails: errors and panics are logged and
/// the input is returned unchanged.
#[must_use]
pub fn highlight_html_safe<S: AsRef<str>>(
  html: &str,
  chunks: &[S],
  options: &HighlightOptions,
) -> String {
  process_safe(
    html,
    |html| {
      match highlight_html(html, chunks, options) {
        Ok(outcome) => outcome.html,
        Err(e) => {
          log::warn!("Highlighting skipped: {e}");
          html.to_string()
        },
      }
    },
    html,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize;

  fn parse(html: &str) -> HtmlDocument {
    HtmlDocument::parse(html, &HighlightOptions::default())
  }

  #[test]
  fn test_leaves_skip_script_and_style() {
    let doc = parse(
      "<p>visible</p><script>var hidden = 1;</script><style>p{}</style>\
       <p>also <b>visible</b></p>",
    );
    let texts: Vec<_> = doc.text_leaves().into_iter().map(|(_, t)| t).collect();
    assert_eq!(texts, ["visible", "also ", "visible"]);
  }

  #[test]
  fn test_replace_leaf_inserts_markers() {
    let mut doc = parse("<p>The quick fox</p>");
    let (node, _) = doc.text_leaves().remove(0);
    let marks = doc.replace_leaf(&node, &[
      Piece::Plain("The "),
      Piece::Marked("quick"),
      Piece::Plain(" fox"),
    ]);

    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].text_contents(), "quick");
    let html = doc.to_html().unwrap();
    assert!(html.contains(r#"<p>The <span class="chunk-highlight">quick</span> fox</p>"#));
  }

  #[test]
  fn test_scoped_to_container() {
    let doc = parse("<nav>quick brown</nav><article>quick brown</article>")
      .scoped("article")
      .unwrap();
    let leaves = doc.text_leaves();
    assert_eq!(leaves.len(), 1);
    assert_eq!(
      leaves[0].0.parent().and_then(|p| {
        p.as_element().map(|e| e.name.local.to_string())
      }),
      Some("article".to_string())
    );
  }

  #[test]
  fn test_scoped_errors() {
    assert!(matches!(
      parse("<p>x</p>").scoped("article"),
      Err(HighlightError::ContainerNotFound(_))
    ));
    assert!(matches!(
      parse("<p>x</p>").scoped("[[["),
      Err(HighlightError::InvalidSelector(_))
    ));
  }

  #[test]
  fn test_highlight_across_inline_elements() {
    let mut doc =
      parse("<p>The <b>quick brown</b> fox jumps over the lazy dog</p>");
    let first = Highlighter::default().highlight(&mut doc, &["quick brown fox"]);

    let first = first.unwrap();
    assert_eq!(first.text_contents(), "quick brown");
    let marks = doc.marks();
    assert_eq!(marks.len(), 2);
    let joined: Vec<_> = marks.iter().map(NodeRef::text_contents).collect();
    assert_eq!(normalize(&joined.join(" ")), "quick brown fox");
    // the bold run keeps its element, the highlight nests inside it
    assert_eq!(
      first.parent().and_then(|p| p.as_element().map(|e| e.name.local.to_string())),
      Some("b".to_string())
    );
  }

  #[test]
  fn test_highlight_html_first_id() {
    let options = HighlightOptions {
      first_id: Some("first-highlight".to_string()),
      ..HighlightOptions::default()
    };
    let outcome = highlight_html(
      "<p>alpha beta</p><p>gamma delta</p>",
      &["gamma delta", "alpha"],
      &options,
    )
    .unwrap();

    assert!(outcome.highlighted);
    assert!(outcome.html.contains(
      r#"<span class="chunk-highlight" id="first-highlight">alpha</span>"#
    ));
    assert_eq!(outcome.html.matches("first-highlight").count(), 1);
    assert_eq!(outcome.report.matched(), 2);
  }

  #[test]
  fn test_highlight_html_noop_is_byte_identical() {
    let html = "<div>\n  <p>Some   text</p>\n</div>";
    let empty: [&str; 0] = [];
    let outcome =
      highlight_html(html, &empty, &HighlightOptions::default()).unwrap();
    assert_eq!(outcome.html, html);
    assert!(!outcome.highlighted);

    let outcome =
      highlight_html(html, &["absent words"], &HighlightOptions::default())
        .unwrap();
    assert_eq!(outcome.html, html);
  }

  #[test]
  fn test_is_fragment() {
    assert!(is_fragment("<p>text</p>"));
    assert!(is_fragment("<header>top</header><p>x</p>"));
    assert!(is_fragment("plain text"));
    assert!(!is_fragment("<!DOCTYPE html><p>x</p>"));
    assert!(!is_fragment("<HTML><p>x</p></HTML>"));
    assert!(!is_fragment("<body class=\"doc\"><p>x</p></body>"));
  }

  #[test]
  fn test_fragment_keeps_its_shape() {
    let options = HighlightOptions::default();
    let html = "<p>The quick brown fox</p>";

    let matched = highlight_html(html, &["quick brown"], &options).unwrap();
    assert!(matched.highlighted);
    assert_eq!(
      matched.html,
      r#"<p>The <span class="chunk-highlight">quick brown</span> fox</p>"#
    );

    let unmatched = highlight_html(html, &["absent words"], &options).unwrap();
    assert_eq!(unmatched.html, html);
  }

  #[test]
  fn test_full_document_keeps_wrapper() {
    let outcome = highlight_html(
      "<html><head></head><body><p>The quick brown fox</p></body></html>",
      &["quick brown"],
      &HighlightOptions::default(),
    )
    .unwrap();
    assert!(!parse("<html><body></body></html>").is_fragment());
    assert_eq!(
      outcome.html,
      "<html><head></head><body><p>The <span \
       class=\"chunk-highlight\">quick brown</span> fox</p></body></html>"
    );
  }

  #[test]
  fn test_custom_marker() {
    let options = HighlightOptions {
      tag: "mark".to_string(),
      class: "cite".to_string(),
      ..HighlightOptions::default()
    };
    let outcome =
      highlight_html("<p>find me here</p>", &["find me"], &options).unwrap();
    assert!(outcome.html.contains(r#"<mark class="cite">find me</mark> here"#));
  }

  #[test]
  fn test_highlight_html_safe_falls_back() {
    let options = HighlightOptions {
      container: Some("main".to_string()),
      ..HighlightOptions::default()
    };
    let html = "<p>quick brown</p>";
    assert_eq!(highlight_html_safe(html, &["quick brown"], &options), html);
  }
}
