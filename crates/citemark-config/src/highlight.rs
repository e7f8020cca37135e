use std::sync::LazyLock;

use citemark_core::HighlightOptions;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

static ELEMENT_NAME: LazyLock<Option<Regex>> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").ok());

static CLASS_NAME: LazyLock<Option<Regex>> =
  LazyLock::new(|| Regex::new(r"^-?[_A-Za-z][_A-Za-z0-9-]*$").ok());

/// Configuration for locating and marking chunks.
///
/// ```toml
/// [highlight]
/// anchor_words  = 2
/// tag           = "span"
/// class         = "chunk-highlight"
/// container     = "article"
/// skip_elements = ["script", "style"]
/// first_id      = "first-highlight"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
  /// Number of leading and trailing words a chunk is anchored by.
  pub anchor_words: usize,

  /// Element name of highlight units.
  pub tag: String,

  /// Class carried by every highlight unit.
  pub class: String,

  /// CSS selector of the element to search in. The whole document when
  /// unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub container: Option<String>,

  /// Elements whose text is ignored.
  pub skip_elements: Vec<String>,

  /// `id` attribute put on the first highlight unit.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_id: Option<String>,
}

impl Default for HighlightConfig {
  fn default() -> Self {
    Self {
      anchor_words:  HighlightOptions::DEFAULT_ANCHOR_WORDS,
      tag:           HighlightOptions::DEFAULT_TAG.to_string(),
      class:         HighlightOptions::DEFAULT_CLASS.to_string(),
      container:     None,
      skip_elements: HighlightOptions::default_skip_elements(),
      first_id:      None,
    }
  }
}

impl HighlightConfig {
  /// Validate the highlight configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if `anchor_words` is zero, or if the tag, class or
  /// first id cannot be used in HTML.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.anchor_words == 0 {
      return Err(invalid("highlight.anchor_words", "must be at least 1"));
    }

    if !matches_pattern(&ELEMENT_NAME, &self.tag) {
      return Err(invalid(
        "highlight.tag",
        format!("'{}' is not a valid element name", self.tag),
      ));
    }

    if !matches_pattern(&CLASS_NAME, &self.class) {
      return Err(invalid(
        "highlight.class",
        format!("'{}' is not a valid class name", self.class),
      ));
    }

    if let Some(ref container) = self.container
      && container.trim().is_empty()
    {
      return Err(invalid("highlight.container", "selector is empty"));
    }

    if let Some(ref id) = self.first_id
      && (id.is_empty() || id.contains(char::is_whitespace))
    {
      return Err(invalid(
        "highlight.first_id",
        format!("'{id}' is not a valid id"),
      ));
    }

    Ok(())
  }

  /// Apply a single `KEY=VALUE` override. `key` is relative to the
  /// `highlight` table.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not parse.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "anchor_words" => {
        self.anchor_words = value.parse().map_err(|e| {
          invalid("highlight.anchor_words", format!("{e}"))
        })?;
      },
      "tag" => value.clone_into(&mut self.tag),
      "class" => value.clone_into(&mut self.class),
      "container" => self.container = non_empty(value),
      "first_id" => self.first_id = non_empty(value),
      "skip_elements" => {
        self.skip_elements = value
          .split(',')
          .map(str::trim)
          .filter(|s| !s.is_empty())
          .map(String::from)
          .collect();
      },
      _ => return Err(ConfigError::UnknownKey(format!("highlight.{key}"))),
    }
    Ok(())
  }

  /// Merge `other` into `self`, `other` taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - `container`, `first_id`: replaced only when set in `other`
  /// - `skip_elements`: `other`'s entries are appended without duplicates
  /// - `anchor_words`, `tag`, `class`: always replaced. A file that omits one
  ///   of these carries its default, which then overrides an earlier file.
  ///   Set them in the last file that cares about them.
  pub fn merge(&mut self, other: Self) {
    self.anchor_words = other.anchor_words;
    self.tag = other.tag;
    self.class = other.class;
    if other.container.is_some() {
      self.container = other.container;
    }
    if other.first_id.is_some() {
      self.first_id = other.first_id;
    }
    for element in other.skip_elements {
      if !self.skip_elements.contains(&element) {
        self.skip_elements.push(element);
      }
    }
  }
}

impl From<&HighlightConfig> for HighlightOptions {
  fn from(config: &HighlightConfig) -> Self {
    Self {
      anchor_words:  config.anchor_words,
      tag:           config.tag.clone(),
      class:         config.class.clone(),
      skip_elements: config.skip_elements.clone(),
      container:     config.container.clone(),
      first_id:      config.first_id.clone(),
    }
  }
}

fn matches_pattern(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
  re.as_ref().is_some_and(|re| re.is_match(value))
}

fn non_empty(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
  ConfigError::InvalidValue {
    key:     key.to_string(),
    message: message.into(),
  }
}
