use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, highlight::HighlightConfig};

/// Configuration for citemark.
///
/// Fields are typically loaded from a TOML or JSON config file and can be
/// adjusted with `--config KEY=VALUE` overrides on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Number of threads used when several documents are processed at once.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jobs: Option<usize>,

  /// How chunks are located and marked.
  pub highlight: HighlightConfig,
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse JSON config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse TOML config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from explicit files, or a discovered one, then apply
  /// overrides and validate.
  ///
  /// Multiple files are merged in order, later files taking precedence.
  /// Without explicit files, [`Config::find_config_file`] is consulted and
  /// defaults are used if nothing is found.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed,
  /// or the resulting configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path)?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Keys of the `highlight` table are addressed as `highlight.KEY`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use citemark_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "highlight.class=cited".to_string(),
  ///     "jobs=2".to_string(),
  ///   ])
  ///   .unwrap();
  /// assert_eq!(config.highlight.class, "cited");
  /// assert_eq!(config.jobs, Some(2));
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not parse.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some(highlight_key) = key.strip_prefix("highlight.") {
      return self.highlight.apply_override(highlight_key, value);
    }

    match key {
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|e| {
            ConfigError::InvalidValue {
              key:     "jobs".to_string(),
              message: format!("{e}"),
            }
          })?)
        };
        Ok(())
      },
      _ => Err(ConfigError::UnknownKey(key.to_string())),
    }
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's entries are appended
  /// - Plain fields: Other's value always replaces, even when it is only the
  ///   default because the key was absent from the other file
  ///
  /// See [`HighlightConfig::merge`] for the `highlight` table.
  pub fn merge(&mut self, other: Self) {
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }
    self.highlight.merge(other.highlight);
  }

  /// Validate the configuration.
  ///
  /// # Errors
  ///
  /// Returns an error describing the first invalid value.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.jobs == Some(0) {
      return Err(ConfigError::InvalidValue {
        key:     "jobs".to_string(),
        message: "must be at least 1".to_string(),
      });
    }
    self.highlight.validate()
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "citemark.toml",
          "citemark.json",
          ".citemark.toml",
          ".citemark.json",
          ".config/citemark.toml",
          ".config/citemark.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["citemark.toml", "citemark.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        if let Ok(home) = std::env::var("HOME") {
          let home_config_dir =
            PathBuf::from(home).join(".config").join("citemark");
          for filename in &["config.toml", "config.json"] {
            let config_path = home_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Render the default configuration in `format` (`toml` or `json`).
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or serialization fails.
  pub fn default_config_string(format: &str) -> Result<String, ConfigError> {
    let config = Self::default();
    match format {
      "toml" => {
        let body = toml::to_string_pretty(&config)?;
        Ok(format!(
          "# citemark configuration\n#\n# Optional keys:\n#   jobs = 4\n#   \
           [highlight] container = \"article\"\n#   [highlight] first_id = \
           \"first-highlight\"\n\n{body}"
        ))
      },
      "json" => Ok(serde_json::to_string_pretty(&config)?),
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config format: {format}"
        )))
      },
    }
  }

  /// Write the default configuration to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let content = Self::default_config_string(format)?;
    fs::write(path, content)?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(())
  }
}
