//! Implementations of the `highlight` and `locate` commands.
use std::{
  collections::HashSet,
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use citemark_config::Config;
use citemark_core::{
  HighlightOptions,
  Highlighter,
  HtmlDocument,
  HtmlOutcome,
  LocateReport,
  highlight_html,
  process::recover,
};
use log::{debug, error, info};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{CitemarkError, Result};

/// A document to process, with the path it is written to below an output
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
  pub path:     PathBuf,
  pub relative: PathBuf,
}

/// Where highlighted documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
  Stdout,
  File(PathBuf),
  Dir(PathBuf),
}

impl OutputTarget {
  /// Pick the output target for `input_count` documents.
  ///
  /// # Errors
  ///
  /// Returns an error if several documents would be written to a single
  /// destination.
  pub fn new(
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    input_count: usize,
  ) -> Result<Self> {
    if let Some(dir) = output_dir {
      return Ok(Self::Dir(dir));
    }
    if input_count > 1 {
      return Err(CitemarkError::Input(format!(
        "{input_count} input documents need --output-dir"
      )));
    }
    Ok(output.map_or(Self::Stdout, Self::File))
  }

  /// File the highlighted `input` is written to, [`None`] for stdout.
  #[must_use]
  pub fn destination(&self, input: &InputFile) -> Option<PathBuf> {
    match self {
      Self::Stdout => None,
      Self::File(path) => Some(path.clone()),
      Self::Dir(dir) => Some(dir.join(&input.relative)),
    }
  }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
  /// Documents processed without error.
  pub processed:   usize,
  /// Documents in which at least one chunk was highlighted.
  pub highlighted: usize,
}

/// Build the engine options from configuration and command line overrides.
#[must_use]
pub fn highlight_options(
  config: &Config,
  container: Option<String>,
) -> HighlightOptions {
  let mut options = HighlightOptions::from(&config.highlight);
  if container.is_some() {
    options.container = container;
  }
  options
}

/// Number of worker threads: the command line wins over the config, which
/// wins over the number of CPUs.
#[must_use]
pub fn resolve_jobs(cli_jobs: Option<usize>, config: &Config) -> usize {
  cli_jobs.or(config.jobs).unwrap_or_else(num_cpus::get).max(1)
}

fn is_html(path: &Path) -> bool {
  path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| {
    ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
  })
}

/// Expand the given paths into the documents to process.
///
/// Files are taken as they are; directories contribute every `.html` and
/// `.htm` file below them, in file name order.
///
/// # Errors
///
/// Returns an error if a path does not exist.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<InputFile>> {
  let mut files = Vec::new();

  for input in inputs {
    if input.is_dir() {
      let before = files.len();
      for entry in WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && is_html(e.path()))
      {
        let path = entry.path().to_path_buf();
        let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
        files.push(InputFile { path, relative });
      }
      debug!(
        "Found {} HTML file(s) in {}",
        files.len() - before,
        input.display()
      );
    } else if input.is_file() {
      let relative = input
        .file_name()
        .map_or_else(|| input.clone(), PathBuf::from);
      files.push(InputFile {
        path: input.clone(),
        relative,
      });
    } else {
      return Err(CitemarkError::Input(format!(
        "input not found: {}",
        input.display()
      )));
    }
  }

  Ok(files)
}

/// Run `f` for the document at `path`, turning a panic into an error.
///
/// # Errors
///
/// Returns whatever `f` returns, or [`CitemarkError::Panicked`] if it
/// panicked.
pub fn guarded<T, F>(path: &Path, f: F) -> Result<T>
where
  F: FnOnce() -> Result<T>,
{
  recover(f)
    .ok_or_else(|| CitemarkError::Panicked(path.display().to_string()))?
}

/// Highlight `chunks` in the HTML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the container selector
/// fails, or highlighting panics.
pub fn highlight_file(
  path: &Path,
  chunks: &[String],
  options: &HighlightOptions,
) -> Result<HtmlOutcome> {
  let html = fs::read_to_string(path)?;
  let outcome =
    guarded(path, || Ok(highlight_html(&html, chunks, options)?))?;
  info!(
    "{}: matched {}/{} chunk(s)",
    path.display(),
    outcome.report.matched(),
    chunks.len()
  );
  Ok(outcome)
}

/// Check that no two inputs are written to the same file.
///
/// # Errors
///
/// Returns an error naming the first destination shared by two inputs.
pub fn check_destinations(
  inputs: &[InputFile],
  target: &OutputTarget,
) -> Result<()> {
  let mut seen = HashSet::new();
  for input in inputs {
    if let Some(destination) = target.destination(input)
      && !seen.insert(destination.clone())
    {
      return Err(CitemarkError::Input(format!(
        "several inputs would be written to {}, including {}",
        destination.display(),
        input.path.display()
      )));
    }
  }
  Ok(())
}

fn write_output(path: &Path, html: &str) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, html)?;
  debug!("Wrote {}", path.display());
  Ok(())
}

/// Highlight `chunks` in every input and write the results to `target`.
///
/// Documents are processed in parallel on a pool of `jobs` threads. A
/// document that fails is logged and does not stop the others; the run as a
/// whole then reports an error.
///
/// # Errors
///
/// Returns an error if two inputs share a destination, if the thread pool
/// cannot be built, if stdout cannot be written, or if any document failed.
pub fn run_highlight<W: Write>(
  inputs: &[InputFile],
  chunks: &[String],
  options: &HighlightOptions,
  target: &OutputTarget,
  jobs: usize,
  stdout: &mut W,
) -> Result<Summary> {
  if matches!(target, OutputTarget::Stdout) {
    let mut summary = Summary::default();
    for input in inputs {
      let outcome = highlight_file(&input.path, chunks, options)?;
      stdout.write_all(outcome.html.as_bytes())?;
      summary.processed += 1;
      summary.highlighted += usize::from(outcome.highlighted);
    }
    return Ok(summary);
  }

  check_destinations(inputs, target)?;

  let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
  debug!("Processing {} document(s) on {jobs} thread(s)", inputs.len());

  let results: Vec<(&InputFile, Result<bool>)> = pool.install(|| {
    inputs
      .par_iter()
      .map(|input| {
        let result =
          highlight_file(&input.path, chunks, options).and_then(|outcome| {
            if let Some(destination) = target.destination(input) {
              write_output(&destination, &outcome.html)?;
            }
            Ok(outcome.highlighted)
          });
        (input, result)
      })
      .collect()
  });

  let mut summary = Summary::default();
  let mut failed = 0;
  for (input, result) in results {
    match result {
      Ok(highlighted) => {
        summary.processed += 1;
        summary.highlighted += usize::from(highlighted);
      },
      Err(e) => {
        error!("Failed to highlight {}: {e}", input.path.display());
        failed += 1;
      },
    }
  }

  info!(
    "Highlighted chunks in {} of {} document(s)",
    summary.highlighted,
    inputs.len()
  );

  if failed > 0 {
    return Err(CitemarkError::Input(format!(
      "{failed} of {} document(s) failed",
      inputs.len()
    )));
  }
  Ok(summary)
}

/// Locate `chunks` in the HTML file at `path` without modifying it.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the container selector
/// fails, or the search panics.
pub fn locate_file(
  path: &Path,
  chunks: &[String],
  options: &HighlightOptions,
) -> Result<LocateReport> {
  let html = fs::read_to_string(path)?;
  guarded(path, || {
    let mut document = HtmlDocument::parse(&html, options);
    if let Some(ref selector) = options.container {
      document = document.scoped(selector)?;
    }
    Ok(Highlighter::new(options.clone()).plan(&document, chunks).report())
  })
}
