//! Panic-recovering wrappers for string-in, string-out processing.
use log::{error, warn};

/// Run `f`, returning [`None`] if it panicked. The panic message is logged.
pub fn recover<T, F>(f: F) -> Option<T>
where
  F: FnOnce() -> T,
{
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
    Ok(value) => Some(value),
    Err(e) => {
      if let Some(msg) = e.downcast_ref::<String>() {
        error!("Error processing document: {msg}");
      } else if let Some(msg) = e.downcast_ref::<&str>() {
        error!("Error processing document: {msg}");
      } else {
        error!("Unknown error occurred while processing document");
      }
      None
    },
  }
}

/// Run `processor_fn` on `content`, recovering from panics.
///
/// A panic inside `processor_fn` is logged and `fallback` is returned instead
/// (or `content` itself when `fallback` is empty).
pub fn process_safe<F>(content: &str, processor_fn: F, fallback: &str) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  recover(|| processor_fn(content)).unwrap_or_else(|| {
    warn!("Returning document without highlights");
    if fallback.is_empty() {
      content.to_string()
    } else {
      fallback.to_string()
    }
  })
}
