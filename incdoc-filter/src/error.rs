use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading, decoding or writing a pandoc document.
#[derive(Debug, Error)]
pub enum FilterError {
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Malformed {tag} node: {reason}")]
  Malformed { tag: String, reason: String },
}

/// Why an `include` attribute could not be satisfied.
///
/// Both variants are recoverable: the resolver reports them and keeps the
/// original code block.
#[derive(Debug, Error)]
pub enum IncludeError {
  /// No candidate directory holds a regular file with this name.
  #[error("Cannot find include file: {filename}")]
  NotFound {
    filename: String,
    searched: Vec<PathBuf>,
  },

  /// The first matching file exists but could not be read as text.
  #[error("Cannot read include file {filename} at {}: {source}", .path.display())]
  Unreadable {
    filename: String,
    path:     PathBuf,
    #[source]
    source:   io::Error,
  },
}

impl IncludeError {
  /// The filename as written in the `include` attribute.
  #[must_use]
  pub fn filename(&self) -> &str {
    match self {
      Self::NotFound { filename, .. } | Self::Unreadable { filename, .. } => {
        filename
      },
    }
  }
}
