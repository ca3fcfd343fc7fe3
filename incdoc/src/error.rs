use std::{io, path::PathBuf, process::ExitStatus};

use color_eyre::eyre;
use incdoc_filter::FilterError;
use thiserror::Error;

/// Exit code for configuration and pre-flight failures.
pub const EXIT_CONFIG: u8 = 1;

/// Exit code for a failed or missing pandoc.
pub const EXIT_TRANSFORMER: u8 = 2;

/// Failures that end a build.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("Output path {} exists and is not a directory", .0.display())]
  OutputNotDirectory(PathBuf),

  #[error("Failed to run {}: {source}", .program.display())]
  Spawn {
    program: PathBuf,
    #[source]
    source:  io::Error,
  },

  #[error("pandoc could not {stage} {} ({status}): {}", .path.display(), .stderr.trim())]
  Transformer {
    stage:  &'static str,
    path:   PathBuf,
    status: ExitStatus,
    stderr: String,
  },

  #[error("Invalid pandoc output for {}: {source}", .path.display())]
  Document {
    path:   PathBuf,
    #[source]
    source: FilterError,
  },

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}

impl BuildError {
  /// Process exit code this failure maps to.
  #[must_use]
  pub const fn exit_code(&self) -> u8 {
    match self {
      Self::Spawn { .. } | Self::Transformer { .. } | Self::Document { .. } => {
        EXIT_TRANSFORMER
      },
      Self::OutputNotDirectory(_) | Self::Io(_) => EXIT_CONFIG,
    }
  }
}

impl From<fs_extra::error::Error> for BuildError {
  fn from(e: fs_extra::error::Error) -> Self {
    Self::Io(io::Error::other(e.to_string()))
  }
}

/// Exit code for a failed run, looking through any added context for a
/// [`BuildError`].
#[must_use]
pub fn exit_code_for(report: &eyre::Report) -> u8 {
  report
    .chain()
    .find_map(|cause| cause.downcast_ref::<BuildError>())
    .map_or(EXIT_CONFIG, BuildError::exit_code)
}
