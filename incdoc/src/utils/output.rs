use std::{fs, path::Path};

use log::info;

use crate::error::BuildError;

/// Make sure `output_dir` exists as a directory.
///
/// Runs before anything else in a build, so a colliding plain file aborts
/// the build without creating any output.
///
/// # Errors
///
/// Returns [`BuildError::OutputNotDirectory`] if the path exists and is not a
/// directory, or an I/O error if it cannot be created.
pub fn prepare_output_dir(output_dir: &Path) -> Result<(), BuildError> {
  if output_dir.exists() && !output_dir.is_dir() {
    return Err(BuildError::OutputNotDirectory(output_dir.to_path_buf()));
  }

  fs::create_dir_all(output_dir)?;
  info!("Output directory: {}", output_dir.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn creates_missing_directories_idempotently() {
    let temp_dir = tempdir().expect("Failed to create temp dir in test");
    let output = temp_dir.path().join("site").join("gen");

    prepare_output_dir(&output).expect("first call should succeed");
    prepare_output_dir(&output).expect("second call should succeed");
    assert!(output.is_dir());
  }

  #[test]
  fn rejects_plain_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir in test");
    let output = temp_dir.path().join("gen");
    fs::write(&output, "not a directory").expect("Failed to write file in test");

    let err = prepare_output_dir(&output).expect_err("collision must fail");
    assert!(matches!(err, BuildError::OutputNotDirectory(_)));
    assert!(output.is_file());
  }
}
