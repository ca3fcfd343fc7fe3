use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use log::{debug, warn};

use crate::error::BuildError;

/// Mirror each asset directory into `output_dir`, keeping its name.
///
/// `images/` ends up as `<output_dir>/images/`, overwriting files left by a
/// previous build. Directories that do not exist are skipped with a warning.
///
/// # Returns
///
/// The output paths of the directories that were copied.
///
/// # Errors
///
/// Returns an error if copying fails.
pub fn copy_asset_dirs(
  asset_dirs: &[PathBuf],
  output_dir: &Path,
) -> Result<Vec<PathBuf>> {
  let options = fs_extra::dir::CopyOptions::new().overwrite(true);
  let mut copied = Vec::with_capacity(asset_dirs.len());

  for asset_dir in asset_dirs {
    if !asset_dir.is_dir() {
      warn!("Skipping missing asset directory: {}", asset_dir.display());
      continue;
    }

    let Some(name) = asset_dir.file_name() else {
      warn!("Skipping asset directory without a name: {}", asset_dir.display());
      continue;
    };

    debug!("Copying assets from {}", asset_dir.display());
    fs_extra::dir::copy(asset_dir, output_dir, &options)
      .map_err(BuildError::from)
      .wrap_err_with(|| {
        format!("Failed to copy assets from {}", asset_dir.display())
      })?;
    copied.push(output_dir.join(name));
  }

  Ok(copied)
}
