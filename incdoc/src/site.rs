//! The build pipeline: parse, resolve includes, render, copy assets.
use std::{
  cell::Cell,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result};
use incdoc_config::Config;
use incdoc_filter::{IncludeError, IncludeResolver, Reporter, apply_filter};
use log::{error, info, warn};

use crate::{
  pandoc::Transformer,
  utils::{copy_asset_dirs, prepare_output_dir},
};

/// Logs include failures and counts them for the build summary.
#[derive(Debug, Default)]
pub struct BuildReporter {
  failed: Cell<usize>,
}

impl BuildReporter {
  #[must_use]
  pub fn failed(&self) -> usize {
    self.failed.get()
  }
}

impl Reporter for BuildReporter {
  fn include_failed(&self, error: &IncludeError) {
    self.failed.set(self.failed.get() + 1);
    error!("{error}");
  }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildSummary {
  /// Rendered pages, in source order.
  pub pages:            Vec<PathBuf>,
  /// Asset directories mirrored into the output.
  pub assets:           Vec<PathBuf>,
  /// Code blocks left with their placeholder text.
  pub missing_includes: usize,
}

/// Build every configured source, then mirror the asset directories.
///
/// The output directory is checked before any other work. A transformer
/// failure stops the build at that source; asset directories are only copied
/// once every page has rendered.
///
/// # Errors
///
/// Returns an error if the output directory collides with a file, if the
/// transformer fails, or if assets cannot be copied.
pub fn build_site<T: Transformer + ?Sized>(
  config: &Config,
  transformer: &T,
) -> Result<BuildSummary> {
  prepare_output_dir(&config.output_dir)?;

  let reporter = BuildReporter::default();
  let mut resolver =
    IncludeResolver::new(&config.include_dirs).with_reporter(&reporter);

  let mut pages = Vec::new();
  for source in config.source_files() {
    let output = config.output_path_for(&source);
    build_page(&source, &output, transformer, &mut resolver)
      .wrap_err_with(|| format!("Failed to build {}", source.display()))?;
    info!("Generated {}", output.display());
    pages.push(output);
  }

  let assets = copy_asset_dirs(&config.asset_dirs, &config.output_dir)?;

  let missing_includes = reporter.failed();
  if missing_includes > 0 {
    warn!(
      "{missing_includes} code block(s) kept their placeholder text; check the \
       include names and include_dirs"
    );
  }

  Ok(BuildSummary {
    pages,
    assets,
    missing_includes,
  })
}

fn build_page<T, R>(
  source: &Path,
  output: &Path,
  transformer: &T,
  resolver: &mut IncludeResolver<incdoc_filter::FileSystem, R>,
) -> Result<()>
where
  T: Transformer + ?Sized,
  R: Reporter,
{
  let document = transformer.parse(source)?;
  let document = apply_filter(document, resolver, transformer.format());
  transformer.render(&document, source, output)?;
  Ok(())
}
