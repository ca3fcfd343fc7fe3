//! Invocation of pandoc, the external document transformer.
use std::{
  collections::BTreeMap,
  io::Write,
  path::{Path, PathBuf},
  process::{Command, Output, Stdio},
};

use incdoc_config::Config;
use incdoc_filter::Document;
use log::debug;

use crate::error::BuildError;

/// Parses Markdown into a document tree and renders filtered trees.
///
/// The build pipeline only talks to pandoc through this trait, so it can be
/// driven by something else in tests.
pub trait Transformer {
  /// Output format reported to filters.
  fn format(&self) -> &str {
    "html"
  }

  /// Parse `source` into a document tree.
  ///
  /// # Errors
  ///
  /// Returns an error if the source cannot be parsed.
  fn parse(&self, source: &Path) -> Result<Document, BuildError>;

  /// Render `document` (parsed from `source`) into `output`.
  ///
  /// # Errors
  ///
  /// Returns an error if rendering fails.
  fn render(
    &self,
    document: &Document,
    source: &Path,
    output: &Path,
  ) -> Result<(), BuildError>;
}

/// Runs the `pandoc` executable.
#[derive(Debug, Clone)]
pub struct Pandoc {
  program:         PathBuf,
  template:        Option<PathBuf>,
  highlight_style: Option<String>,
  variables:       BTreeMap<String, String>,
  standalone:      bool,
  extra_args:      Vec<String>,
}

impl Pandoc {
  #[must_use]
  pub fn from_config(config: &Config) -> Self {
    Self {
      program:         config.pandoc.clone(),
      template:        config.template.clone(),
      highlight_style: config.highlight_style.clone(),
      variables:       config.variables.clone(),
      standalone:      config.standalone,
      extra_args:      config.pandoc_args.clone(),
    }
  }

  /// Arguments for turning a JSON tree on stdin into `output`.
  #[must_use]
  pub fn render_args(&self, output: &Path) -> Vec<String> {
    let mut args = vec![
      "--from".to_owned(),
      "json".to_owned(),
      "--to".to_owned(),
      "html5".to_owned(),
      "--output".to_owned(),
      output.display().to_string(),
    ];

    if self.standalone {
      args.push("--standalone".to_owned());
    }
    if let Some(ref template) = self.template {
      args.push(format!("--template={}", template.display()));
    }
    if let Some(ref style) = self.highlight_style {
      args.push(format!("--highlight-style={style}"));
    }
    for (key, value) in &self.variables {
      args.push("--variable".to_owned());
      args.push(format!("{key}={value}"));
    }
    args.extend(self.extra_args.iter().cloned());

    args
  }

  fn command(&self) -> Command {
    let mut command = Command::new(&self.program);
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    command
  }

  fn spawn_error(&self, source: std::io::Error) -> BuildError {
    BuildError::Spawn {
      program: self.program.clone(),
      source,
    }
  }

  fn check(
    output: &Output,
    stage: &'static str,
    path: &Path,
  ) -> Result<(), BuildError> {
    if output.status.success() {
      return Ok(());
    }
    Err(BuildError::Transformer {
      stage,
      path: path.to_path_buf(),
      status: output.status,
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }
}

impl Transformer for Pandoc {
  fn parse(&self, source: &Path) -> Result<Document, BuildError> {
    debug!("Parsing {} with {}", source.display(), self.program.display());

    let output = self
      .command()
      .args(["--from", "markdown", "--to", "json"])
      .arg(source)
      .stdin(Stdio::null())
      .output()
      .map_err(|e| self.spawn_error(e))?;
    Self::check(&output, "parse", source)?;

    let json = String::from_utf8_lossy(&output.stdout);
    Document::from_json(&json).map_err(|source_err| {
      BuildError::Document {
        path:   source.to_path_buf(),
        source: source_err,
      }
    })
  }

  fn render(
    &self,
    document: &Document,
    source: &Path,
    output: &Path,
  ) -> Result<(), BuildError> {
    let json = document.to_json().map_err(|e| {
      BuildError::Document {
        path:   source.to_path_buf(),
        source: e,
      }
    })?;

    let args = self.render_args(output);
    debug!("Running {} {}", self.program.display(), args.join(" "));

    let mut child = self
      .command()
      .args(&args)
      .stdin(Stdio::piped())
      .spawn()
      .map_err(|e| self.spawn_error(e))?;

    // A failed write usually means pandoc exited early; its status says why.
    let written = child
      .stdin
      .take()
      .map_or(Ok(()), |mut stdin| stdin.write_all(json.as_bytes()));

    let result = child.wait_with_output()?;
    Self::check(&result, "render", source)?;
    written?;

    let warnings = String::from_utf8_lossy(&result.stderr);
    for line in warnings.lines().filter(|l| !l.trim().is_empty()) {
      log::warn!("pandoc: {line}");
    }

    Ok(())
  }
}
