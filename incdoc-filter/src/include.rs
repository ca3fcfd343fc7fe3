//! Substitution of `include="<file>"` code blocks.
use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
  ast::{CODE_BLOCK, Node},
  error::{FilterError, IncludeError},
  walk::{Filter, Replacement},
};

/// Attribute key that marks a code block for substitution.
pub const INCLUDE_KEY: &str = "include";

/// Read access to the files an `include` attribute may point at.
pub trait IncludeSource {
  /// Whether `path` names an existing regular file.
  fn is_file(&self, path: &Path) -> bool;

  /// Read the whole file as UTF-8 text.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be opened or is not valid UTF-8.
  fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl IncludeSource for FileSystem {
  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }
}

/// Sink for the diagnostics the resolver produces while it degrades to a
/// pass-through.
pub trait Reporter {
  fn include_failed(&self, error: &IncludeError);

  fn malformed_node(&self, error: &FilterError) {
    log::warn!("Leaving code block unchanged: {error}");
  }
}

impl<R: Reporter + ?Sized> Reporter for &R {
  fn include_failed(&self, error: &IncludeError) {
    (**self).include_failed(error);
  }

  fn malformed_node(&self, error: &FilterError) {
    (**self).malformed_node(error);
  }
}

/// Reports through the [`log`] facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
  fn include_failed(&self, error: &IncludeError) {
    log::error!("{error}");
  }
}

/// Replaces the text of `include` code blocks with file contents.
///
/// Candidate directories are searched in the order given and the first
/// regular file found wins. The resolver keeps no state between calls, so
/// resolving the same block twice reads the file twice.
#[derive(Debug, Clone)]
pub struct IncludeResolver<S = FileSystem, R = LogReporter> {
  include_dirs: Vec<PathBuf>,
  source:       S,
  reporter:     R,
}

impl IncludeResolver {
  /// Create a resolver over the real file system that logs failures.
  pub fn new<I, P>(include_dirs: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    Self {
      include_dirs: include_dirs.into_iter().map(Into::into).collect(),
      source:       FileSystem,
      reporter:     LogReporter,
    }
  }
}

impl<S, R> IncludeResolver<S, R> {
  /// Swap the file access backend.
  #[must_use]
  pub fn with_source<T: IncludeSource>(self, source: T) -> IncludeResolver<T, R> {
    IncludeResolver {
      include_dirs: self.include_dirs,
      source,
      reporter: self.reporter,
    }
  }

  /// Swap the diagnostic sink.
  #[must_use]
  pub fn with_reporter<T: Reporter>(self, reporter: T) -> IncludeResolver<S, T> {
    IncludeResolver {
      include_dirs: self.include_dirs,
      source: self.source,
      reporter,
    }
  }

  /// The candidate directories, in search order.
  #[must_use]
  pub fn include_dirs(&self) -> &[PathBuf] {
    &self.include_dirs
  }
}

impl<S: IncludeSource, R: Reporter> IncludeResolver<S, R> {
  /// Return the contents of `filename` from the first candidate directory
  /// that holds it as a regular file.
  ///
  /// # Errors
  ///
  /// Returns [`IncludeError::NotFound`] if no directory has the file, and
  /// [`IncludeError::Unreadable`] if the first match cannot be read.
  pub fn find_file(&self, filename: &str) -> Result<String, IncludeError> {
    if filename.is_empty() {
      return Err(IncludeError::NotFound {
        filename: String::new(),
        searched: Vec::new(),
      });
    }

    let mut searched = Vec::with_capacity(self.include_dirs.len());
    for dir in &self.include_dirs {
      let path = dir.join(filename);
      if self.source.is_file(&path) {
        log::debug!("Including {}", path.display());
        return self.source.read_to_string(&path).map_err(|source| {
          IncludeError::Unreadable {
            filename: filename.to_owned(),
            path,
            source,
          }
        });
      }
      searched.push(path);
    }

    Err(IncludeError::NotFound {
      filename: filename.to_owned(),
      searched,
    })
  }

  /// Resolve a single node.
  ///
  /// Returns a replacement code block when `node` carries an `include`
  /// attribute whose file can be read, and [`None`] otherwise. Failures are
  /// handed to the reporter.
  pub fn resolve(&self, node: &Node) -> Option<Node> {
    let Node::CodeBlock(block) = node else {
      return None;
    };
    let filename = block.attr.get(INCLUDE_KEY)?;

    match self.find_file(filename) {
      Ok(content) => Some(Node::CodeBlock(block.with_text(content))),
      Err(e) => {
        self.reporter.include_failed(&e);
        None
      },
    }
  }
}

impl<S: IncludeSource, R: Reporter> Filter for IncludeResolver<S, R> {
  fn apply(
    &mut self,
    tag: &str,
    content: Option<&Value>,
    _format: &str,
    _meta: &Value,
  ) -> Option<Replacement> {
    if tag != CODE_BLOCK {
      return None;
    }

    let node = match Node::decode(tag, content) {
      Ok(node) => node,
      Err(e) => {
        self.reporter.malformed_node(&e);
        return None;
      },
    };

    match self.resolve(&node)?.into_value() {
      Ok(value) => Some(Replacement::Node(value)),
      Err(e) => {
        self.reporter.malformed_node(&e);
        None
      },
    }
  }
}
