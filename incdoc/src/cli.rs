use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use incdoc_config::Config;

/// Command line interface for incdoc
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Build a documentation site with pandoc, filling code blocks from example files"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Defaults to `build`.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the incdoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render the configured Markdown sources to HTML.
  Build(BuildArgs),

  /// Act as a pandoc JSON filter: read a document on stdin, write the
  /// filtered document to stdout.
  Filter {
    /// Output format pandoc passes to filters.
    #[arg(default_value = "html")]
    format: String,

    /// Directory to search for included files (in order; replaces the
    /// configured list).
    #[arg(short = 'I', long = "include-dir", action = clap::ArgAction::Append)]
    include_dirs: Vec<PathBuf>,
  },

  /// Initialize a new incdoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "incdoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

/// Flags of the `build` subcommand. Anything given here wins over the
/// configuration files.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
  /// Markdown sources to render.
  pub sources: Vec<PathBuf>,

  /// Output directory for the generated site.
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Pandoc template for standalone output.
  #[arg(short, long)]
  pub template: Option<PathBuf>,

  /// Pandoc syntax highlighting style.
  #[arg(long = "highlight-style")]
  pub highlight_style: Option<String>,

  /// Directory to search for included files (in order, can be specified
  /// multiple times).
  #[arg(short = 'I', long = "include-dir", action = clap::ArgAction::Append)]
  pub include_dirs: Vec<PathBuf>,

  /// Directory to copy into the output (can be specified multiple times).
  #[arg(short = 'a', long = "asset-dir", action = clap::ArgAction::Append)]
  pub asset_dirs: Vec<PathBuf>,

  /// Template variable in KEY=VALUE form (can be specified multiple times).
  #[arg(short = 'V', long = "variable", action = clap::ArgAction::Append)]
  pub variables: Vec<String>,

  /// Pandoc executable to run.
  #[arg(long)]
  pub pandoc: Option<PathBuf>,
}

impl BuildArgs {
  /// Apply these flags on top of `config`. Non-empty lists replace the
  /// configured ones.
  pub fn apply_to(&self, config: &mut Config) {
    if !self.sources.is_empty() {
      config.sources.clone_from(&self.sources);
    }
    if let Some(ref output_dir) = self.output_dir {
      config.output_dir.clone_from(output_dir);
    }
    if self.template.is_some() {
      config.template.clone_from(&self.template);
    }
    if self.highlight_style.is_some() {
      config.highlight_style.clone_from(&self.highlight_style);
    }
    if !self.include_dirs.is_empty() {
      config.include_dirs.clone_from(&self.include_dirs);
    }
    if !self.asset_dirs.is_empty() {
      config.asset_dirs.clone_from(&self.asset_dirs);
    }
    for variable in &self.variables {
      let (key, value) = variable.split_once('=').unwrap_or((variable.as_str(), "true"));
      config.variables.insert(key.to_owned(), value.to_owned());
    }
    if let Some(ref pandoc) = self.pandoc {
      config.pandoc.clone_from(pandoc);
    }
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
