use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, templates};

/// Source built when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "index.md";

/// File names probed, in order, when no config file is given explicitly.
pub const CONFIG_FILENAMES: [&str; 4] =
  ["incdoc.toml", "incdoc.json", ".incdoc.toml", ".incdoc.json"];

/// Configuration for an incdoc build.
///
/// [`Config`] describes which Markdown sources to render, where pandoc finds
/// its template, where `include` code blocks look for example files, and
/// which asset directories are mirrored into the output. Fields are
/// typically loaded from a TOML or JSON file and then refined with
/// `--config KEY=VALUE` overrides and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Markdown sources. Each one is rendered to `<file stem>.html`.
  pub sources: Vec<PathBuf>,

  /// Output directory for the generated site.
  pub output_dir: PathBuf,

  /// Pandoc template for standalone output.
  pub template: Option<PathBuf>,

  /// Pandoc highlight style, e.g. `zenburn`.
  pub highlight_style: Option<String>,

  /// Template variables, passed to pandoc as `-V key=value`.
  pub variables: BTreeMap<String, String>,

  /// Candidate directories for `include` code blocks, in search order.
  pub include_dirs: Vec<PathBuf>,

  /// Directories copied verbatim into the output directory.
  pub asset_dirs: Vec<PathBuf>,

  /// Pandoc executable.
  pub pandoc: PathBuf,

  /// Extra arguments appended to the rendering pandoc invocation.
  pub pandoc_args: Vec<String>,

  /// Whether to render complete pages (`--standalone`).
  pub standalone: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      sources:         Vec::new(),
      output_dir:      PathBuf::from("gen"),
      template:        None,
      highlight_style: None,
      variables:       BTreeMap::new(),
      include_dirs:    Vec::new(),
      asset_dirs:      Vec::new(),
      pandoc:          PathBuf::from("pandoc"),
      pandoc_args:     Vec::new(),
      standalone:      true,
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one, then
  /// apply `KEY=VALUE` overrides.
  ///
  /// Files are merged in order (see [`Config::merge`]). With no files given,
  /// the working directory is searched for one of [`CONFIG_FILENAMES`]; with
  /// nothing found the defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    config.apply_overrides(config_overrides)?;
    Ok(config)
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: other's [`Some`] replaces this config's value
  /// - [`Vec<T>`] fields: other's entries are appended
  /// - [`BTreeMap`] fields: other's entries are merged in, key by key
  /// - Plain fields: other's value always replaces
  pub fn merge(&mut self, other: Self) {
    let Self {
      sources,
      output_dir,
      template,
      highlight_style,
      variables,
      include_dirs,
      asset_dirs,
      pandoc,
      pandoc_args,
      standalone,
    } = other;

    self.sources.extend(sources);
    self.output_dir = output_dir;
    if template.is_some() {
      self.template = template;
    }
    if highlight_style.is_some() {
      self.highlight_style = highlight_style;
    }
    self.variables.extend(variables);
    self.include_dirs.extend(include_dirs);
    self.asset_dirs.extend(asset_dirs);
    self.pandoc = pandoc;
    self.pandoc_args.extend(pandoc_args);
    self.standalone = standalone;
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// List fields take a comma-separated value and replace the whole list.
  /// Template variables are set with `variables.NAME=VALUE`. An empty value
  /// clears an optional field.
  ///
  /// # Example
  ///
  /// ```rust
  /// # use incdoc_config::Config;
  /// let mut config = Config::default();
  /// config.apply_overrides(&[
  ///   "output_dir=site".to_string(),
  ///   "variables.root=/docs/".to_string(),
  /// ])?;
  /// assert_eq!(config.output_dir, std::path::PathBuf::from("site"));
  /// # Ok::<(), incdoc_config::ConfigError>(())
  /// ```
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in `KEY=VALUE` format, the key is
  /// unknown, or the value cannot be parsed.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
    fn list(value: &str) -> impl Iterator<Item = &str> {
      value.split(',').map(str::trim).filter(|item| !item.is_empty())
    }

    fn optional(value: &str) -> Option<String> {
      (!value.is_empty()).then(|| value.to_owned())
    }

    if let Some(name) = key.strip_prefix("variables.") {
      if name.is_empty() {
        return Err(ConfigError::Override {
          key:    key.to_owned(),
          reason: "missing variable name".to_owned(),
        });
      }
      self.variables.insert(name.to_owned(), value.to_owned());
      return Ok(());
    }

    match key {
      "sources" => self.sources = list(value).map(PathBuf::from).collect(),
      "output_dir" => {
        if value.is_empty() {
          return Err(ConfigError::Override {
            key:    key.to_owned(),
            reason: "value cannot be empty".to_owned(),
          });
        }
        self.output_dir = PathBuf::from(value);
      },
      "template" => self.template = optional(value).map(PathBuf::from),
      "highlight_style" => self.highlight_style = optional(value),
      "include_dirs" => {
        self.include_dirs = list(value).map(PathBuf::from).collect();
      },
      "asset_dirs" => {
        self.asset_dirs = list(value).map(PathBuf::from).collect();
      },
      "pandoc" => self.pandoc = PathBuf::from(value),
      "pandoc_args" => {
        self.pandoc_args = value.split_whitespace().map(str::to_owned).collect();
      },
      "standalone" => {
        self.standalone = match value.to_lowercase().as_str() {
          "true" | "yes" | "1" => true,
          "false" | "no" | "0" => false,
          _ => {
            return Err(ConfigError::Override {
              key:    key.to_owned(),
              reason: format!(
                "invalid boolean '{value}'. Expected true/false, yes/no, or \
                 1/0"
              ),
            });
          },
        };
      },
      _ => {
        return Err(ConfigError::Override {
          key:    key.to_owned(),
          reason: "unknown configuration key".to_owned(),
        });
      },
    }

    Ok(())
  }

  /// Sources to build, falling back to [`DEFAULT_SOURCE`].
  #[must_use]
  pub fn source_files(&self) -> Vec<PathBuf> {
    if self.sources.is_empty() {
      vec![PathBuf::from(DEFAULT_SOURCE)]
    } else {
      self.sources.clone()
    }
  }

  /// Where the page rendered from `source` is written.
  #[must_use]
  pub fn output_path_for(&self, source: &Path) -> PathBuf {
    let mut name = source
      .file_stem()
      .unwrap_or(source.as_os_str())
      .to_os_string();
    name.push(".html");
    self.output_dir.join(name)
  }

  /// Search the working directory for a config file.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for one of [`CONFIG_FILENAMES`].
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Validate the paths the build depends on.
  ///
  /// Missing include directories are only warned about: a missing directory
  /// simply never matches.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Validation`] listing every source or template
  /// that does not exist.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for source in self.source_files() {
      if !source.exists() {
        errors.push(format!("Source file does not exist: {}", source.display()));
      } else if !source.is_file() {
        errors.push(format!("Source path is not a file: {}", source.display()));
      }
    }

    if let Some(ref template) = self.template
      && !template.is_file()
    {
      errors.push(format!(
        "Template file does not exist: {}",
        template.display()
      ));
    }

    for dir in &self.include_dirs {
      if !dir.is_dir() {
        log::warn!("Include directory does not exist: {}", dir.display());
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Validation(errors))
    }
  }

  /// Write a default configuration file with commented explanations.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use tempfile::tempdir;

  use super::*;

  fn overrides(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
  }

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.template = Some(PathBuf::from("base.html"));

    let mut other = Config::default();
    other.template = None;
    other.highlight_style = Some("tango".to_owned());

    base.merge(other);

    assert_eq!(base.template, Some(PathBuf::from("base.html")));
    assert_eq!(base.highlight_style.as_deref(), Some("tango"));
  }

  #[test]
  fn test_config_merge_vec_fields_append() {
    let mut base = Config::default();
    base.include_dirs = vec![PathBuf::from("pylint")];

    let mut other = Config::default();
    other.include_dirs = vec![PathBuf::from("examples")];
    other.variables.insert("root".to_owned(), "../".to_owned());

    base.merge(other);

    assert_eq!(base.include_dirs, vec![
      PathBuf::from("pylint"),
      PathBuf::from("examples")
    ]);
    assert_eq!(base.variables.get("root").map(String::as_str), Some("../"));
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&overrides(&[
        "output_dir=site",
        "include_dirs=a, b,,c",
        "standalone=no",
        "variables.root=/",
        "template=",
        "pandoc_args=--toc --number-sections",
      ]))
      .unwrap();

    assert_eq!(config.output_dir, PathBuf::from("site"));
    assert_eq!(config.include_dirs, vec![
      PathBuf::from("a"),
      PathBuf::from("b"),
      PathBuf::from("c")
    ]);
    assert!(!config.standalone);
    assert_eq!(config.variables.get("root").map(String::as_str), Some("/"));
    assert_eq!(config.template, None);
    assert_eq!(config.pandoc_args, vec!["--toc", "--number-sections"]);
  }

  #[test]
  fn test_apply_overrides_rejects_bad_input() {
    let mut config = Config::default();

    assert!(matches!(
      config.apply_overrides(&overrides(&["no_equals_sign"])),
      Err(ConfigError::Config(_))
    ));
    assert!(matches!(
      config.apply_overrides(&overrides(&["nonsense=1"])),
      Err(ConfigError::Override { .. })
    ));
    assert!(matches!(
      config.apply_overrides(&overrides(&["standalone=maybe"])),
      Err(ConfigError::Override { .. })
    ));
    assert!(matches!(
      config.apply_overrides(&overrides(&["output_dir="])),
      Err(ConfigError::Override { .. })
    ));
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let temp_dir = tempdir().unwrap();
    let toml_path = temp_dir.path().join("incdoc.toml");
    let json_path = temp_dir.path().join("incdoc.json");
    fs::write(&toml_path, "output_dir = \"out\"\ninclude_dirs = [\"ex\"]\n")
      .unwrap();
    fs::write(&json_path, r#"{"sources": ["guide.md"]}"#).unwrap();

    let from_toml = Config::from_file(&toml_path).unwrap();
    assert_eq!(from_toml.output_dir, PathBuf::from("out"));
    assert_eq!(from_toml.include_dirs, vec![PathBuf::from("ex")]);
    assert!(from_toml.standalone);

    let merged = Config::load(&[toml_path, json_path], &[]).unwrap();
    assert_eq!(merged.sources, vec![PathBuf::from("guide.md")]);
    assert_eq!(merged.include_dirs, vec![PathBuf::from("ex")]);
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("incdoc.yaml");
    fs::write(&path, "output_dir: out").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported config file format"));
  }

  #[test]
  fn test_find_config_file_in_order() {
    let temp_dir = tempdir().unwrap();
    assert_eq!(Config::find_config_file_in(temp_dir.path()), None);

    fs::write(temp_dir.path().join(".incdoc.json"), "{}").unwrap();
    fs::write(temp_dir.path().join("incdoc.json"), "{}").unwrap();

    assert_eq!(
      Config::find_config_file_in(temp_dir.path()),
      Some(temp_dir.path().join("incdoc.json"))
    );
  }

  #[test]
  fn test_source_files_default_and_output_paths() {
    let mut config = Config::default();
    assert_eq!(config.source_files(), vec![PathBuf::from("index.md")]);
    assert_eq!(
      config.output_path_for(Path::new("docs/index.md")),
      PathBuf::from("gen/index.html")
    );

    config.sources = vec![PathBuf::from("a.md"), PathBuf::from("v1.2.markdown")];
    assert_eq!(config.source_files().len(), 2);
    assert_eq!(
      config.output_path_for(Path::new("v1.2.markdown")),
      PathBuf::from("gen/v1.2.html")
    );
  }

  #[test]
  fn test_validate_paths_collects_all_errors() {
    let temp_dir = tempdir().unwrap();
    let mut config = Config::default();
    config.sources = vec![
      temp_dir.path().join("missing.md"),
      temp_dir.path().to_path_buf(),
    ];
    config.template = Some(temp_dir.path().join("template.html"));

    let Err(ConfigError::Validation(errors)) = config.validate_paths() else {
      panic!("expected validation errors");
    };
    assert_eq!(errors.len(), 3);
  }

  #[test]
  fn test_generate_default_config() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("incdoc.toml");

    Config::generate_default_config("toml", &path).unwrap();
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.output_dir, PathBuf::from("gen"));

    assert!(Config::generate_default_config("ini", &path).is_err());
  }
}
