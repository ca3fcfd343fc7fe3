use thiserror::Error;

/// Error type for config template lookups.
#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),
}

/// Default configuration in TOML, commented so that a fresh `incdoc init`
/// explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# incdoc configuration file

# Markdown sources; each one becomes <name>.html in the output directory
sources = ["index.md"]

# Output directory. The build refuses to run if this exists as a file.
output_dir = "gen"

# Pandoc template used for standalone output
# template = "pyta_template.html"

# Pandoc syntax highlighting style
highlight_style = "zenburn"

# Render complete HTML pages instead of fragments
standalone = true

# Directories searched, in order, for files named by include="..." code
# blocks. List the directory holding the most examples first.
include_dirs = ["../pyta/examples/pylint", "../pyta/examples"]

# Directories copied verbatim into the output directory
asset_dirs = ["images", "scripts", "styles"]

# Pandoc executable and extra arguments
pandoc = "pandoc"
# pandoc_args = ["--toc"]

# Template variables passed with -V
[variables]
root = "../"
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "sources": ["index.md"],
  "output_dir": "gen",
  "highlight_style": "zenburn",
  "standalone": true,
  "include_dirs": ["../pyta/examples/pylint", "../pyta/examples"],
  "asset_dirs": ["images", "scripts", "styles"],
  "pandoc": "pandoc",
  "pandoc_args": [],
  "variables": {
    "root": "../"
  }
}
"#;

/// Get the configuration template for the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;
  use crate::Config;

  #[test]
  fn templates_parse_to_the_same_config() {
    let from_toml: Config = toml::from_str(DEFAULT_TOML_TEMPLATE).unwrap();
    let from_json: Config = serde_json::from_str(DEFAULT_JSON_TEMPLATE).unwrap();

    assert_eq!(from_toml, from_json);
    assert_eq!(from_toml.include_dirs.len(), 2);
    assert_eq!(from_toml.variables.get("root").map(String::as_str), Some("../"));
  }

  #[test]
  fn unknown_format_is_rejected() {
    assert!(get_template("TOML").is_ok());
    assert!(matches!(
      get_template("yaml"),
      Err(TemplateError::UnsupportedFormat(_))
    ));
  }
}
