use thiserror::Error;

/// Error type for incdoc-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Invalid override for '{key}': {reason}")]
  Override { key: String, reason: String },

  #[error("Configuration path validation errors:\n{}", .0.join("\n"))]
  Validation(Vec<String>),

  #[error("Template error: {0}")]
  Template(String),
}
