//! Typed views over pandoc's JSON AST.
//!
//! Only the parts of the tree the filter touches are typed. Everything else
//! stays a [`serde_json::Value`] so that documents round-trip unchanged.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FilterError;

/// Tag pandoc uses for fenced and indented code blocks.
pub const CODE_BLOCK: &str = "CodeBlock";

/// A complete document as produced by `pandoc --to json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  #[serde(rename = "pandoc-api-version")]
  pub api_version: Vec<u32>,
  pub meta:        Value,
  pub blocks:      Vec<Value>,

  /// Fields this crate does not interpret.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Document {
  /// Parse a document from pandoc's JSON encoding.
  ///
  /// # Errors
  ///
  /// Returns an error if the input is not a pandoc JSON document.
  pub fn from_json(input: &str) -> Result<Self, FilterError> {
    Ok(serde_json::from_str(input)?)
  }

  /// Serialize the document back to pandoc's JSON encoding.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn to_json(&self) -> Result<String, FilterError> {
    Ok(serde_json::to_string(self)?)
  }
}

type AttrRepr = (String, Vec<String>, Vec<(String, String)>);

/// Identifier, classes and key/value pairs attached to a block.
///
/// Encoded by pandoc as `[identifier, [classes], [[key, value], ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "AttrRepr", into = "AttrRepr")]
pub struct Attr {
  pub identifier: String,
  /// Class labels, conventionally the source language first.
  pub classes:    Vec<String>,
  pub attributes: Vec<(String, String)>,
}

impl Attr {
  /// Value of the first attribute named `key`.
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }
}

impl From<AttrRepr> for Attr {
  fn from((identifier, classes, attributes): AttrRepr) -> Self {
    Self {
      identifier,
      classes,
      attributes,
    }
  }
}

impl From<Attr> for AttrRepr {
  fn from(attr: Attr) -> Self {
    (attr.identifier, attr.classes, attr.attributes)
  }
}

/// Content of a `CodeBlock` element: `[attr, text]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(Attr, String)", into = "(Attr, String)")]
pub struct CodeBlock {
  pub attr: Attr,
  pub text: String,
}

impl CodeBlock {
  /// A copy of this block with its text replaced.
  #[must_use]
  pub fn with_text(&self, text: impl Into<String>) -> Self {
    Self {
      attr: self.attr.clone(),
      text: text.into(),
    }
  }
}

impl From<(Attr, String)> for CodeBlock {
  fn from((attr, text): (Attr, String)) -> Self {
    Self { attr, text }
  }
}

impl From<CodeBlock> for (Attr, String) {
  fn from(block: CodeBlock) -> Self {
    (block.attr, block.text)
  }
}

/// A single element of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  CodeBlock(CodeBlock),

  /// Any element the filter does not need to understand.
  Other {
    tag:     String,
    content: Option<Value>,
  },
}

impl Node {
  /// Decode an element from its tag and its (possibly absent) `c` payload.
  ///
  /// # Errors
  ///
  /// Returns [`FilterError::Malformed`] if a `CodeBlock` payload does not
  /// have the `[[id, classes, attributes], text]` shape.
  pub fn decode(tag: &str, content: Option<&Value>) -> Result<Self, FilterError> {
    if tag != CODE_BLOCK {
      return Ok(Self::Other {
        tag:     tag.to_owned(),
        content: content.cloned(),
      });
    }

    let content = content.ok_or_else(|| {
      FilterError::Malformed {
        tag:    tag.to_owned(),
        reason: "missing content".to_owned(),
      }
    })?;

    serde_json::from_value(content.clone())
      .map(Self::CodeBlock)
      .map_err(|e| {
        FilterError::Malformed {
          tag:    tag.to_owned(),
          reason: e.to_string(),
        }
      })
  }

  /// The element's tag, e.g. `"CodeBlock"` or `"Para"`.
  #[must_use]
  pub fn tag(&self) -> &str {
    match self {
      Self::CodeBlock(_) => CODE_BLOCK,
      Self::Other { tag, .. } => tag,
    }
  }

  /// Encode the element as a `{"t": ..., "c": ...}` object.
  ///
  /// # Errors
  ///
  /// Returns an error if the payload cannot be serialized.
  pub fn into_value(self) -> Result<Value, FilterError> {
    let mut object = Map::new();
    object.insert("t".to_owned(), Value::String(self.tag().to_owned()));

    let content = match self {
      Self::CodeBlock(block) => Some(serde_json::to_value(block)?),
      Self::Other { content, .. } => content,
    };
    if let Some(content) = content {
      object.insert("c".to_owned(), content);
    }

    Ok(Value::Object(object))
  }
}
