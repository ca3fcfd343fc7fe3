//! Tree walking in the style of pandoc's JSON filters.
use std::io::{Read, Write};

use serde_json::Value;

use crate::{ast::Document, error::FilterError};

/// What a [`Filter`] puts in place of the element it was offered.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
  Node(Value),
  /// Spliced into the surrounding list in place of the original element.
  Nodes(Vec<Value>),
}

/// A per-element rewrite hook.
///
/// The walker calls [`Filter::apply`] once for every element (`{"t": ...}`
/// object) found inside a list, in document order. Returning [`None`] keeps
/// the element and descends into it.
pub trait Filter {
  fn apply(
    &mut self,
    tag: &str,
    content: Option<&Value>,
    format: &str,
    meta: &Value,
  ) -> Option<Replacement>;
}

impl<F> Filter for F
where
  F: FnMut(&str, Option<&Value>, &str, &Value) -> Option<Replacement>,
{
  fn apply(
    &mut self,
    tag: &str,
    content: Option<&Value>,
    format: &str,
    meta: &Value,
  ) -> Option<Replacement> {
    self(tag, content, format, meta)
  }
}

fn element_tag(value: &Value) -> Option<&str> {
  value.as_object()?.get("t")?.as_str()
}

/// Walk `value`, offering every element in every list to `filter`.
///
/// A replacement is not offered to the filter again; only its children are
/// walked.
pub fn walk<F: Filter + ?Sized>(
  value: Value,
  filter: &mut F,
  format: &str,
  meta: &Value,
) -> Value {
  match value {
    Value::Array(items) => {
      let mut walked = Vec::with_capacity(items.len());
      for item in items {
        let replacement = element_tag(&item)
          .and_then(|tag| filter.apply(tag, item.get("c"), format, meta));

        match replacement {
          None => walked.push(walk(item, filter, format, meta)),
          Some(Replacement::Node(node)) => {
            walked.push(walk(node, filter, format, meta));
          },
          Some(Replacement::Nodes(nodes)) => {
            for node in nodes {
              walked.push(walk(node, filter, format, meta));
            }
          },
        }
      }
      Value::Array(walked)
    },
    Value::Object(object) => {
      Value::Object(
        object
          .into_iter()
          .map(|(key, child)| (key, walk(child, filter, format, meta)))
          .collect(),
      )
    },
    scalar => scalar,
  }
}

/// Run `filter` over a whole document.
///
/// Metadata is walked before the blocks. The filter always sees the
/// metadata as it was before the walk started.
pub fn apply_filter<F: Filter + ?Sized>(
  document: Document,
  filter: &mut F,
  format: &str,
) -> Document {
  let Document {
    api_version,
    meta,
    blocks,
    extra,
  } = document;
  let snapshot = meta.clone();

  let meta = walk(meta, filter, format, &snapshot);
  let blocks = match walk(Value::Array(blocks), filter, format, &snapshot) {
    Value::Array(blocks) => blocks,
    other => vec![other],
  };

  Document {
    api_version,
    meta,
    blocks,
    extra,
  }
}

/// Read a JSON document from `reader`, filter it, and write it to `writer`.
///
/// This is the stdin/stdout protocol `pandoc --filter` speaks.
///
/// # Errors
///
/// Returns an error if the input is not a pandoc JSON document or the output
/// cannot be written.
pub fn run_filter<R, W, F>(
  reader: R,
  mut writer: W,
  filter: &mut F,
  format: &str,
) -> Result<(), FilterError>
where
  R: Read,
  W: Write,
  F: Filter + ?Sized,
{
  let document: Document = serde_json::from_reader(reader)?;
  let document = apply_filter(document, filter, format);
  serde_json::to_writer(&mut writer, &document)?;
  writer.flush()?;
  Ok(())
}
