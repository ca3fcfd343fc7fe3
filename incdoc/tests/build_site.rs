#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{
  cell::RefCell,
  fs,
  io,
  path::{Path, PathBuf},
};

use incdoc::{
  config::Config,
  error::{BuildError, EXIT_CONFIG, EXIT_TRANSFORMER, exit_code_for},
  filter::Document,
  pandoc::Transformer,
  site::build_site,
};
use serde_json::Value;
use tempfile::{TempDir, tempdir};

/// Stands in for pandoc: sources already hold a JSON document, and rendering
/// writes the filtered JSON to the output path.
#[derive(Default)]
struct JsonTransformer {
  rendered: RefCell<Vec<PathBuf>>,
}

impl Transformer for JsonTransformer {
  fn parse(&self, source: &Path) -> Result<Document, BuildError> {
    let json = fs::read_to_string(source)?;
    Document::from_json(&json).map_err(|e| {
      BuildError::Document {
        path:   source.to_path_buf(),
        source: e,
      }
    })
  }

  fn render(
    &self,
    document: &Document,
    _source: &Path,
    output: &Path,
  ) -> Result<(), BuildError> {
    let json = document.to_json().map_err(|e| {
      BuildError::Document {
        path:   output.to_path_buf(),
        source: e,
      }
    })?;
    fs::write(output, json)?;
    self.rendered.borrow_mut().push(output.to_path_buf());
    Ok(())
  }
}

/// Behaves as if the pandoc executable were missing.
struct MissingPandoc;

impl Transformer for MissingPandoc {
  fn parse(&self, _source: &Path) -> Result<Document, BuildError> {
    Err(BuildError::Spawn {
      program: PathBuf::from("pandoc"),
      source:  io::Error::from(io::ErrorKind::NotFound),
    })
  }

  fn render(&self, _: &Document, _: &Path, _: &Path) -> Result<(), BuildError> {
    Ok(())
  }
}

fn python_block(include: &str) -> String {
  format!(
    r#"{{"pandoc-api-version":[1,23,1],"meta":{{}},"blocks":[{{"t":"CodeBlock","c":[["",["python"],[["include","{include}"]]],"PLACEHOLDER"]}}]}}"#
  )
}

fn rendered_text(path: &Path) -> Value {
  let json = fs::read_to_string(path).expect("Failed to read rendered page");
  let document = Document::from_json(&json).expect("rendered page is JSON");
  document.blocks[0]["c"][1].clone()
}

/// Project layout: `examples/foo.py`, `index.md`, `styles/site.css`.
fn project() -> (TempDir, Config) {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let root = temp_dir.path();

  fs::create_dir_all(root.join("examples")).expect("Failed to create dir in test");
  fs::write(root.join("examples/foo.py"), "print(1)")
    .expect("Failed to write foo.py in test");
  fs::write(root.join("index.md"), python_block("foo.py"))
    .expect("Failed to write index.md in test");
  fs::create_dir_all(root.join("styles")).expect("Failed to create dir in test");
  fs::write(root.join("styles/site.css"), "body {}")
    .expect("Failed to write css in test");

  let config = Config {
    sources: vec![root.join("index.md")],
    output_dir: root.join("gen"),
    include_dirs: vec![root.join("examples/pylint"), root.join("examples")],
    asset_dirs: vec![root.join("styles")],
    ..Config::default()
  };

  (temp_dir, config)
}

#[test]
fn test_include_is_substituted_end_to_end() {
  let (_temp_dir, config) = project();
  let transformer = JsonTransformer::default();

  let summary = build_site(&config, &transformer).expect("build should succeed");

  let page = config.output_dir.join("index.html");
  assert_eq!(summary.pages, vec![page.clone()]);
  assert_eq!(summary.missing_includes, 0);
  assert_eq!(rendered_text(&page), Value::String("print(1)".to_owned()));
  assert!(config.output_dir.join("styles/site.css").is_file());
}

#[test]
fn test_missing_include_keeps_placeholder() {
  let (temp_dir, mut config) = project();
  let source = temp_dir.path().join("missing.md");
  fs::write(&source, python_block("missing.py"))
    .expect("Failed to write missing.md in test");
  config.sources = vec![source];

  let summary = build_site(&config, &JsonTransformer::default())
    .expect("a missing include does not fail the build");

  assert_eq!(summary.missing_includes, 1);
  assert_eq!(
    rendered_text(&config.output_dir.join("missing.html")),
    Value::String("PLACEHOLDER".to_owned())
  );
}

#[test]
fn test_output_collision_aborts_before_work() {
  let (_temp_dir, config) = project();
  fs::write(&config.output_dir, "I am a file")
    .expect("Failed to write colliding file in test");
  let transformer = JsonTransformer::default();

  let report = build_site(&config, &transformer).expect_err("collision must fail");

  assert!(report.to_string().contains("is not a directory"));
  assert_eq!(exit_code_for(&report), EXIT_CONFIG);
  assert!(transformer.rendered.borrow().is_empty());
  assert!(config.output_dir.is_file());
}

#[test]
fn test_transformer_failure_skips_assets() {
  let (_temp_dir, config) = project();

  let report = build_site(&config, &MissingPandoc).expect_err("build must fail");

  assert_eq!(exit_code_for(&report), EXIT_TRANSFORMER);
  assert!(!config.output_dir.join("styles").exists());
}

#[test]
fn test_pages_are_built_in_source_order() {
  let (temp_dir, mut config) = project();
  let guide = temp_dir.path().join("guide.md");
  fs::write(&guide, python_block("foo.py")).expect("Failed to write guide.md in test");
  config.sources.push(guide);
  let transformer = JsonTransformer::default();

  let summary = build_site(&config, &transformer).expect("build should succeed");

  assert_eq!(summary.pages, vec![
    config.output_dir.join("index.html"),
    config.output_dir.join("guide.html")
  ]);
  assert_eq!(*transformer.rendered.borrow(), summary.pages);
}
