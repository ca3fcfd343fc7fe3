//! # incdoc-filter
//!
//! A pandoc JSON filter that fills code block placeholders with the contents
//! of example files.
//!
//! A Markdown source marks a code block for substitution with an `include`
//! attribute:
//!
//! ````markdown
//! ~~~~ {.python include="unused_variable.py"}
//! ~~~~
//! ````
//!
//! The [`IncludeResolver`] searches its candidate directories in order and
//! replaces the block's text with the first matching file. Blocks whose file
//! cannot be found are left untouched and reported through a [`Reporter`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::io;
//!
//! use incdoc_filter::{IncludeResolver, run_filter};
//!
//! let mut resolver =
//!   IncludeResolver::new(["../pyta/examples/pylint", "../pyta/examples"]);
//! run_filter(io::stdin().lock(), io::stdout().lock(), &mut resolver, "html")
//!   .expect("filter failed");
//! ```
pub mod ast;
pub mod error;
pub mod include;
pub mod walk;

pub use crate::{
  ast::{Attr, CODE_BLOCK, CodeBlock, Document, Node},
  error::{FilterError, IncludeError},
  include::{FileSystem, IncludeResolver, IncludeSource, LogReporter, Reporter},
  walk::{Filter, Replacement, apply_filter, run_filter, walk},
};
