//! Expose incdoc's internal API for use in integration tests. The binary is
//! the supported interface.
pub mod cli;
pub mod error;
pub mod pandoc;
pub mod site;
pub mod utils;

pub use incdoc_config as config;
pub use incdoc_filter as filter;
