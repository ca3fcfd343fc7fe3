pub mod assets;
pub mod output;

pub use crate::utils::{assets::copy_asset_dirs, output::prepare_output_dir};
