//! CLI command implementations.

pub mod references;
pub mod run;

use std::path::PathBuf;

use rollcall::RollcallConfig;

/// Load the config file if one was given, else the defaults.
pub(crate) fn load_config(path: Option<&PathBuf>) -> rollcall::Result<RollcallConfig> {
    match path {
        Some(path) => RollcallConfig::load(path),
        None => Ok(RollcallConfig::default()),
    }
}
