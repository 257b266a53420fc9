//! CLI subcommands.

pub mod cycle;
pub mod parse;
pub mod vendors;

use ledgermatch_core::models::EngineConfig;

/// Load configuration from `--config` or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EngineConfig> {
    match config_path {
        Some(path) => Ok(EngineConfig::from_file(std::path::Path::new(path))?),
        None => Ok(EngineConfig::default()),
    }
}
