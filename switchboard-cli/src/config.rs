//! Configuration file loading
//!
//! The CLI accepts the library's [`BridgeConfig`] as a TOML file; every
//! field is optional and falls back to the reference defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use switchboard_core::BridgeConfig;

/// Load a bridge configuration from a TOML file
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: BridgeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
