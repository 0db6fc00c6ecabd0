//! Loading a [`SceneConfig`] from a RON file.

use procgen_core::scene::SceneConfig;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Parses a RON scene description. Missing fields take their defaults.
pub fn parse_config(text: &str) -> Result<SceneConfig, ConfigError> {
    Ok(ron::from_str(text)?)
}

pub fn load_config(path: &Path) -> Result<SceneConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}
