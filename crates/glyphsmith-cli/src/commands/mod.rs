//! CLI command implementations

pub mod build;
pub mod list;

use std::path::Path;

use anyhow::{Context, Result};
use glyphsmith_core::BuildOptions;

/// Options from the config file, if one was given
pub fn load_options(config_path: Option<&Path>) -> Result<BuildOptions> {
    match config_path {
        Some(path) => {
            tracing::debug!("Loading build options from {}", path.display());
            BuildOptions::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Ok(BuildOptions::default()),
    }
}
