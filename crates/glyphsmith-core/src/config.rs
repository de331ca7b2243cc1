//! Build configuration
//!
//! Options arrive in layers (YAML file, then command-line flags) as
//! [`BuildOptions`]; [`BuildOptions::resolve`] validates the merged result
//! into a [`BuildConfig`] without touching the filesystem.
//!
//! # Configuration file
//!
//! ```yaml
//! input: ./icons
//! output_dir: ./dist
//! font_name: My Icons
//! prefix: mi-
//! base_class: mi
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::artifacts::ArtifactPaths;
use crate::error::{Error, Result};
use crate::escape;

/// Design grid height used when none is configured
pub const DEFAULT_FONT_HEIGHT: u16 = 5000;

/// Unresolved build options; every field is optional so layers can merge
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildOptions {
    /// Directory containing the icon files
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Directory receiving all artifacts
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Font family name
    #[serde(default)]
    pub font_name: Option<String>,

    /// Output file name without extension
    #[serde(default)]
    pub file_stem: Option<String>,

    /// Prefix prepended to every icon class
    #[serde(default)]
    pub prefix: Option<String>,

    /// Class shared by every icon
    #[serde(default)]
    pub base_class: Option<String>,

    /// Height of the glyph design grid in font units
    #[serde(default)]
    pub font_height: Option<u16>,
}

impl BuildOptions {
    /// Load options from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: BuildOptions) -> Self {
        Self {
            input: other.input.or(self.input),
            output_dir: other.output_dir.or(self.output_dir),
            font_name: other.font_name.or(self.font_name),
            file_stem: other.file_stem.or(self.file_stem),
            prefix: other.prefix.or(self.prefix),
            base_class: other.base_class.or(self.base_class),
            font_height: other.font_height.or(self.font_height),
        }
    }

    /// Validate and fill in defaults
    pub fn resolve(self) -> Result<BuildConfig> {
        let input_dir = self
            .input
            .ok_or_else(|| Error::config("an input directory is required"))?;

        let prefix = self.prefix.unwrap_or_default();
        let base_class = self.base_class.filter(|b| !b.is_empty());
        if prefix.is_empty() && base_class.is_none() {
            return Err(Error::config(
                "either a class prefix, a base class, or both must be provided",
            ));
        }

        let font_name = match self.font_name.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => input_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::config(format!(
                        "cannot derive a font name from '{}'; set one explicitly",
                        input_dir.display()
                    ))
                })?,
        };

        let file_stem = match self.file_stem {
            Some(stem) => stem,
            None => escape::file_stem(&font_name),
        };
        if file_stem.is_empty() {
            return Err(Error::config(format!(
                "font name '{font_name}' does not yield a usable file name; set one explicitly"
            )));
        }

        let font_height = self.font_height.unwrap_or(DEFAULT_FONT_HEIGHT);
        if !(16..=16384).contains(&font_height) {
            return Err(Error::config(format!(
                "font height {font_height} is outside 16..=16384"
            )));
        }

        Ok(BuildConfig {
            input_dir,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            font_name,
            file_stem,
            prefix,
            base_class,
            font_height,
        })
    }
}

/// Resolved, validated run parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory containing the icon files
    pub input_dir: PathBuf,

    /// Directory receiving all artifacts
    pub output_dir: PathBuf,

    /// Font family name
    pub font_name: String,

    /// Output file name without extension
    pub file_stem: String,

    /// Prefix prepended to every icon class (may be empty)
    pub prefix: String,

    /// Class shared by every icon
    pub base_class: Option<String>,

    /// Height of the glyph design grid in font units
    pub font_height: u16,
}

impl BuildConfig {
    /// Paths of all artifacts this configuration produces
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.output_dir, &self.file_stem)
    }
}
