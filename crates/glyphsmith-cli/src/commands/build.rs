//! Build every artifact for an icon directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glyphsmith_core::BuildOptions;
use glyphsmith_fonts::{Build, Error};

use crate::ClassArgs;

/// Command line values for `build`; unset values fall back to the config
/// file, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub font_name: Option<String>,
    pub file_name: Option<String>,
    pub font_height: Option<u16>,
    pub classes: ClassArgs,
}

impl BuildArgs {
    fn into_options(self) -> BuildOptions {
        BuildOptions {
            input: self.input,
            output_dir: self.output,
            font_name: self.font_name,
            file_stem: self.file_name,
            prefix: self.classes.prefix,
            base_class: self.classes.base_class,
            font_height: self.font_height,
        }
    }
}

/// Run the build command
pub async fn run(config_path: Option<&Path>, args: BuildArgs) -> Result<()> {
    let options = super::load_options(config_path)?.merge(args.into_options());
    let build = Build::from_options(options).context("Invalid build options")?;

    let config = build.config();
    tracing::info!(
        "Building '{}' from {} into {}",
        config.font_name,
        config.input_dir.display(),
        config.output_dir.display()
    );

    match build.run().await {
        Ok(report) => {
            tracing::info!("✓ {}", report);
            Ok(())
        }
        Err(Error::Build(report)) => {
            anyhow::bail!("Build failed: {}", report)
        }
        Err(e) => Err(e).context("Build failed"),
    }
}
