//! Show the code point plan for an icon directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glyphsmith_core::{BuildOptions, IconSet};
use glyphsmith_fonts::Build;

use crate::ClassArgs;

/// Run the list command
pub async fn run(config_path: Option<&Path>, input: Option<PathBuf>, classes: ClassArgs) -> Result<()> {
    let overrides = BuildOptions {
        input,
        prefix: classes.prefix,
        base_class: classes.base_class,
        ..Default::default()
    };
    let options = super::load_options(config_path)?.merge(overrides);
    let build = Build::from_options(options).context("Invalid build options")?;

    let icons = build.plan().await.context("Failed to plan icon set")?;
    print!("{}", format_plan(&icons));
    tracing::debug!("{} icon(s) listed", icons.len());
    Ok(())
}

/// One `U+XXXX  name  classes` line per icon
fn format_plan(icons: &IconSet) -> String {
    let width = icons.iter().map(|e| e.name.len()).max().unwrap_or(0);
    icons
        .iter()
        .map(|entry| {
            format!(
                "U+{:04X}  {:<width$}  {}\n",
                entry.code_point as u32,
                entry.name,
                entry.html_class,
                width = width
            )
        })
        .collect()
}
