//! Icon discovery
//!
//! Recursively enumerates the input directory and derives each icon's name
//! from its path relative to the root: `weather/rain.svg` → `weather-rain`.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Character joining nested directory names
pub const NAME_SEPARATOR: char = '-';

/// An icon file found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredIcon {
    /// Absolute path of the icon file
    pub path: PathBuf,
    /// Icon name derived from the relative path
    pub name: String,
}

/// Enumerate every regular file beneath `root` (symlinks followed).
///
/// The walk runs on the blocking pool. The returned order is unspecified;
/// see [`crate::icon::IconSet::allocate`] for ordering.
pub async fn discover(root: impl AsRef<Path>) -> Result<Vec<DiscoveredIcon>> {
    let root = root.as_ref();

    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| discovery_error(root, e))?;
    if !metadata.is_dir() {
        return Err(Error::Discovery {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|e| discovery_error(root, e))?;

    let walk_root = root.clone();
    let icons = tokio::task::spawn_blocking(move || walk(&walk_root))
        .await
        .map_err(|e| Error::Discovery {
            path: root.clone(),
            message: format!("directory walk aborted: {e}"),
        })??;

    tracing::debug!("Discovered {} icon files in {}", icons.len(), root.display());
    Ok(icons)
}

fn walk(root: &Path) -> Result<Vec<DiscoveredIcon>> {
    let mut icons = Vec::new();

    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| Error::Discovery {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let relative = path.strip_prefix(root).map_err(|e| Error::Discovery {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let name = icon_name(relative);
        icons.push(DiscoveredIcon { path, name });
    }

    Ok(icons)
}

/// Derive an icon name from a path relative to the input root.
///
/// The extension of the final component is dropped and the remaining
/// components are joined with [`NAME_SEPARATOR`]. Case is preserved.
pub fn icon_name(relative: &Path) -> String {
    let stripped = relative.with_extension("");
    let parts: Vec<String> = stripped
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join(&NAME_SEPARATOR.to_string())
}

fn discovery_error(path: &Path, err: std::io::Error) -> Error {
    Error::Discovery {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
