//! Output artifact naming
//!
//! Every artifact lives in the output directory as `<stem>.<ext>`.

use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Font file formats produced by a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    /// SVG font document
    Svg,
    /// TrueType outline font
    Ttf,
    /// WOFF 1.0
    Woff,
    /// WOFF 2.0
    Woff2,
    /// Embedded OpenType
    Eot,
}

impl FontFormat {
    /// All formats, in production order
    pub const ALL: [FontFormat; 5] = [
        FontFormat::Svg,
        FontFormat::Ttf,
        FontFormat::Woff,
        FontFormat::Woff2,
        FontFormat::Eot,
    ];

    /// File extension (without dot)
    pub fn extension(self) -> &'static str {
        match self {
            FontFormat::Svg => "svg",
            FontFormat::Ttf => "ttf",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
            FontFormat::Eot => "eot",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One stage's binary output, handed to the next stage or written to disk
#[derive(Debug, Clone)]
pub struct FontArtifact {
    /// Format of `bytes`
    pub format: FontFormat,
    /// Encoded font data
    pub bytes: Vec<u8>,
}

impl FontArtifact {
    /// Wrap encoded bytes
    pub fn new(format: FontFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Target file extension
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// Paths of every file a build writes
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    output_dir: PathBuf,
    stem: String,
}

impl ArtifactPaths {
    /// Paths for `<output_dir>/<stem>.*`
    pub fn new(output_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: stem.into(),
        }
    }

    /// Directory holding all artifacts
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Shared file stem
    pub fn stem(&self) -> &str {
        &self.stem
    }

    fn with_extension(&self, ext: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", self.stem, ext))
    }

    /// Path of a font file
    pub fn font(&self, format: FontFormat) -> PathBuf {
        self.with_extension(format.extension())
    }

    /// Style sheet path
    pub fn css(&self) -> PathBuf {
        self.with_extension("css")
    }

    /// Preview page path
    pub fn html(&self) -> PathBuf {
        self.with_extension("html")
    }

    /// Name map path
    pub fn name_map(&self) -> PathBuf {
        self.with_extension("js")
    }
}

/// Path of `target` relative to directory `base`, joined with `/` for use
/// in URLs.
///
/// Falls back to `target` itself when the two share no common root.
pub fn relative_path(base: &Path, target: &Path) -> String {
    let relative = pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf());
    let parts: Vec<_> = relative
        .components()
        .map(|component| match component {
            Component::RootDir => Cow::Borrowed(""),
            other => other.as_os_str().to_string_lossy(),
        })
        .collect();
    parts.join("/")
}
