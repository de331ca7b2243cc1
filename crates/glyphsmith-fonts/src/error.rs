//! Error types for font assembly and transcoding

use std::path::PathBuf;

use glyphsmith_core::BuildReport;
use thiserror::Error;

/// Result type for font operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling or transcoding fonts
#[derive(Error, Debug)]
pub enum Error {
    /// An icon file is unreadable or malformed
    #[error("cannot read glyph from {}: {message}", path.display())]
    GlyphRead {
        /// Icon source file
        path: PathBuf,
        /// Error description
        message: String,
    },

    /// Failed to parse SVG input
    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),

    /// The SVG font document is malformed
    #[error("invalid SVG font: {0}")]
    SvgFont(String),

    /// A TrueType font could not be read
    #[error("malformed sfnt: {0}")]
    Sfnt(String),

    /// A transcoder rejected its input
    #[error("{format} transcoding failed: {message}")]
    Transcode {
        /// Target format
        format: String,
        /// Error description
        message: String,
    },

    /// The font stream's writer stopped before the glyph could be queued
    #[error("font stream closed before all glyphs were written")]
    SinkClosed,

    /// XML read error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core library
    #[error(transparent)]
    Core(#[from] glyphsmith_core::Error),

    /// One or more build stages failed
    #[error("build failed: {0}")]
    Build(BuildReport),
}

impl Error {
    /// Shorthand for a transcoding error
    pub fn transcode(format: impl ToString, message: impl Into<String>) -> Self {
        Self::Transcode {
            format: format.to_string(),
            message: message.into(),
        }
    }
}
