//! Glyphsmith Fonts
//!
//! Font production for Glyphsmith: reads icon outlines, streams them into
//! an SVG font, and derives TrueType, WOFF, WOFF2 and EOT fonts from it.
//! [`Build`] runs the full pipeline, including the web artifact emitters
//! from `glyphsmith-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use glyphsmith_core::BuildOptions;
//! use glyphsmith_fonts::Build;
//!
//! let options = BuildOptions {
//!     input: Some("./icons".into()),
//!     output_dir: Some("./dist".into()),
//!     prefix: Some("icon-".into()),
//!     ..Default::default()
//! };
//! let report = Build::from_options(options)?.run().await?;
//! println!("{report}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod build;
pub mod error;
pub mod outline;
pub mod sfnt;
pub mod sink;
pub mod svg_font;
pub mod transcode;

pub use build::Build;
pub use error::{Error, Result};
pub use outline::{GlyphOutline, OutlineReader, SvgOutlineReader};
pub use sink::{FontSink, Glyph, SinkOptions, SinkSummary};
pub use svg_font::{SvgFont, SvgGlyph};
pub use transcode::{
    SvgFontToTtf, TranscodeChain, Transcoder, TtfToEot, TtfToWoff, TtfToWoff2, run_transcoder,
};
