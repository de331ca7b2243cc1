//! Format transcoding chain
//!
//! The SVG font is first converted to TrueType. Every web-font variant is
//! then derived from the TrueType bytes alone, so the variant stages run
//! concurrently and finish in any order.
//!
//! ```text
//!                        ┌──▶ WOFF
//! SVG font ──▶ TrueType ─┼──▶ WOFF2
//!                        └──▶ EOT
//! ```

mod eot;
mod ttf;
mod woff;
mod woff2;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use glyphsmith_core::{ArtifactPaths, BuildReport, FontArtifact, FontFormat, Stage};

use crate::error::{Error, Result};

pub use eot::TtfToEot;
pub use ttf::SvgFontToTtf;
pub use woff::TtfToWoff;
pub use woff2::TtfToWoff2;

/// A whole-file binary conversion into one font format
pub trait Transcoder: Send + Sync {
    /// Format this transcoder produces
    fn format(&self) -> FontFormat;

    /// Convert `input` into [`Transcoder::format`]
    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Run a transcoder on the blocking pool
pub async fn run_transcoder(
    transcoder: Arc<dyn Transcoder>,
    input: Arc<[u8]>,
) -> Result<FontArtifact> {
    let format = transcoder.format();
    let bytes = tokio::task::spawn_blocking(move || transcoder.transcode(&input))
        .await
        .map_err(|e| Error::transcode(format, e.to_string()))??;
    Ok(FontArtifact::new(format, bytes))
}

/// SVG font → TrueType → web-font variants
#[derive(Clone)]
pub struct TranscodeChain {
    outline: Arc<dyn Transcoder>,
    variants: Vec<Arc<dyn Transcoder>>,
}

impl Default for TranscodeChain {
    fn default() -> Self {
        Self {
            outline: Arc::new(SvgFontToTtf),
            variants: vec![
                Arc::new(TtfToWoff),
                Arc::new(TtfToWoff2),
                Arc::new(TtfToEot),
            ],
        }
    }
}

impl TranscodeChain {
    /// The standard TTF, WOFF, WOFF2 and EOT chain
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain with custom stages
    pub fn with_stages(outline: Arc<dyn Transcoder>, variants: Vec<Arc<dyn Transcoder>>) -> Self {
        Self { outline, variants }
    }

    /// Formats this chain writes, in stage order
    pub fn formats(&self) -> Vec<FontFormat> {
        std::iter::once(self.outline.format())
            .chain(self.variants.iter().map(|t| t.format()))
            .collect()
    }

    /// Transcode the finished SVG font at `svg_path` and write every
    /// derived font next to it.
    ///
    /// A failing variant does not affect its siblings. When the outline
    /// stage fails no variant runs.
    pub async fn run(&self, svg_path: &Path, paths: &ArtifactPaths) -> BuildReport {
        let mut report = BuildReport::default();
        let outline_stage = Stage::Font(self.outline.format());

        let svg = match tokio::fs::read(svg_path).await {
            Ok(svg) => svg,
            Err(e) => {
                report.record_failure(
                    outline_stage,
                    format!("cannot read {}: {}", svg_path.display(), e),
                );
                return report;
            }
        };

        let outline = match run_transcoder(Arc::clone(&self.outline), svg.into()).await {
            Ok(artifact) => artifact,
            Err(e) => {
                report.record_failure(outline_stage, e.to_string());
                return report;
            }
        };
        match write_artifact(&outline, paths).await {
            Ok(path) => report.record_written(outline_stage, path),
            Err(e) => {
                report.record_failure(outline_stage, e.to_string());
                return report;
            }
        }

        let input: Arc<[u8]> = outline.bytes.into();
        let mut pending: FuturesUnordered<_> = self
            .variants
            .iter()
            .map(|transcoder| {
                let transcoder = Arc::clone(transcoder);
                let input = Arc::clone(&input);
                async move {
                    let stage = Stage::Font(transcoder.format());
                    let result = match run_transcoder(transcoder, input).await {
                        Ok(artifact) => write_artifact(&artifact, paths).await,
                        Err(e) => Err(e),
                    };
                    (stage, result)
                }
            })
            .collect();

        while let Some((stage, result)) = pending.next().await {
            match result {
                Ok(path) => report.record_written(stage, path),
                Err(e) => report.record_failure(stage, e.to_string()),
            }
        }
        report
    }
}

async fn write_artifact(artifact: &FontArtifact, paths: &ArtifactPaths) -> Result<PathBuf> {
    let path = paths.font(artifact.format);
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .map_err(|source| glyphsmith_core::Error::ArtifactWrite {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(
        "{} font is {} bytes",
        artifact.extension().to_uppercase(),
        artifact.bytes.len()
    );
    Ok(path)
}
