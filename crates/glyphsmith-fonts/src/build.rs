//! Build orchestration
//!
//! A build runs in two phases:
//!
//! 1. **Planning**: discovery, ordering, duplicate detection and code point
//!    allocation. Any error here is fatal and nothing is written.
//! 2. **Production**: the font job (outline reads → font stream →
//!    transcoding chain) and the three emitters run concurrently over the
//!    same immutable [`IconSet`]. Their failures are collected into one
//!    [`BuildReport`].

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use futures::future::join_all;
use glyphsmith_core::{
    ArtifactPaths, BuildConfig, BuildOptions, BuildReport, CodePointAllocator, Collation, Emitter,
    FontFormat, IconSet, NaturalCollation, Stage, discover,
};

use crate::error::{Error, Result};
use crate::outline::{OutlineReader, SvgOutlineReader};
use crate::sink::{FontSink, Glyph, SinkOptions, SinkSummary};
use crate::transcode::TranscodeChain;

/// Icon files read ahead of the font stream
const DEFAULT_READ_CONCURRENCY: usize = 16;

/// One configured run of the pipeline
pub struct Build {
    config: BuildConfig,
    collation: Arc<dyn Collation>,
    reader: Arc<dyn OutlineReader>,
    chain: TranscodeChain,
    read_concurrency: usize,
}

impl Build {
    /// Build with natural collation, the SVG outline reader and the
    /// standard transcoding chain
    pub fn new(config: BuildConfig) -> Result<Self> {
        Ok(Self {
            config,
            collation: Arc::new(NaturalCollation::new()?),
            reader: Arc::new(SvgOutlineReader::new()),
            chain: TranscodeChain::new(),
            read_concurrency: DEFAULT_READ_CONCURRENCY,
        })
    }

    /// Validate `options` and create a build; fails before any IO
    pub fn from_options(options: BuildOptions) -> Result<Self> {
        Self::new(options.resolve()?)
    }

    /// Replace the ordering policy
    pub fn with_collation(mut self, collation: impl Collation + 'static) -> Self {
        self.collation = Arc::new(collation);
        self
    }

    /// Replace the outline reader
    pub fn with_reader(mut self, reader: impl OutlineReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    /// Replace the transcoding chain
    pub fn with_chain(mut self, chain: TranscodeChain) -> Self {
        self.chain = chain;
        self
    }

    /// Number of icon files read concurrently (at least one)
    pub fn with_read_concurrency(mut self, limit: usize) -> Self {
        self.read_concurrency = limit.max(1);
        self
    }

    /// The resolved configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Discover, order and allocate without writing anything
    pub async fn plan(&self) -> Result<IconSet> {
        let found = discover(&self.config.input_dir).await?;
        let icons = IconSet::allocate(
            found,
            &self.config,
            self.collation.as_ref(),
            CodePointAllocator::new(),
        )?;
        tracing::info!(
            "Found {} icon(s) in {}",
            icons.len(),
            self.config.input_dir.display()
        );
        Ok(icons)
    }

    /// Run the whole pipeline.
    ///
    /// Returns the report on success and [`Error::Build`] carrying the same
    /// report when any stage failed.
    pub async fn run(&self) -> Result<BuildReport> {
        let icons = self.plan().await?;
        let paths = self.config.artifact_paths();

        tokio::fs::create_dir_all(paths.output_dir())
            .await
            .map_err(|source| glyphsmith_core::Error::ArtifactWrite {
                path: paths.output_dir().to_path_buf(),
                source,
            })?;

        let (mut report, emitted) = tokio::join!(
            self.produce_fonts(&icons, &paths),
            self.emit_all(&icons)
        );
        report.extend(emitted);

        if report.is_success() {
            tracing::info!("Build complete: {}", report);
            Ok(report)
        } else {
            Err(Error::Build(report))
        }
    }

    fn sink_options(&self) -> SinkOptions {
        SinkOptions {
            font_height: self.config.font_height,
            ..SinkOptions::new(self.config.font_name.clone())
        }
    }

    async fn produce_fonts(&self, icons: &IconSet, paths: &ArtifactPaths) -> BuildReport {
        let mut report = BuildReport::default();
        let svg_path = paths.font(FontFormat::Svg);

        match self.assemble(icons, &svg_path).await {
            Ok(summary) => {
                report.record_written(Stage::Font(FontFormat::Svg), summary.path);
                report.extend(self.chain.run(&svg_path, paths).await);
            }
            Err(e) => report.record_failure(Stage::Font(FontFormat::Svg), e.to_string()),
        }
        report
    }

    /// Read every outline (bounded, order preserving) into the font stream
    async fn assemble(&self, icons: &IconSet, svg_path: &Path) -> Result<SinkSummary> {
        let sink = FontSink::create(svg_path, self.sink_options()).await?;

        let mut outlines = futures::stream::iter(icons.iter())
            .map(|entry| {
                let reader = Arc::clone(&self.reader);
                async move {
                    let outline = reader.read(&entry.source_path).await;
                    (entry, outline)
                }
            })
            .buffered(self.read_concurrency);

        while let Some((entry, outline)) = outlines.next().await {
            let queued = match outline {
                Ok(outline) => sink.submit(Glyph::new(entry, outline)).await,
                Err(e) => Err(e),
            };
            if let Err(e) = queued {
                let cause = sink.abort().await.unwrap_or(e);
                return Err(cause);
            }
        }

        sink.finish().await
    }

    async fn emit_all(&self, icons: &IconSet) -> BuildReport {
        let results = join_all(Emitter::ALL.map(|emitter| self.emit(emitter, icons))).await;

        let mut report = BuildReport::default();
        for (emitter, result) in Emitter::ALL.into_iter().zip(results) {
            match result {
                Ok(()) => report.record_written(emitter.stage(), emitter.path(&self.config)),
                Err(e) => report.record_failure(emitter.stage(), e.to_string()),
            }
        }
        report
    }

    async fn emit(&self, emitter: Emitter, icons: &IconSet) -> Result<()> {
        let text = emitter.render(icons, &self.config)?;
        let path = emitter.path(&self.config);
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| glyphsmith_core::Error::ArtifactWrite { path, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use glyphsmith_core::collation::BytewiseCollation;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M4 4H20V20H4Z"/></svg>"#;

    fn options(input: &Path, output: &Path) -> BuildOptions {
        BuildOptions {
            input: Some(input.to_path_buf()),
            output_dir: Some(output.to_path_buf()),
            font_name: Some("Unit".to_string()),
            prefix: Some("u-".to_string()),
            ..Default::default()
        }
    }

    fn icons(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), SVG).unwrap();
        }
    }

    /// Serves a fixed outline for every path, recording read order
    struct Recording {
        reads: std::sync::Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl OutlineReader for Recording {
        async fn read(&self, path: &Path) -> Result<crate::outline::GlyphOutline> {
            self.reads.lock().unwrap().push(path.to_path_buf());
            SvgOutlineReader::new().parse(SVG.as_bytes())
        }
    }

    #[test]
    fn test_from_options_validates_first() {
        let err = Build::from_options(BuildOptions {
            input: Some(PathBuf::from("/definitely/not/here")),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, Error::Core(glyphsmith_core::Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_plan_uses_configured_collation() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        icons(input.path(), &["b10.svg", "b2.svg"]);

        let build = Build::from_options(options(input.path(), output.path())).unwrap();
        let natural: Vec<String> = build.plan().await.unwrap().iter().map(|e| e.name.clone()).collect();
        assert_eq!(natural, ["b2", "b10"]);

        let build = build.with_collation(BytewiseCollation);
        let bytewise: Vec<String> = build.plan().await.unwrap().iter().map(|e| e.name.clone()).collect();
        assert_eq!(bytewise, ["b10", "b2"]);
    }

    #[tokio::test]
    async fn test_run_writes_every_artifact() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        icons(input.path(), &["home.svg", "star.svg"]);

        let build = Build::from_options(options(input.path(), &output.path().join("dist"))).unwrap();
        let report = build.run().await.unwrap();

        assert_eq!(report.written.len(), 8);
        let paths = build.config().artifact_paths();
        for format in FontFormat::ALL {
            assert!(paths.font(format).exists(), "missing {format}");
        }
        assert!(paths.css().exists());
        assert!(paths.html().exists());
        assert!(paths.name_map().exists());
    }

    #[tokio::test]
    async fn test_glyphs_fed_in_allocation_order() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        icons(input.path(), &["c.svg", "a.svg", "b.svg"]);

        let build = Build::from_options(options(input.path(), output.path()))
            .unwrap()
            .with_reader(Recording {
                reads: std::sync::Mutex::new(Vec::new()),
            })
            .with_read_concurrency(1);
        build.run().await.unwrap();

        let svg = std::fs::read_to_string(build.config().artifact_paths().font(FontFormat::Svg))
            .unwrap();
        let a = svg.find("glyph-name=\"a\" unicode=\"&#xF000;\"").unwrap();
        let b = svg.find("glyph-name=\"b\" unicode=\"&#xF001;\"").unwrap();
        let c = svg.find("glyph-name=\"c\" unicode=\"&#xF002;\"").unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_empty_input_builds_empty_font() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let build = Build::from_options(options(input.path(), output.path())).unwrap();
        let report = build.run().await.unwrap();
        assert!(report.is_success());

        let ttf = std::fs::read(build.config().artifact_paths().font(FontFormat::Ttf)).unwrap();
        let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
        assert_eq!(face.number_of_glyphs(), 1);
    }
}
