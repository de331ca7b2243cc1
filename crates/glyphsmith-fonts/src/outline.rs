//! Glyph outline reading
//!
//! Turns one icon file into a single outline in the icon's own coordinate
//! space (y down, origin top-left), together with its viewport size. Scaling
//! into the font's design grid happens in the font stream.

use std::path::Path;

use async_trait::async_trait;
use kurbo::{Affine, BezPath, Point};
use usvg::tiny_skia_path::PathSegment;

use crate::error::{Error, Result};

/// One icon's outline in SVG user space
#[derive(Debug, Clone, Default)]
pub struct GlyphOutline {
    /// All subpaths of the icon, transforms applied
    pub path: BezPath,
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
}

impl GlyphOutline {
    /// True when the icon has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }
}

/// Source of glyph outlines
#[async_trait]
pub trait OutlineReader: Send + Sync {
    /// Read the outline stored in `path`
    async fn read(&self, path: &Path) -> Result<GlyphOutline>;
}

/// Reads SVG icons with `usvg`
///
/// Shapes, nested groups, transforms and the `viewBox` are resolved; all
/// paths are merged into one outline. Text and raster content is ignored.
#[derive(Default)]
pub struct SvgOutlineReader {
    options: usvg::Options<'static>,
}

impl SvgOutlineReader {
    /// Reader with default parsing options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse SVG source already in memory
    pub fn parse(&self, data: &[u8]) -> Result<GlyphOutline> {
        let tree = usvg::Tree::from_data(data, &self.options)?;
        let size = tree.size();

        let mut path = BezPath::new();
        collect_paths(tree.root(), &mut path);

        Ok(GlyphOutline {
            path,
            width: f64::from(size.width()),
            height: f64::from(size.height()),
        })
    }
}

#[async_trait]
impl OutlineReader for SvgOutlineReader {
    async fn read(&self, path: &Path) -> Result<GlyphOutline> {
        let glyph_error = |message: String| Error::GlyphRead {
            path: path.to_path_buf(),
            message,
        };

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| glyph_error(e.to_string()))?;
        self.parse(&data).map_err(|e| glyph_error(e.to_string()))
    }
}

fn collect_paths(group: &usvg::Group, out: &mut BezPath) {
    for node in group.children() {
        match node {
            usvg::Node::Group(child) => collect_paths(child, out),
            usvg::Node::Path(path) => {
                let ts = path.abs_transform();
                let affine = Affine::new([
                    f64::from(ts.sx),
                    f64::from(ts.ky),
                    f64::from(ts.kx),
                    f64::from(ts.sy),
                    f64::from(ts.tx),
                    f64::from(ts.ty),
                ]);
                append_segments(path.data().segments(), affine, out);
            }
            _ => {}
        }
    }
}

fn append_segments(
    segments: impl Iterator<Item = PathSegment>,
    affine: Affine,
    out: &mut BezPath,
) {
    let pt = |p: usvg::tiny_skia_path::Point| affine * Point::new(f64::from(p.x), f64::from(p.y));

    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => out.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => out.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => out.close_path(),
        }
    }
}
