//! Font assembly stream
//!
//! A [`FontSink`] accepts glyphs in code point order and serializes them into
//! an SVG font document. Glyphs are queued on a bounded channel and written
//! by a single background task, so reading icons and writing the document
//! overlap. [`FontSink::finish`] resolves only after every queued glyph has
//! been flushed to disk.

use std::path::{Path, PathBuf};

use glyphsmith_core::IconEntry;
use glyphsmith_core::config::DEFAULT_FONT_HEIGHT;
use kurbo::{Affine, BezPath, PathEl, Point, Shape};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::outline::GlyphOutline;

const QUEUE_DEPTH: usize = 64;
const INDENT: usize = 2;

/// A glyph ready to be added to the font
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Glyph name, the icon name
    pub name: String,
    /// Code point the glyph is mapped to
    pub code_point: char,
    /// Outline in icon coordinates
    pub outline: GlyphOutline,
}

impl Glyph {
    /// Glyph for an allocated icon
    pub fn new(entry: &IconEntry, outline: GlyphOutline) -> Self {
        Self {
            name: entry.name.clone(),
            code_point: entry.code_point,
            outline,
        }
    }
}

/// How glyphs are laid out in the font
#[derive(Debug, Clone)]
pub struct SinkOptions {
    /// Font family name
    pub font_name: String,
    /// Design grid height (units per em)
    pub font_height: u16,
    /// Distance of the baseline above the bottom of the em box
    pub descent: u16,
    /// Scale every icon so its viewport height equals `font_height`
    pub normalize: bool,
    /// Give every glyph the widest advance
    pub fixed_width: bool,
    /// Center each outline within its advance
    pub center_horizontally: bool,
}

impl SinkOptions {
    /// Defaults for `font_name`: normalized, native widths, uncentered
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            font_height: DEFAULT_FONT_HEIGHT,
            descent: 0,
            normalize: true,
            fixed_width: false,
            center_horizontally: false,
        }
    }

    fn ascent(&self) -> f64 {
        f64::from(self.font_height) - f64::from(self.descent)
    }

    /// Map a glyph into font units: scaled, y axis flipped onto the baseline.
    fn place(&self, glyph: Glyph) -> PlacedGlyph {
        let outline = glyph.outline;
        let scale = if self.normalize && outline.height > 0.0 {
            f64::from(self.font_height) / outline.height
        } else {
            1.0
        };

        let transform = Affine::new([scale, 0.0, 0.0, -scale, 0.0, self.ascent()]);
        let mut path = outline.path;
        path.apply_affine(transform);

        PlacedGlyph {
            name: glyph.name,
            code_point: glyph.code_point,
            path,
            advance: (outline.width * scale).round().max(0.0) as u32,
        }
    }

    fn render(&self, xml: &mut Writer<Vec<u8>>, glyph: &PlacedGlyph, advance: u32) -> Result<()> {
        let mut path = glyph.path.clone();
        if self.center_horizontally && !path.elements().is_empty() {
            let bbox = path.bounding_box();
            let shift = f64::from(advance) / 2.0 - (bbox.x0 + bbox.x1) / 2.0;
            path.apply_affine(Affine::translate((shift, 0.0)));
        }

        // A character reference keeps Private Use Area code points readable.
        let unicode = format!("&#x{:X};", glyph.code_point as u32);
        let mut element = BytesStart::new("glyph");
        element.push_attribute(("glyph-name", glyph.name.as_str()));
        element.push_attribute((b"unicode".as_slice(), unicode.as_bytes()));
        element.push_attribute(("horiz-adv-x", advance.to_string().as_str()));
        let d = path_data(&path);
        if !d.is_empty() {
            element.push_attribute(("d", d.as_str()));
        }
        xml.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn header(&self, xml: &mut Writer<Vec<u8>>, default_advance: u32) -> Result<()> {
        xml.write_event(Event::Decl(BytesDecl::new("1.0", None, Some("no"))))?;
        xml.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
        xml.write_event(Event::Start(
            BytesStart::new("svg").with_attributes([("xmlns", SVG_NAMESPACE)]),
        ))?;
        xml.write_event(Event::Start(BytesStart::new("defs")))?;

        let advance = default_advance.to_string();
        xml.write_event(Event::Start(BytesStart::new("font").with_attributes([
            ("id", self.font_name.as_str()),
            ("horiz-adv-x", advance.as_str()),
        ])))?;

        let em = self.font_height.to_string();
        let ascent = self.ascent().to_string();
        let descent = (-i32::from(self.descent)).to_string();
        xml.write_event(Event::Empty(BytesStart::new("font-face").with_attributes([
            ("font-family", self.font_name.as_str()),
            ("units-per-em", em.as_str()),
            ("ascent", ascent.as_str()),
            ("descent", descent.as_str()),
        ])))?;
        xml.write_event(Event::Empty(
            BytesStart::new("missing-glyph").with_attributes([("horiz-adv-x", "0")]),
        ))?;
        Ok(())
    }
}

const DOCTYPE: &str =
    r#"svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd""#;
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

fn footer(xml: &mut Writer<Vec<u8>>) -> Result<()> {
    for name in ["font", "defs", "svg"] {
        xml.write_event(Event::End(BytesEnd::new(name)))?;
    }
    xml.get_mut().push(b'\n');
    Ok(())
}

struct PlacedGlyph {
    name: String,
    code_point: char,
    path: BezPath,
    advance: u32,
}

/// SVG path data with every point snapped to the integer grid
fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    let mut put = |cmd: char, points: &[Point]| {
        d.push(cmd);
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            d.push_str(&format!("{} {}", p.x.round() as i64, p.y.round() as i64));
        }
    };
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => put('M', &[p]),
            PathEl::LineTo(p) => put('L', &[p]),
            PathEl::QuadTo(c, p) => put('Q', &[c, p]),
            PathEl::CurveTo(c1, c2, p) => put('C', &[c1, c2, p]),
            PathEl::ClosePath => put('Z', &[]),
        }
    }
    d
}

/// Outcome of a completed font stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSummary {
    /// The written SVG font
    pub path: PathBuf,
    /// Number of glyphs written, excluding the missing glyph
    pub glyph_count: usize,
}

/// Ordered, asynchronously flushed SVG font writer
pub struct FontSink {
    path: PathBuf,
    queue: mpsc::Sender<Glyph>,
    writer: JoinHandle<Result<usize>>,
}

impl FontSink {
    /// Create (or truncate) `path` and start the writer task
    pub async fn create(path: impl Into<PathBuf>, options: SinkOptions) -> Result<Self> {
        let path = path.into();
        let file = tokio::fs::File::create(&path).await?;
        let (queue, glyphs) = mpsc::channel(QUEUE_DEPTH);

        tracing::debug!("Opened font stream {}", path.display());
        let writer = tokio::spawn(write_font(BufWriter::new(file), options, glyphs));

        Ok(Self {
            path,
            queue,
            writer,
        })
    }

    /// Destination of the stream
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue the next glyph.
    ///
    /// Fails with [`Error::SinkClosed`] when the writer has stopped; the
    /// writer's own error is returned by [`FontSink::finish`].
    pub async fn submit(&self, glyph: Glyph) -> Result<()> {
        self.queue.send(glyph).await.map_err(|_| Error::SinkClosed)
    }

    /// Close the queue and wait until every glyph is on disk.
    ///
    /// On failure the partial document is removed.
    pub async fn finish(self) -> Result<SinkSummary> {
        let Self {
            path,
            queue,
            writer,
        } = self;
        drop(queue);

        let outcome = match writer.await {
            Ok(result) => result,
            Err(e) => Err(Error::Io(std::io::Error::other(e))),
        };

        match outcome {
            Ok(glyph_count) => {
                tracing::debug!(
                    "Font stream {} complete with {} glyph(s)",
                    path.display(),
                    glyph_count
                );
                Ok(SinkSummary { path, glyph_count })
            }
            Err(e) => {
                remove_partial(&path).await;
                Err(e)
            }
        }
    }

    /// Stop the writer without completing the document and remove it.
    ///
    /// Returns the writer's error if it had already failed.
    pub async fn abort(self) -> Option<Error> {
        let Self {
            path,
            queue,
            writer,
        } = self;
        writer.abort();
        drop(queue);

        let failure = match writer.await {
            Ok(Err(e)) => Some(e),
            _ => None,
        };
        remove_partial(&path).await;
        failure
    }
}

async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!("Could not remove partial font {}: {}", path.display(), e);
    } else {
        tracing::debug!("Removed partial font {}", path.display());
    }
}

/// Move everything serialized so far onto the output
async fn drain<W>(xml: &mut Writer<Vec<u8>>, out: &mut BufWriter<W>) -> Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let pending = std::mem::take(xml.get_mut());
    out.write_all(&pending).await?;
    Ok(())
}

async fn write_font<W>(
    mut out: BufWriter<W>,
    options: SinkOptions,
    mut glyphs: mpsc::Receiver<Glyph>,
) -> Result<usize>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    let mut count = 0;

    if options.fixed_width {
        let mut placed = Vec::new();
        while let Some(glyph) = glyphs.recv().await {
            placed.push(options.place(glyph));
        }
        let advance = placed
            .iter()
            .map(|g| g.advance)
            .max()
            .unwrap_or(u32::from(options.font_height));

        options.header(&mut xml, advance)?;
        for glyph in &placed {
            options.render(&mut xml, glyph, advance)?;
            drain(&mut xml, &mut out).await?;
            count += 1;
        }
    } else {
        options.header(&mut xml, u32::from(options.font_height))?;
        drain(&mut xml, &mut out).await?;
        while let Some(glyph) = glyphs.recv().await {
            let glyph = options.place(glyph);
            options.render(&mut xml, &glyph, glyph.advance)?;
            drain(&mut xml, &mut out).await?;
            count += 1;
        }
    }

    footer(&mut xml)?;
    drain(&mut xml, &mut out).await?;
    out.flush().await?;
    Ok(count)
}
