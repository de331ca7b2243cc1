//! SVG font → TrueType
//!
//! Outlines are reduced to quadratic contours with `kurbo`; every table is
//! built and assembled with `write-fonts`.

use std::collections::BTreeMap;
use std::fmt::Display;

use glyphsmith_core::FontFormat;
use kurbo::{BezPath, CubicBez, PathEl, Point};
use write_fonts::FontBuilder;
use write_fonts::read::tables::os2::SelectionFlags;
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{GlyfLocaBuilder, Glyph, SimpleGlyph};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::Os2;
use write_fonts::tables::post::Post;
use write_fonts::types::{FWord, Fixed, GlyphId, NameId, Tag, UfWord, Version16Dot16};

use super::Transcoder;
use crate::error::{Error, Result};
use crate::svg_font::{SvgFont, SvgGlyph};

const CURVE_TOLERANCE: f64 = 0.5;
const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;
const ENGLISH_US: u16 = 0x0409;
/// `ulUnicodeRange2` bit 28: Private Use Area
const PRIVATE_USE_AREA: u32 = 1 << 28;
const VENDOR_ID: &[u8; 4] = b"GSMT";

/// Builds a TrueType font from an SVG font document
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgFontToTtf;

impl Transcoder for SvgFontToTtf {
    fn format(&self) -> FontFormat {
        FontFormat::Ttf
    }

    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let font = SvgFont::parse(input)?;
        build_ttf(&font)
    }
}

fn ttf_error(message: impl Display) -> Error {
    Error::transcode(FontFormat::Ttf, message.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ContourPoint {
    x: i16,
    y: i16,
    on_curve: bool,
}

#[derive(Debug, Default)]
struct TtGlyph {
    name: String,
    contours: Vec<Vec<ContourPoint>>,
    advance: u16,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bounds {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
}

impl Bounds {
    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

impl TtGlyph {
    fn notdef() -> Self {
        Self {
            name: ".notdef".to_string(),
            ..Default::default()
        }
    }

    fn from_svg(glyph: &SvgGlyph) -> Result<Self> {
        Ok(Self {
            name: glyph.name.clone(),
            contours: contours(glyph)?,
            advance: glyph.advance,
        })
    }

    fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    fn bounds(&self) -> Option<Bounds> {
        self.contours
            .iter()
            .flatten()
            .map(|p| Bounds {
                x_min: p.x,
                y_min: p.y,
                x_max: p.x,
                y_max: p.y,
            })
            .reduce(Bounds::union)
    }

    fn left_side_bearing(&self) -> i16 {
        self.bounds().map_or(0, |b| b.x_min)
    }

    /// The contours as a path of lines and quadratic curves
    fn quadratic_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for contour in &self.contours {
            let mut points = contour
                .iter()
                .map(|p| (Point::new(f64::from(p.x), f64::from(p.y)), p.on_curve));
            let Some((start, _)) = points.next() else {
                continue;
            };
            path.move_to(start);

            let mut control = None;
            for (point, on_curve) in points {
                match (on_curve, control.take()) {
                    (true, Some(c)) => path.quad_to(c, point),
                    (true, None) => path.line_to(point),
                    (false, _) => control = Some(point),
                }
            }
            if let Some(c) = control {
                path.quad_to(c, start);
            }
            path.close_path();
        }
        path
    }

    fn to_glyph(&self) -> Result<Glyph> {
        if self.contours.is_empty() {
            return Ok(Glyph::Empty);
        }
        let simple = SimpleGlyph::from_bezpath(&self.quadratic_path())
            .map_err(|e| ttf_error(format!("glyph '{}': {e:?}", self.name)))?;
        Ok(Glyph::Simple(simple))
    }
}

/// Round onto the integer grid, or `None` outside the `i16` range of
/// TrueType coordinates
fn snap(p: Point) -> Option<(i16, i16)> {
    let coord = |v: f64| {
        let v = v.round();
        (v >= f64::from(i16::MIN) && v <= f64::from(i16::MAX)).then_some(v as i16)
    };
    Some((coord(p.x)?, coord(p.y)?))
}

fn push_point(
    glyph: &SvgGlyph,
    contour: &mut Vec<ContourPoint>,
    p: Point,
    on_curve: bool,
) -> Result<()> {
    let (x, y) = snap(p).ok_or_else(|| {
        ttf_error(format!(
            "glyph '{}' has a point at ({:.0}, {:.0}), outside the TrueType coordinate range",
            glyph.name, p.x, p.y
        ))
    })?;
    let point = ContourPoint { x, y, on_curve };
    if on_curve && contour.last() == Some(&point) {
        return Ok(());
    }
    contour.push(point);
    Ok(())
}

/// Quadratic contours of a glyph outline
fn contours(glyph: &SvgGlyph) -> Result<Vec<Vec<ContourPoint>>> {
    let mut contours = Vec::new();
    let mut current: Vec<ContourPoint> = Vec::new();
    let mut last = Point::ZERO;

    for el in glyph.path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                close_contour(&mut contours, std::mem::take(&mut current));
                push_point(glyph, &mut current, p, true)?;
                last = p;
            }
            PathEl::LineTo(p) => {
                push_point(glyph, &mut current, p, true)?;
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                push_point(glyph, &mut current, c, false)?;
                push_point(glyph, &mut current, p, true)?;
                last = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                let cubic = CubicBez::new(last, c1, c2, p);
                for (_, _, quad) in cubic.to_quads(CURVE_TOLERANCE) {
                    push_point(glyph, &mut current, quad.p1, false)?;
                    push_point(glyph, &mut current, quad.p2, true)?;
                }
                last = p;
            }
            PathEl::ClosePath => {
                close_contour(&mut contours, std::mem::take(&mut current));
            }
        }
    }
    close_contour(&mut contours, current);
    Ok(contours)
}

fn close_contour(contours: &mut Vec<Vec<ContourPoint>>, mut contour: Vec<ContourPoint>) {
    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    if contour.len() >= 3 {
        contours.push(contour);
    }
}

/// Assemble every table of the font
fn build_ttf(font: &SvgFont) -> Result<Vec<u8>> {
    // Glyph 0 is `.notdef`.
    let mut glyphs = vec![TtGlyph::notdef()];
    for glyph in &font.glyphs {
        glyphs.push(TtGlyph::from_svg(glyph)?);
    }
    let num_glyphs = u16::try_from(glyphs.len())
        .map_err(|_| ttf_error(format!("too many glyphs: {}", glyphs.len())))?;

    // The first glyph claiming a code point keeps it.
    let mut mappings = BTreeMap::new();
    for (index, glyph) in font.glyphs.iter().enumerate() {
        if let Some(c) = glyph.code_point {
            mappings.entry(c).or_insert(GlyphId::new(index as u32 + 1));
        }
    }

    let mut glyf_loca = GlyfLocaBuilder::new();
    for glyph in &glyphs {
        glyf_loca.add_glyph(&glyph.to_glyph()?).map_err(ttf_error)?;
    }
    let (glyf, loca, loca_format) = glyf_loca.build();

    let metrics = Metrics::new(font, &glyphs, &mappings, num_glyphs);
    let cmap = Cmap::from_mappings(mappings.iter().map(|(c, gid)| (*c, *gid))).map_err(ttf_error)?;
    let hmtx = Hmtx::new(
        glyphs
            .iter()
            .map(|g| LongMetric::new(g.advance, g.left_side_bearing()))
            .collect(),
        Vec::new(),
    );

    let mut builder = FontBuilder::new();
    builder.add_table(&os2_table(&metrics)).map_err(ttf_error)?;
    builder.add_table(&cmap).map_err(ttf_error)?;
    builder.add_table(&glyf).map_err(ttf_error)?;
    builder.add_table(&head_table(&metrics, loca_format)).map_err(ttf_error)?;
    builder.add_table(&hhea_table(&metrics)).map_err(ttf_error)?;
    builder.add_table(&hmtx).map_err(ttf_error)?;
    builder.add_table(&loca).map_err(ttf_error)?;
    builder.add_table(&maxp_table(&metrics)).map_err(ttf_error)?;
    builder.add_table(&name_table(&font.family)?).map_err(ttf_error)?;
    builder.add_table(&post_table(&metrics)).map_err(ttf_error)?;
    Ok(builder.build())
}

/// Font-wide values several tables share
struct Metrics {
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    bounds: Bounds,
    num_glyphs: u16,
    advance_max: u16,
    advance_avg: i16,
    min_lsb: i16,
    min_rsb: i16,
    x_max_extent: i16,
    max_points: u16,
    max_contours: u16,
    first_char: u16,
    last_char: u16,
}

impl Metrics {
    fn new(
        font: &SvgFont,
        glyphs: &[TtGlyph],
        mappings: &BTreeMap<char, GlyphId>,
        num_glyphs: u16,
    ) -> Self {
        let mut bounds: Option<Bounds> = None;
        let mut min_lsb = i16::MAX;
        let mut min_rsb = i16::MAX;
        let mut x_max_extent = i16::MIN;

        for glyph in glyphs {
            let Some(b) = glyph.bounds() else { continue };
            bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
            min_lsb = min_lsb.min(b.x_min);
            min_rsb = min_rsb.min(clamp_i16(i32::from(glyph.advance) - i32::from(b.x_max)));
            x_max_extent = x_max_extent.max(b.x_max);
        }

        let inked = bounds.is_some();
        let advances: Vec<u32> = glyphs.iter().skip(1).map(|g| u32::from(g.advance)).collect();
        let advance_avg = if advances.is_empty() {
            0
        } else {
            clamp_i16((advances.iter().sum::<u32>() / advances.len() as u32) as i32)
        };
        // Code points past the BMP report 0xFFFF.
        let char_index = |c: Option<&char>| c.map_or(0, |c| u16::try_from(*c as u32).unwrap_or(u16::MAX));

        Self {
            units_per_em: font.units_per_em,
            ascent: font.ascent,
            descent: font.descent,
            bounds: bounds.unwrap_or_default(),
            num_glyphs,
            advance_max: glyphs.iter().map(|g| g.advance).max().unwrap_or(0),
            advance_avg,
            min_lsb: if inked { min_lsb } else { 0 },
            min_rsb: if inked { min_rsb } else { 0 },
            x_max_extent: if inked { x_max_extent } else { 0 },
            max_points: saturate_u16(glyphs.iter().map(TtGlyph::point_count).max()),
            max_contours: saturate_u16(glyphs.iter().map(|g| g.contours.len()).max()),
            first_char: char_index(mappings.keys().next()),
            last_char: char_index(mappings.keys().next_back()),
        }
    }

    fn em(&self) -> i16 {
        clamp_i16(i32::from(self.units_per_em))
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

fn saturate_u16(value: Option<usize>) -> u16 {
    value.map_or(0, |v| u16::try_from(v).unwrap_or(u16::MAX))
}

fn head_table(m: &Metrics, loca_format: LocaFormat) -> Head {
    Head {
        font_revision: Fixed::from_f64(1.0),
        units_per_em: m.units_per_em,
        x_min: m.bounds.x_min,
        y_min: m.bounds.y_min,
        x_max: m.bounds.x_max,
        y_max: m.bounds.y_max,
        lowest_rec_ppem: 8,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    }
}

fn hhea_table(m: &Metrics) -> Hhea {
    Hhea::new(
        FWord::new(m.ascent),
        FWord::new(m.descent),
        FWord::new(0),
        UfWord::new(m.advance_max),
        FWord::new(m.min_lsb),
        FWord::new(m.min_rsb),
        FWord::new(m.x_max_extent),
        1,
        0,
        0,
        m.num_glyphs,
    )
}

fn maxp_table(m: &Metrics) -> Maxp {
    Maxp {
        num_glyphs: m.num_glyphs,
        max_points: Some(m.max_points),
        max_contours: Some(m.max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

/// PostScript name: printable ASCII without spaces or `[](){}<>/%`
fn postscript_name(family: &str) -> String {
    let name: String = family
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .take(63)
        .collect();
    if name.is_empty() {
        "Icons".to_string()
    } else {
        name
    }
}

fn name_table(family: &str) -> Result<Name> {
    let family = if family.is_empty() { "Icons" } else { family };
    let entries = [
        (NameId::FAMILY_NAME, family.to_string()),
        (NameId::SUBFAMILY_NAME, "Regular".to_string()),
        (NameId::UNIQUE_ID, format!("glyphsmith:{family}")),
        (NameId::FULL_NAME, family.to_string()),
        (NameId::VERSION_STRING, "Version 1.0".to_string()),
        (NameId::POSTSCRIPT_NAME, postscript_name(family)),
    ];

    // String offsets in the name table are 16 bits wide.
    let storage: usize = entries
        .iter()
        .map(|(_, text)| text.encode_utf16().count() * 2)
        .sum();
    u16::try_from(storage).map_err(|_| {
        ttf_error(format!(
            "font name too long: name strings need {storage} bytes, at most {} fit",
            u16::MAX
        ))
    })?;

    Ok(Name::new(
        entries
            .into_iter()
            .map(|(id, text)| {
                NameRecord::new(WINDOWS_PLATFORM, UNICODE_BMP_ENCODING, ENGLISH_US, id, text.into())
            })
            .collect(),
    ))
}

fn os2_table(m: &Metrics) -> Os2 {
    let em = m.em();
    Os2 {
        x_avg_char_width: m.advance_avg,
        us_weight_class: 400,
        us_width_class: 5,
        y_subscript_x_size: em / 2,
        y_subscript_y_size: em / 2,
        y_subscript_y_offset: em / 10,
        y_superscript_x_size: em / 2,
        y_superscript_y_size: em / 2,
        y_superscript_y_offset: em / 3,
        y_strikeout_size: em / 20,
        y_strikeout_position: em / 4,
        ul_unicode_range_2: PRIVATE_USE_AREA,
        ach_vend_id: Tag::new(VENDOR_ID),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: m.first_char,
        us_last_char_index: m.last_char,
        s_typo_ascender: m.ascent,
        s_typo_descender: m.descent,
        s_typo_line_gap: 0,
        us_win_ascent: m.ascent.max(m.bounds.y_max).max(0) as u16,
        us_win_descent: (-i32::from(m.descent.min(m.bounds.y_min))).max(0) as u16,
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        ..Default::default()
    }
}

fn post_table(m: &Metrics) -> Post {
    let em = m.em();
    Post {
        version: Version16Dot16::VERSION_3_0,
        underline_position: FWord::new(-em / 10),
        underline_thickness: FWord::new(em / 20),
        ..Default::default()
    }
}
