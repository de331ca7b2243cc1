//! SVG font document reader
//!
//! Reads back the subset of SVG 1.1 fonts that [`FontSink`](crate::FontSink)
//! writes: one `<font>`, its `<font-face>`, and `<glyph>` elements with
//! single-character `unicode` mappings.

use std::collections::HashMap;

use kurbo::BezPath;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// A parsed SVG font
#[derive(Debug, Clone, Default)]
pub struct SvgFont {
    /// `font-family` of the font face
    pub family: String,
    /// Design units per em
    pub units_per_em: u16,
    /// Ascent above the baseline
    pub ascent: i16,
    /// Descent below the baseline, zero or negative
    pub descent: i16,
    /// Advance of glyphs without their own `horiz-adv-x`
    pub default_advance: u16,
    /// Glyphs in document order
    pub glyphs: Vec<SvgGlyph>,
}

/// One `<glyph>` element
#[derive(Debug, Clone)]
pub struct SvgGlyph {
    /// `glyph-name`
    pub name: String,
    /// Mapped code point, when `unicode` is a single character
    pub code_point: Option<char>,
    /// Advance width in font units
    pub advance: u16,
    /// Outline in font units, y up
    pub path: BezPath,
}

impl SvgFont {
    /// Parse an SVG font document
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut font = SvgFont::default();
        let mut saw_font = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(element) | Event::Empty(element) => {
                    match element.local_name().as_ref() {
                        b"font" => {
                            saw_font = true;
                            let attrs = attributes(&element)?;
                            font.default_advance = number(&attrs, "horiz-adv-x")?.unwrap_or(0.0)
                                as u16;
                        }
                        b"font-face" => {
                            let attrs = attributes(&element)?;
                            font.family = attrs.get("font-family").cloned().unwrap_or_default();
                            font.units_per_em =
                                number(&attrs, "units-per-em")?.unwrap_or(1000.0) as u16;
                            font.ascent = number(&attrs, "ascent")?
                                .unwrap_or(f64::from(font.units_per_em))
                                as i16;
                            font.descent = -(number(&attrs, "descent")?.unwrap_or(0.0).abs() as i16);
                        }
                        b"glyph" => font.glyphs.push(glyph(&element, font.default_advance)?),
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_font {
            return Err(Error::SvgFont("no <font> element".to_string()));
        }
        if font.units_per_em == 0 {
            return Err(Error::SvgFont("units-per-em must be positive".to_string()));
        }
        Ok(font)
    }
}

fn glyph(element: &BytesStart<'_>, default_advance: u16) -> Result<SvgGlyph> {
    let attrs = attributes(element)?;
    let name = attrs.get("glyph-name").cloned().unwrap_or_default();

    let code_point = attrs.get("unicode").and_then(|text| {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    });

    let advance = number(&attrs, "horiz-adv-x")?
        .map(|v| v.round().clamp(0.0, f64::from(u16::MAX)) as u16)
        .unwrap_or(default_advance);

    let path = match attrs.get("d") {
        Some(d) if !d.trim().is_empty() => BezPath::from_svg(d).map_err(|e| {
            Error::SvgFont(format!("glyph '{name}' has invalid path data: {e}"))
        })?,
        _ => BezPath::new(),
    };

    Ok(SvgGlyph {
        name,
        code_point,
        advance,
        path,
    })
}

fn attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn number(attrs: &HashMap<String, String>, key: &str) -> Result<Option<f64>> {
    attrs
        .get(key)
        .map(|text| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| Error::SvgFont(format!("attribute {key}=\"{text}\" is not a number")))
        })
        .transpose()
}
