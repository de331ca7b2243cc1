//! TrueType → WOFF 2.0
//!
//! Tables are stored with the null transform and compressed together in a
//! single brotli stream.

use std::io::Write;

use glyphsmith_core::FontFormat;

use super::Transcoder;
use crate::error::{Error, Result};
use write_fonts::types::Tag;

use crate::sfnt::{self, TRUETYPE_FLAVOR, Table, WriteBytes};

const SIGNATURE: u32 = 0x774F_4632;
const BROTLI_BUFFER: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

/// Null transform for `glyf` and `loca`
const NULL_GLYF_TRANSFORM: u8 = 3 << 6;
const ARBITRARY_TAG: u8 = 63;

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");

/// Tags with a one-byte encoding in the table directory, by index
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

/// Wraps a TrueType font in a WOFF 2.0 container
#[derive(Debug, Default, Clone, Copy)]
pub struct TtfToWoff2;

impl Transcoder for TtfToWoff2 {
    fn format(&self) -> FontFormat {
        FontFormat::Woff2
    }

    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let tables = directory_order(sfnt::read_tables(input)?);
        let num_tables = u16::try_from(tables.len())
            .map_err(|_| Error::transcode(FontFormat::Woff2, "too many tables"))?;

        let mut directory = Vec::new();
        let mut stream = Vec::new();
        for table in &tables {
            write_entry(&mut directory, table);
            stream.extend_from_slice(table.data);
        }

        let compressed = compress(&stream)?;

        let total_len = sfnt::padded_len(48 + directory.len() + compressed.len());
        let mut out = Vec::with_capacity(total_len);
        out.put_u32(SIGNATURE);
        out.put_u32(TRUETYPE_FLAVOR);
        out.put_u32(total_len as u32);
        out.put_u16(num_tables);
        out.put_u16(0);
        out.put_u32(sfnt::sfnt_size(&tables) as u32);
        out.put_u32(compressed.len() as u32);
        out.put_u16(1);
        out.put_u16(0);
        // No metadata or private block
        for _ in 0..5 {
            out.put_u32(0);
        }
        out.extend_from_slice(&directory);
        out.extend_from_slice(&compressed);
        out.pad4();

        debug_assert_eq!(out.len(), total_len);
        Ok(out)
    }
}

/// Sort by tag, then move `loca` directly behind `glyf`
fn directory_order(mut tables: Vec<Table<'_>>) -> Vec<Table<'_>> {
    tables.sort_by_key(|t| t.tag);
    if let Some(loca) = tables.iter().position(|t| t.tag == LOCA) {
        let loca = tables.remove(loca);
        let at = tables
            .iter()
            .position(|t| t.tag == GLYF)
            .map_or(tables.len(), |glyf| glyf + 1);
        tables.insert(at, loca);
    }
    tables
}

fn write_entry(out: &mut Vec<u8>, table: &Table<'_>) {
    let tag = table.tag.to_be_bytes();
    let known = KNOWN_TAGS.iter().position(|known| **known == tag);
    let transform = if table.tag == GLYF || table.tag == LOCA {
        NULL_GLYF_TRANSFORM
    } else {
        0
    };

    match known {
        Some(index) => out.put_u8(index as u8 | transform),
        None => {
            out.put_u8(ARBITRARY_TAG | transform);
            out.extend_from_slice(&tag);
        }
    }
    write_base128(out, table.data.len() as u32);
}

/// `UIntBase128`: big-endian groups of seven bits, high bit set on all
/// but the last byte
fn write_base128(out: &mut Vec<u8>, value: u32) {
    let mut groups = [0u8; 5];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..len).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        out.push(groups[i] | continuation);
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(
            &mut compressed,
            BROTLI_BUFFER,
            BROTLI_QUALITY,
            BROTLI_WINDOW,
        );
        writer
            .write_all(data)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::transcode(FontFormat::Woff2, e.to_string()))?;
    }
    Ok(compressed)
}
