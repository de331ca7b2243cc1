//! TrueType → WOFF 1.0

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use glyphsmith_core::FontFormat;

use super::Transcoder;
use crate::error::{Error, Result};
use crate::sfnt::{self, TRUETYPE_FLAVOR, WriteBytes};

const SIGNATURE: u32 = 0x774F_4646;
const HEADER_LEN: usize = 44;
const DIRECTORY_ENTRY_LEN: usize = 20;

/// Wraps a TrueType font in a WOFF 1.0 container.
///
/// Each table is zlib-compressed when that makes it smaller and stored
/// as-is otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtfToWoff;

impl Transcoder for TtfToWoff {
    fn format(&self) -> FontFormat {
        FontFormat::Woff
    }

    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut tables = sfnt::read_tables(input)?;
        tables.sort_by_key(|t| t.tag);
        let num_tables = u16::try_from(tables.len())
            .map_err(|_| Error::transcode(FontFormat::Woff, "too many tables"))?;

        let mut stored = Vec::with_capacity(tables.len());
        for table in &tables {
            let compressed = deflate(table.data)?;
            stored.push(if compressed.len() < table.data.len() {
                compressed
            } else {
                table.data.to_vec()
            });
        }

        let mut offset = HEADER_LEN + DIRECTORY_ENTRY_LEN * tables.len();
        let mut directory = Vec::with_capacity(DIRECTORY_ENTRY_LEN * tables.len());
        for (table, data) in tables.iter().zip(&stored) {
            directory.extend_from_slice(&table.tag.to_be_bytes());
            directory.put_u32(offset as u32);
            directory.put_u32(data.len() as u32);
            directory.put_u32(table.data.len() as u32);
            directory.put_u32(table.checksum);
            offset += sfnt::padded_len(data.len());
        }
        let total_len = offset;

        let mut out = Vec::with_capacity(total_len);
        out.put_u32(SIGNATURE);
        out.put_u32(TRUETYPE_FLAVOR);
        out.put_u32(total_len as u32);
        out.put_u16(num_tables);
        out.put_u16(0);
        out.put_u32(sfnt::sfnt_size(&tables) as u32);
        out.put_u16(1);
        out.put_u16(0);
        // No metadata or private block
        for _ in 0..5 {
            out.put_u32(0);
        }
        out.extend_from_slice(&directory);
        for data in &stored {
            out.extend_from_slice(data);
            out.pad4();
        }

        debug_assert_eq!(out.len(), total_len);
        Ok(out)
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| Error::transcode(FontFormat::Woff, e.to_string()))
}
