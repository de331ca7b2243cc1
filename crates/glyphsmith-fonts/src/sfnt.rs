//! sfnt container plumbing
//!
//! Table access for TrueType fonts goes through `write_fonts::read`; what
//! remains here are the byte-level helpers the WOFF and EOT headers share.

use write_fonts::read::FontRef;
use write_fonts::types::Tag;

use crate::error::{Error, Result};

/// `sfntVersion` of TrueType-flavoured fonts
pub const TRUETYPE_FLAVOR: u32 = 0x0001_0000;

/// Big- and little-endian append helpers for container headers
pub(crate) trait WriteBytes {
    fn put_u8(&mut self, value: u8);
    fn put_u16(&mut self, value: u16);
    fn put_u32(&mut self, value: u32);
    fn put_u16_le(&mut self, value: u16);
    fn put_u32_le(&mut self, value: u32);
    /// Zero-fill up to the next multiple of four
    fn pad4(&mut self);
}

impl WriteBytes for Vec<u8> {
    fn put_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn put_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u16_le(&mut self, value: u16) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn put_u32_le(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn pad4(&mut self) {
        while self.len() % 4 != 0 {
            self.push(0);
        }
    }
}

/// Round `len` up to a multiple of four
pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// One table of a TrueType font, borrowed from the font data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table<'a> {
    /// Table tag
    pub tag: Tag,
    /// Checksum as stored in the table directory
    pub checksum: u32,
    /// Unpadded table data
    pub data: &'a [u8],
}

/// Parse a TrueType font
pub fn parse(font: &[u8]) -> Result<FontRef<'_>> {
    let parsed = FontRef::new(font).map_err(|e| Error::Sfnt(e.to_string()))?;
    if parsed.table_directory.sfnt_version() != TRUETYPE_FLAVOR {
        return Err(Error::Sfnt("not a TrueType font".to_string()));
    }
    Ok(parsed)
}

/// The tables of a TrueType font, in directory order
pub fn read_tables(font: &[u8]) -> Result<Vec<Table<'_>>> {
    let parsed = parse(font)?;
    parsed
        .table_directory
        .table_records()
        .iter()
        .map(|record| {
            let tag = record.tag();
            let data = parsed
                .table_data(tag)
                .ok_or_else(|| Error::Sfnt(format!("table '{tag}' extends past end of font")))?;
            Ok(Table {
                tag,
                checksum: record.checksum(),
                data: data.as_bytes(),
            })
        })
        .collect()
}

/// Size of the uncompressed sfnt these tables rebuild into
pub fn sfnt_size(tables: &[Table<'_>]) -> usize {
    12 + 16 * tables.len() + tables.iter().map(|t| padded_len(t.data.len())).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use write_fonts::FontBuilder;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 4)]
    #[case(4, 4)]
    #[case(54, 56)]
    fn test_padded_len(#[case] len: usize, #[case] expected: usize) {
        assert_eq!(padded_len(len), expected);
    }

    #[test]
    fn test_read_tables_in_directory_order() {
        let font = FontBuilder::new()
            .add_raw(Tag::new(b"post"), vec![1, 2, 3])
            .add_raw(Tag::new(b"OS/2"), vec![9; 6])
            .add_raw(Tag::new(b"cmap"), vec![7; 8])
            .build();

        let tables = read_tables(&font).unwrap();
        let tags: Vec<Tag> = tables.iter().map(|t| t.tag).collect();
        assert_eq!(tags, [Tag::new(b"OS/2"), Tag::new(b"cmap"), Tag::new(b"post")]);
        assert_eq!(tables[2].data, &[1, 2, 3]);
        assert_eq!(sfnt_size(&tables), font.len());
    }

    #[test]
    fn test_pad4() {
        let mut out = vec![1u8];
        out.pad4();
        assert_eq!(out, [1, 0, 0, 0]);
        out.put_u16_le(0x0102);
        out.put_u16(0x0102);
        assert_eq!(&out[4..], &[2, 1, 1, 2]);
    }

    #[test]
    fn test_read_rejects_non_truetype() {
        assert!(read_tables(b"OTTO\0\0\0\0\0\0\0\0").is_err());
        assert!(read_tables(&[0, 1]).is_err());
    }
}
