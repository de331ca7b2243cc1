//! TrueType → Embedded OpenType

use glyphsmith_core::FontFormat;
use ttf_parser::name_id;
use write_fonts::read::TableProvider;
use write_fonts::read::tables::os2::SelectionFlags;

use super::Transcoder;
use crate::error::{Error, Result};
use crate::sfnt::{self, WriteBytes};

const VERSION: u32 = 0x0002_0001;
const MAGIC: u16 = 0x504C;
const DEFAULT_CHARSET: u8 = 1;

/// Prefixes a TrueType font with an EOT 2.1 header.
///
/// The font data itself is stored uncompressed and unobfuscated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtfToEot;

impl Transcoder for TtfToEot {
    fn format(&self) -> FontFormat {
        FontFormat::Eot
    }

    fn transcode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let invalid = |message: String| Error::transcode(FontFormat::Eot, message);

        let font = sfnt::parse(input)?;
        let os2 = font.os2().map_err(|e| invalid(format!("OS/2 table: {e}")))?;
        let head = font.head().map_err(|e| invalid(format!("head table: {e}")))?;
        let face = ttf_parser::Face::parse(input, 0).map_err(|e| invalid(e.to_string()))?;
        let font_size = u32::try_from(input.len())
            .map_err(|_| invalid(format!("font too large: {} bytes", input.len())))?;

        let name = |id: u16| -> Vec<u8> {
            face.names()
                .into_iter()
                .filter(|n| n.name_id == id)
                .find_map(|n| n.to_string())
                .unwrap_or_default()
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect()
        };

        let mut header = Vec::new();
        // EOTSize is filled in below.
        header.put_u32_le(0);
        header.put_u32_le(font_size);
        header.put_u32_le(VERSION);
        header.put_u32_le(0);
        header.extend_from_slice(os2.panose_10());
        header.put_u8(DEFAULT_CHARSET);
        header.put_u8(u8::from(os2.fs_selection().contains(SelectionFlags::ITALIC)));
        header.put_u32_le(u32::from(os2.us_weight_class()));
        header.put_u16_le(os2.fs_type());
        header.put_u16_le(MAGIC);
        for range in [
            os2.ul_unicode_range_1(),
            os2.ul_unicode_range_2(),
            os2.ul_unicode_range_3(),
            os2.ul_unicode_range_4(),
            os2.ul_code_page_range_1().unwrap_or_default(),
            os2.ul_code_page_range_2().unwrap_or_default(),
        ] {
            header.put_u32_le(range);
        }
        header.put_u32_le(head.checksum_adjustment());
        for _ in 0..4 {
            header.put_u32_le(0);
        }

        for id in [
            name_id::FAMILY,
            name_id::SUBFAMILY,
            name_id::VERSION,
            name_id::FULL_NAME,
        ] {
            let text = name(id);
            let size = u16::try_from(text.len())
                .map_err(|_| invalid(format!("name {id} too long: {} bytes", text.len())))?;
            header.put_u16_le(0);
            header.put_u16_le(size);
            header.extend_from_slice(&text);
        }
        // Padding5, then an empty RootString
        header.put_u16_le(0);
        header.put_u16_le(0);

        let total = u32::try_from(header.len() + input.len())
            .map_err(|_| invalid("font too large".to_string()))?;
        header[..4].copy_from_slice(&total.to_le_bytes());

        let mut out = header;
        out.extend_from_slice(input);
        Ok(out)
    }
}
