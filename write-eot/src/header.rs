//! The EOT header: field extraction and little-endian serialization.

use font_types::Tag;

use read_sfnt::tables::{head, name, os2};
use read_sfnt::{ParseError, SfntFont};

/// EOT format version 2.1.
pub const EOT_VERSION: u32 = 0x0002_0001;
/// The magic number carried in every EOT header.
pub const EOT_MAGIC_NUMBER: u16 = 0x504C;
/// DEFAULT_CHARSET.
pub const EOT_DEFAULT_CHARSET: u8 = 0x01;
/// Byte length of the fixed, little-endian packed portion of the header.
pub const FIXED_HEADER_LEN: usize = 82;

/// An empty name slot or root string is just a zero length field.
const EMPTY_STRING_LEN: usize = 2;

/// The tables the header is assembled from, in reporting order.
const REQUIRED_TABLES: [Tag; 3] = [head::TAG, name::TAG, os2::TAG];

/// Name ids carried in the variable portion, in emission order.
const EOT_NAME_IDS: [u16; 4] = [
    name::FAMILY_NAME_ID,
    name::STYLE_NAME_ID,
    name::VERSION_NAME_ID,
    name::FULL_NAME_ID,
];

/// The assembled header fields for one font.
///
/// Computed once from a parsed font and serialized once; the name strings
/// borrow from the font data, so the header never outlives its source.
#[derive(Debug, Clone)]
pub struct EotHeader<'a> {
    font_data_size: u32,
    panose: [u8; 10],
    italic: bool,
    weight: u16,
    fs_type: u16,
    unicode_range: [u32; 4],
    code_page_range: [u32; 2],
    checksum_adjustment: u32,
    /// UTF-16BE source bytes in emission order: family, style, version, full.
    names: [Option<&'a [u8]>; 4],
}

impl<'a> EotHeader<'a> {
    /// Collect everything the header needs from a parsed font.
    ///
    /// `head`, `name` and `OS/2` must all be present; the first missing one
    /// (in that order) is reported.
    pub fn from_font(font: &SfntFont<'a>) -> Result<Self, ParseError> {
        for tag in REQUIRED_TABLES {
            if !font.table_directory().contains(tag) {
                return Err(ParseError::MissingRequiredTable(tag));
            }
        }
        let os2 = font.os2()?;
        let head = font.head()?;
        let name = font.name()?;

        let mut names = [None; 4];
        for (slot, name_id) in names.iter_mut().zip(EOT_NAME_IDS) {
            *slot = name.string_bytes(name_id)?;
        }

        Ok(EotHeader {
            font_data_size: font.data().len() as u32,
            panose: os2.panose(),
            italic: os2.is_italic(),
            weight: os2.weight_class(),
            fs_type: os2.fs_type(),
            unicode_range: os2.unicode_range(),
            code_page_range: os2.code_page_range(),
            checksum_adjustment: head.checksum_adjustment(),
            names,
        })
    }

    /// The length of the font data that follows the header.
    pub fn font_data_size(&self) -> u32 {
        self.font_data_size
    }

    /// Total length of the EOT file: the fixed header, the name blocks, the
    /// root string, and the font data appended after the header.
    pub fn eot_size(&self) -> u32 {
        let names: usize = self.names.iter().map(|name| name_block_len(*name)).sum();
        (FIXED_HEADER_LEN + names + EMPTY_STRING_LEN) as u32 + self.font_data_size
    }

    /// Serialize the header.
    ///
    /// The caller appends the unchanged big-endian font data to produce the
    /// complete file; the header itself is little-endian throughout.
    pub fn dump(&self) -> Vec<u8> {
        let header_len = self.eot_size() as usize - self.font_data_size as usize;
        let mut out = Vec::with_capacity(header_len);
        out.extend_from_slice(&self.eot_size().to_le_bytes());
        out.extend_from_slice(&self.font_data_size.to_le_bytes());
        out.extend_from_slice(&EOT_VERSION.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // flags: no special processing
        out.extend_from_slice(&self.panose);
        out.push(EOT_DEFAULT_CHARSET);
        out.push(self.italic as u8);
        out.extend_from_slice(&u32::from(self.weight).to_le_bytes());
        out.extend_from_slice(&self.fs_type.to_le_bytes());
        out.extend_from_slice(&EOT_MAGIC_NUMBER.to_le_bytes());
        for range in self.unicode_range {
            out.extend_from_slice(&range.to_le_bytes());
        }
        for range in self.code_page_range {
            out.extend_from_slice(&range.to_le_bytes());
        }
        out.extend_from_slice(&self.checksum_adjustment.to_le_bytes());
        out.extend_from_slice(&[0u8; 18]); // reserved[4] and padding1
        for name in self.names {
            push_name_block(&mut out, name);
        }
        out.extend_from_slice(&0u16.to_le_bytes()); // empty root string
        debug_assert_eq!(out.len(), header_len);
        out
    }
}

fn name_block_len(name: Option<&[u8]>) -> usize {
    match name {
        // length field + string + one zero halfword
        Some(bytes) => EMPTY_STRING_LEN + bytes.len() + 2,
        None => EMPTY_STRING_LEN,
    }
}

/// A present string is emitted length-prefixed as little-endian UTF-16 with
/// a zero halfword after it; an absent slot is a bare zero length.
fn push_name_block(out: &mut Vec<u8>, name: Option<&[u8]>) {
    match name {
        Some(utf16_be) => {
            out.extend_from_slice(&(utf16_be.len() as u16).to_le_bytes());
            for unit in utf16_be.chunks_exact(2) {
                out.extend_from_slice(&[unit[1], unit[0]]);
            }
            out.extend_from_slice(&0u16.to_le_bytes());
        }
        None => out.extend_from_slice(&0u16.to_le_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_for(font_bytes: &[u8]) -> EotHeader {
        let font = SfntFont::new(font_bytes).unwrap();
        EotHeader::from_font(&font).unwrap()
    }

    #[test]
    fn minimal_font_header_is_92_bytes() {
        let bytes = eot_test_data::minimal_font();
        let header = header_for(&bytes);
        // fixed header + four empty name slots + empty root string
        let expected = FIXED_HEADER_LEN + 4 * EMPTY_STRING_LEN + EMPTY_STRING_LEN;
        assert_eq!(expected, 92);
        assert_eq!(header.dump().len(), expected);
        assert_eq!(header.eot_size() as usize, expected + bytes.len());
        assert_eq!(header.font_data_size() as usize, bytes.len());
    }

    #[test]
    fn fixed_fields_are_little_endian() {
        let bytes = eot_test_data::sample_font();
        let header = header_for(&bytes);
        let out = header.dump();
        let eot_size = u32::from_le_bytes(out[0..4].try_into().unwrap());
        assert_eq!(eot_size, header.eot_size());
        let font_data_size = u32::from_le_bytes(out[4..8].try_into().unwrap());
        assert_eq!(font_data_size as usize, bytes.len());
        let version = u32::from_le_bytes(out[8..12].try_into().unwrap());
        assert_eq!(version, EOT_VERSION);
        // charset and the italic flag
        assert_eq!(out[26], EOT_DEFAULT_CHARSET);
        assert_eq!(out[27], 1);
        let weight = u32::from_le_bytes(out[28..32].try_into().unwrap());
        assert_eq!(weight, 700);
        let fs_type = u16::from_le_bytes(out[32..34].try_into().unwrap());
        assert_eq!(fs_type, 0x0004);
        let magic = u16::from_le_bytes(out[34..36].try_into().unwrap());
        assert_eq!(magic, EOT_MAGIC_NUMBER);
    }

    #[test]
    fn name_strings_are_byte_swapped() {
        let bytes = eot_test_data::sample_font();
        let out = header_for(&bytes).dump();
        // the first name block starts right after the fixed header
        let family_len = u16::from_le_bytes(
            out[FIXED_HEADER_LEN..FIXED_HEADER_LEN + 2].try_into().unwrap(),
        ) as usize;
        let family = &out[FIXED_HEADER_LEN + 2..FIXED_HEADER_LEN + 2 + family_len];
        let expected: Vec<u8> = "Test Family"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        assert_eq!(family, expected.as_slice());
        // the block ends with a zero halfword
        let padding = &out[FIXED_HEADER_LEN + 2 + family_len..FIXED_HEADER_LEN + 4 + family_len];
        assert_eq!(padding, &[0, 0]);
    }

    #[test]
    fn absent_names_become_empty_slots() {
        let bytes = eot_test_data::minimal_font();
        let out = header_for(&bytes).dump();
        // four empty name slots then the empty root string
        assert_eq!(&out[FIXED_HEADER_LEN..], &[0u8; 10]);
    }

    #[test]
    fn eot_size_matches_block_sum() {
        let bytes = eot_test_data::sample_font();
        let header = header_for(&bytes);
        let dumped = header.dump();
        assert_eq!(header.eot_size() as usize, dumped.len() + bytes.len());
    }

    #[test]
    fn missing_tables_reported_in_order() {
        let os2 = eot_test_data::os2_table(&Default::default());
        let bytes = eot_test_data::sfnt_font(&[(b"OS/2", &os2)]);
        let font = SfntFont::new(&bytes).unwrap();
        assert!(matches!(
            EotHeader::from_font(&font),
            Err(ParseError::MissingRequiredTable(tag)) if tag == head::TAG,
        ));

        let head_data = eot_test_data::head_table(0);
        let bytes = eot_test_data::sfnt_font(&[(b"head", &head_data), (b"OS/2", &os2)]);
        let font = SfntFont::new(&bytes).unwrap();
        assert!(matches!(
            EotHeader::from_font(&font),
            Err(ParseError::MissingRequiredTable(tag)) if tag == name::TAG,
        ));
    }
}
