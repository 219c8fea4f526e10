//! The SFNT header and table directory

use std::collections::BTreeMap;

use font_types::Tag;

use crate::error::ParseError;
use crate::font_data::FontData;

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x0001_0000;
/// The SFNT version for fonts containing PostScript (CFF) outlines.
pub const CFF_SFNT_VERSION: u32 = u32::from_be_bytes(*b"OTTO");
/// The SFNT version used by Apple-flavored TrueType fonts.
pub const APPLE_SFNT_VERSION: u32 = u32::from_be_bytes(*b"true");

const RECOGNIZED_SFNT_VERSIONS: [u32; 3] =
    [TT_SFNT_VERSION, CFF_SFNT_VERSION, APPLE_SFNT_VERSION];

/// Byte length of the fixed SFNT file header.
const SFNT_HEADER_LEN: usize = 12;
/// Byte length of one table directory record.
const TABLE_RECORD_LEN: usize = 16;

/// One entry in the table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// The table directory, keyed by tag.
///
/// Built in a single pass over the header. Every record's extent is
/// checked against the underlying data before it is stored, so lookups can
/// slice table data without further bounds checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDirectory {
    records: BTreeMap<Tag, TableRecord>,
}

impl TableDirectory {
    /// Read the SFNT header, returning the declared version and directory.
    pub(crate) fn read(data: FontData) -> Result<(u32, TableDirectory), ParseError> {
        if data.len() < SFNT_HEADER_LEN {
            return Err(ParseError::TruncatedFont);
        }
        let mut cursor = data.cursor();
        let version = cursor.read::<u32>()?;
        if !RECOGNIZED_SFNT_VERSIONS.contains(&version) {
            return Err(ParseError::InvalidFontFormat(version));
        }
        let num_tables = cursor.read::<u16>()? as usize;
        cursor.advance::<u16>(); // searchRange
        cursor.advance::<u16>(); // entrySelector
        cursor.advance::<u16>(); // rangeShift

        let directory_end = num_tables
            .checked_mul(TABLE_RECORD_LEN)
            .and_then(|len| len.checked_add(SFNT_HEADER_LEN))
            .ok_or(ParseError::TruncatedFont)?;
        if directory_end > data.len() {
            return Err(ParseError::TruncatedFont);
        }

        let mut records = BTreeMap::new();
        for _ in 0..num_tables {
            let tag = cursor.read::<Tag>()?;
            let checksum = cursor.read::<u32>()?;
            let offset = cursor.read::<u32>()?;
            let length = cursor.read::<u32>()?;
            let end = (offset as usize)
                .checked_add(length as usize)
                .ok_or(ParseError::TruncatedFont)?;
            if end > data.len() {
                return Err(ParseError::TruncatedFont);
            }
            let record = TableRecord {
                tag,
                checksum,
                offset,
                length,
            };
            if records.insert(tag, record).is_some() {
                return Err(ParseError::MalformedData("duplicate table directory tag"));
            }
        }
        Ok((version, TableDirectory { records }))
    }

    /// The record for `tag`, if the directory contains it.
    pub fn get(&self, tag: Tag) -> Option<&TableRecord> {
        self.records.get(&tag)
    }

    /// `true` if the directory contains a record for `tag`.
    pub fn contains(&self, tag: Tag) -> bool {
        self.records.contains_key(&tag)
    }

    /// The number of tables in the directory.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if the directory contains no tables.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The directory's records, in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &TableRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(bytes: &[u8]) -> Result<(u32, TableDirectory), ParseError> {
        TableDirectory::read(FontData::new(bytes))
    }

    #[test]
    fn minimal_directory() {
        let font = eot_test_data::minimal_font();
        let (version, directory) = read(&font).unwrap();
        assert_eq!(version, TT_SFNT_VERSION);
        assert_eq!(directory.len(), 3);
        assert!(directory.contains(Tag::new(b"head")));
        assert!(directory.contains(Tag::new(b"name")));
        assert!(directory.contains(Tag::new(b"OS/2")));
    }

    #[test]
    fn rejects_unknown_version() {
        assert_eq!(
            read(eot_test_data::BAD_VERSION),
            Err(ParseError::InvalidFontFormat(0xDEADBEEF)),
        );
    }

    #[test]
    fn rejects_short_header() {
        assert_eq!(read(&[]), Err(ParseError::TruncatedFont));
        assert_eq!(read(&[0, 1, 0, 0]), Err(ParseError::TruncatedFont));
    }

    #[test]
    fn rejects_directory_past_end() {
        // declares one table but stops after the header
        let mut font = Vec::new();
        font.extend_from_slice(&TT_SFNT_VERSION.to_be_bytes());
        font.extend_from_slice(&[0, 1, 0, 16, 0, 0, 0, 0]);
        assert_eq!(read(&font), Err(ParseError::TruncatedFont));
    }

    #[test]
    fn rejects_table_extent_past_end() {
        let mut font = eot_test_data::minimal_font();
        font.truncate(font.len() - 1);
        assert_eq!(read(&font), Err(ParseError::TruncatedFont));
    }

    #[test]
    fn rejects_duplicate_tags() {
        let head = eot_test_data::head_table(0);
        let font = eot_test_data::sfnt_font(&[(b"head", &head), (b"head", &head)]);
        assert_eq!(
            read(&font),
            Err(ParseError::MalformedData("duplicate table directory tag")),
        );
    }
}
