//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use std::collections::BTreeMap;

use font_types::Tag;

use crate::error::ParseError;
use crate::font_data::FontData;

/// 'name'
pub const TAG: Tag = Tag::new(b"name");

/// Name id of the font family name.
pub const FAMILY_NAME_ID: u16 = 1;
/// Name id of the subfamily (style) name.
pub const STYLE_NAME_ID: u16 = 2;
/// Name id of the full font name.
pub const FULL_NAME_ID: u16 = 4;
/// Name id of the version string.
pub const VERSION_NAME_ID: u16 = 5;

const HEADER_LEN: usize = 6;
const RECORD_LEN: usize = 12;

const PLATFORM_ID_MICROSOFT: u16 = 3;
const ENCODING_ID_UNICODE_BMP: u16 = 1;
const LANGUAGE_ID_EN_US: u16 = 0x0409;

/// One retained name record; `offset` is relative to string storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRecord {
    pub name_id: u16,
    pub length: u16,
    pub offset: u16,
}

/// The name table, filtered to Microsoft-platform, Unicode-BMP,
/// US-English records and keyed by name id.
///
/// A later record with the same name id replaces an earlier one, matching
/// how consumers of the table resolve duplicates.
#[derive(Debug, Clone)]
pub struct Name<'a> {
    data: FontData<'a>,
    storage_offset: u16,
    records: BTreeMap<u16, NameRecord>,
}

impl<'a> Name<'a> {
    /// Read the table from its declared-length data.
    pub fn read(data: FontData<'a>) -> Result<Self, ParseError> {
        if data.len() < HEADER_LEN {
            return Err(ParseError::TableTooShort(TAG));
        }
        let count = data.read_at::<u16>(2)? as usize;
        let storage_offset = data.read_at::<u16>(4)?;
        if HEADER_LEN + count * RECORD_LEN > data.len() {
            return Err(ParseError::MalformedData("name records exceed the name table"));
        }

        let mut records = BTreeMap::new();
        for i in 0..count {
            let pos = HEADER_LEN + i * RECORD_LEN;
            let platform_id = data.read_at::<u16>(pos)?;
            let encoding_id = data.read_at::<u16>(pos + 2)?;
            let language_id = data.read_at::<u16>(pos + 4)?;
            if platform_id != PLATFORM_ID_MICROSOFT
                || encoding_id != ENCODING_ID_UNICODE_BMP
                || language_id != LANGUAGE_ID_EN_US
            {
                continue;
            }
            let name_id = data.read_at::<u16>(pos + 6)?;
            records.insert(
                name_id,
                NameRecord {
                    name_id,
                    length: data.read_at(pos + 8)?,
                    offset: data.read_at(pos + 10)?,
                },
            );
        }
        Ok(Name {
            data,
            storage_offset,
            records,
        })
    }

    /// The retained record for `name_id`, if one exists.
    pub fn record(&self, name_id: u16) -> Option<&NameRecord> {
        self.records.get(&name_id)
    }

    /// The number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if no records were retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The UTF-16BE string bytes for `name_id`, if a record exists.
    ///
    /// An absent name id is `Ok(None)`; a record whose declared string lies
    /// outside the table, or whose length is not a whole number of UTF-16
    /// code units, is an error.
    pub fn string_bytes(&self, name_id: u16) -> Result<Option<&'a [u8]>, ParseError> {
        let Some(record) = self.records.get(&name_id) else {
            return Ok(None);
        };
        if record.length % 2 != 0 {
            return Err(ParseError::MalformedData("odd name string length"));
        }
        let start = self.storage_offset as usize + record.offset as usize;
        let end = start + record.length as usize;
        self.data
            .slice(start..end)
            .map(|data| Some(data.as_bytes()))
            .ok_or(ParseError::TruncatedFont)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eot_test_data::{name_table, utf16_be, NameEntry};

    fn read(bytes: &[u8]) -> Result<Name, ParseError> {
        Name::read(FontData::new(bytes))
    }

    #[test]
    fn keeps_only_microsoft_english_records() {
        let table = name_table(&[
            NameEntry::microsoft(FAMILY_NAME_ID, "Alpha"),
            NameEntry {
                platform_id: 1,
                encoding_id: 0,
                language_id: 0,
                name_id: FAMILY_NAME_ID,
                string: b"Mac Alpha".to_vec(),
            },
            NameEntry {
                platform_id: 3,
                encoding_id: 1,
                language_id: 0x0407, // German
                name_id: STYLE_NAME_ID,
                string: utf16_be("Fett"),
            },
        ]);
        let name = read(&table).unwrap();
        assert_eq!(name.len(), 1);
        assert_eq!(
            name.string_bytes(FAMILY_NAME_ID).unwrap(),
            Some(utf16_be("Alpha").as_slice()),
        );
        assert_eq!(name.string_bytes(STYLE_NAME_ID).unwrap(), None);
    }

    #[test]
    fn duplicate_name_id_last_record_wins() {
        let table = name_table(&[
            NameEntry::microsoft(FULL_NAME_ID, "First"),
            NameEntry::microsoft(FULL_NAME_ID, "Second"),
        ]);
        let name = read(&table).unwrap();
        assert_eq!(
            name.string_bytes(FULL_NAME_ID).unwrap(),
            Some(utf16_be("Second").as_slice()),
        );
    }

    #[test]
    fn empty_table_has_no_records() {
        let table = name_table(&[]);
        let name = read(&table).unwrap();
        assert!(name.is_empty());
        assert_eq!(name.string_bytes(FAMILY_NAME_ID).unwrap(), None);
    }

    #[test]
    fn rejects_records_past_table_end() {
        let mut table = name_table(&[NameEntry::microsoft(FAMILY_NAME_ID, "Alpha")]);
        // claim more records than the table holds
        table[3] = 40;
        assert_eq!(
            read(&table).unwrap_err(),
            ParseError::MalformedData("name records exceed the name table"),
        );
    }

    #[test]
    fn rejects_odd_string_length() {
        let mut table = name_table(&[NameEntry::microsoft(FAMILY_NAME_ID, "Alpha")]);
        // corrupt the record's declared length
        table[HEADER_LEN + 9] += 1;
        let name = read(&table).unwrap();
        assert_eq!(
            name.string_bytes(FAMILY_NAME_ID),
            Err(ParseError::MalformedData("odd name string length")),
        );
    }

    #[test]
    fn rejects_string_past_table_end() {
        let mut table = name_table(&[NameEntry::microsoft(FAMILY_NAME_ID, "Alpha")]);
        table[HEADER_LEN + 9] += 2;
        let name = read(&table).unwrap();
        assert_eq!(
            name.string_bytes(FAMILY_NAME_ID),
            Err(ParseError::TruncatedFont),
        );
    }

    #[test]
    fn rejects_short_header() {
        assert_eq!(read(&[0, 0, 0]).unwrap_err(), ParseError::TableTooShort(TAG));
    }
}
