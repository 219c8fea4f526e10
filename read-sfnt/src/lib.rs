//! Reading OpenType font data
//!
//! This crate provides memory safe, bounds-checked parsing of the small
//! slice of an OpenType/TrueType file that an EOT wrapper header is built
//! from: the table directory and the `head`, `name` and `OS/2` tables.
//!
//! Parsing is zero-allocation apart from the table directory itself, which
//! is scanned once into an immutable tag-keyed map with every record's
//! extent validated up front; everything after that indexes into
//! already-validated ranges.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use read_sfnt::SfntFont;
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = SfntFont::new(&font_bytes).expect("failed to read font data");
//! let os2 = font.os2().expect("missing 'OS/2' table");
//!
//! println!("weight class {}", os2.weight_class());
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod font_data;
mod table_directory;
pub mod tables;

pub use error::ParseError;
pub use font_data::{Cursor, FontData, ReadScalar};
pub use table_directory::{
    TableDirectory, TableRecord, APPLE_SFNT_VERSION, CFF_SFNT_VERSION, TT_SFNT_VERSION,
};

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

use font_types::Tag;

use tables::{head::Head, name::Name, os2::Os2};

/// Reference to an in-memory font.
///
/// Holds the parsed table directory alongside the raw data; table accessors
/// return views whose extents were validated when the directory was read.
#[derive(Debug, Clone)]
pub struct SfntFont<'a> {
    data: FontData<'a>,
    sfnt_version: u32,
    table_directory: TableDirectory,
}

impl<'a> SfntFont<'a> {
    /// Parse the SFNT header and table directory from `data`.
    ///
    /// The data must be a single font (not a collection) beginning with one
    /// of the recognized SFNT signatures.
    pub fn new(data: &'a [u8]) -> Result<Self, ParseError> {
        let data = FontData::new(data);
        let (sfnt_version, table_directory) = TableDirectory::read(data)?;
        Ok(SfntFont {
            data,
            sfnt_version,
            table_directory,
        })
    }

    /// The declared SFNT version.
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// The parsed table directory.
    pub fn table_directory(&self) -> &TableDirectory {
        &self.table_directory
    }

    /// The underlying font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// The data for the table with the specified tag, if present.
    ///
    /// The returned view is exactly the table's declared length.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.table_directory.get(tag)?;
        let start = record.offset as usize;
        self.data.slice(start..start + record.length as usize)
    }

    /// The `head` table.
    pub fn head(&self) -> Result<Head, ParseError> {
        let data = self
            .table_data(tables::head::TAG)
            .ok_or(ParseError::MissingRequiredTable(tables::head::TAG))?;
        Head::read(data)
    }

    /// The `name` table.
    pub fn name(&self) -> Result<Name<'a>, ParseError> {
        let data = self
            .table_data(tables::name::TAG)
            .ok_or(ParseError::MissingRequiredTable(tables::name::TAG))?;
        Name::read(data)
    }

    /// The `OS/2` table.
    pub fn os2(&self) -> Result<Os2, ParseError> {
        let data = self
            .table_data(tables::os2::TAG)
            .ok_or(ParseError::MissingRequiredTable(tables::os2::TAG))?;
        Os2::read(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_font() {
        let bytes = eot_test_data::minimal_font();
        let font = SfntFont::new(&bytes).unwrap();
        assert_eq!(font.sfnt_version(), TT_SFNT_VERSION);
        assert_eq!(font.table_directory().len(), 3);
        assert_eq!(font.head().unwrap().checksum_adjustment(), 0xB1B0AFBA);
        assert_eq!(font.os2().unwrap().weight_class(), 400);
        assert!(font.name().unwrap().is_empty());
    }

    #[test]
    fn table_data_has_declared_length() {
        let bytes = eot_test_data::minimal_font();
        let font = SfntFont::new(&bytes).unwrap();
        let os2 = font.table_data(tables::os2::TAG).unwrap();
        assert_eq!(os2.len(), 86);
        assert!(font.table_data(Tag::new(b"glyf")).is_none());
    }

    #[test]
    fn missing_table_is_reported_by_tag() {
        let head = eot_test_data::head_table(0);
        let bytes = eot_test_data::sfnt_font(&[(b"head", &head)]);
        let font = SfntFont::new(&bytes).unwrap();
        assert_eq!(
            font.os2(),
            Err(ParseError::MissingRequiredTable(tables::os2::TAG)),
        );
    }
}
