//! Errors produced while reading font data

use std::fmt;

use font_types::Tag;

/// An error that occurs when reading font data.
///
/// All variants are fatal for the font that produced them; a caller
/// processing a batch of fonts should report the error and move on to the
/// next font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The data does not begin with a recognized SFNT signature.
    InvalidFontFormat(u32),
    /// A declared count or offset would read past the end of the data.
    TruncatedFont,
    /// One of the tables the EOT header draws from is absent.
    MissingRequiredTable(Tag),
    /// A table's declared length is smaller than its fixed fields.
    TableTooShort(Tag),
    /// The data is structurally inconsistent.
    MalformedData(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidFontFormat(version) => {
                write!(f, "invalid sfnt version 0x{version:08X}")
            }
            ParseError::TruncatedFont => write!(f, "font data is truncated"),
            ParseError::MissingRequiredTable(tag) => {
                write!(f, "missing required table '{tag}'")
            }
            ParseError::TableTooShort(tag) => {
                write!(f, "the '{tag}' table is too short for its fixed fields")
            }
            ParseError::MalformedData(msg) => write!(f, "malformed data: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}
