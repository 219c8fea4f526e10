//! The [head (Font Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use font_types::Tag;

use crate::error::ParseError;
use crate::font_data::FontData;

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// Offset of `checkSumAdjustment` within the table.
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
/// The fields through `checkSumAdjustment` must be present.
const MIN_TABLE_LEN: usize = 12;

/// The part of the `head` table carried into an EOT header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    checksum_adjustment: u32,
}

impl Head {
    /// Read the table from its declared-length data.
    pub fn read(data: FontData) -> Result<Self, ParseError> {
        if data.len() < MIN_TABLE_LEN {
            return Err(ParseError::TableTooShort(TAG));
        }
        Ok(Head {
            checksum_adjustment: data.read_at(CHECKSUM_ADJUSTMENT_OFFSET)?,
        })
    }

    /// The whole-font checksum adjustment.
    pub fn checksum_adjustment(&self) -> u32 {
        self.checksum_adjustment
    }
}
