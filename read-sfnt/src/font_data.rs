//! raw font bytes

use std::ops::RangeBounds;

use font_types::Tag;

use crate::error::ParseError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice that provides bounds-checked
/// reads of the big-endian scalars an SFNT file is made of.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for reading consecutive values out of [`FontData`].
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

/// A scalar that can be read from big-endian font data.
pub trait ReadScalar: Sized {
    /// The encoded length of this type, in bytes.
    const RAW_BYTE_LEN: usize;

    /// Attempt to read `Self` from the front of `bytes`.
    ///
    /// Returns `None` if fewer than [`Self::RAW_BYTE_LEN`] bytes are
    /// available.
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty) => {
        impl ReadScalar for $ty {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<$ty>();

            fn read(bytes: &[u8]) -> Option<Self> {
                bytes
                    .get(..Self::RAW_BYTE_LEN)
                    .map(|raw| <$ty>::from_be_bytes(raw.try_into().unwrap()))
            }
        }
    };
}

int_scalar!(u8);
int_scalar!(u16);
int_scalar!(u32);

impl ReadScalar for Tag {
    const RAW_BYTE_LEN: usize = 4;

    fn read(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(Tag::new(&raw))
    }
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The sub-range of the data described by `range`, if it is in bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    /// Read a scalar at the given offset.
    pub fn read_at<T: ReadScalar>(&self, offset: usize) -> Result<T, ParseError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ParseError::TruncatedFont)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ParseError::TruncatedFont)
    }

    /// A cursor positioned at the start of the data.
    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    /// Read a scalar and advance past it.
    pub fn read<T: ReadScalar>(&mut self) -> Result<T, ParseError> {
        let result = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        result
    }

    /// Skip over a scalar without decoding it.
    pub fn advance<T: ReadScalar>(&mut self) {
        self.pos += T::RAW_BYTE_LEN;
    }

    /// Skip `n_bytes` bytes.
    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    /// The current offset from the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}
