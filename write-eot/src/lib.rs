//! Building legacy Embedded OpenType (EOT) wrappers
//!
//! An EOT file is a little-endian metadata header followed by the original,
//! unmodified OpenType font. The header is a copy of data from specific
//! tables within the font, so building one is a parse-then-pack operation:
//! [`read_sfnt`] extracts the `head`, `name` and `OS/2` fields, and
//! [`EotHeader`] packs them.
//!
//! The produced fonts carry an empty root string, leaving them unrestricted
//! in the domains they may be used from.
//!
//! # Example
//!
//! ```no_run
//! # let path = std::path::Path::new("icons.ttf");
//! let font_bytes = std::fs::read(path).unwrap();
//! let eot = write_eot::wrap_font(&font_bytes).expect("failed to build EOT");
//! std::fs::write(write_eot::eot_file_name(path), eot).unwrap();
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod header;

pub use header::{
    EotHeader, EOT_DEFAULT_CHARSET, EOT_MAGIC_NUMBER, EOT_VERSION, FIXED_HEADER_LEN,
};

/// Public re-export of the parsing crate.
pub use read_sfnt as read;

use std::path::{Path, PathBuf};

use read_sfnt::{ParseError, SfntFont};

/// Synthesize the EOT header for `font_blob`.
///
/// The returned bytes are the header only; concatenating them with the
/// unchanged `font_blob` yields the complete EOT file (see [`wrap_font`]).
/// Errors are fatal for this font and leave nothing written; independent
/// fonts can keep being processed.
pub fn build_header(font_blob: &[u8]) -> Result<Vec<u8>, ParseError> {
    let font = SfntFont::new(font_blob)?;
    let header = EotHeader::from_font(&font)?;
    Ok(header.dump())
}

/// The complete EOT file: synthesized header followed by the font bytes.
pub fn wrap_font(font_blob: &[u8]) -> Result<Vec<u8>, ParseError> {
    let mut eot = build_header(font_blob)?;
    eot.extend_from_slice(font_blob);
    Ok(eot)
}

/// The output name for a converted font: the input with an `eot` extension.
pub fn eot_file_name(path: &Path) -> PathBuf {
    path.with_extension("eot")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn wrapped_font_round_trips() {
        let bytes = eot_test_data::sample_font();
        let eot = wrap_font(&bytes).unwrap();
        let eot_size = u32::from_le_bytes(eot[0..4].try_into().unwrap());
        assert_eq!(eot_size as usize, eot.len());
        // the trailing region is the original font, byte for byte
        let header_len = eot.len() - bytes.len();
        assert_eq!(&eot[header_len..], bytes.as_slice());
        assert!(SfntFont::new(&eot[header_len..]).is_ok());
    }

    #[test]
    fn header_errors_produce_no_output() {
        assert_eq!(
            build_header(eot_test_data::BAD_VERSION),
            Err(ParseError::InvalidFontFormat(0xDEADBEEF)),
        );
        let os2 = eot_test_data::os2_table(&Default::default());
        let name = eot_test_data::name_table(&[]);
        let missing_head = eot_test_data::sfnt_font(&[(b"OS/2", &os2), (b"name", &name)]);
        assert!(matches!(
            build_header(&missing_head),
            Err(ParseError::MissingRequiredTable(_)),
        ));
    }

    #[test]
    fn eot_file_name_replaces_extension() {
        assert_eq!(
            eot_file_name(Path::new("fonts/ionicons.ttf")),
            PathBuf::from("fonts/ionicons.eot"),
        );
        assert_eq!(
            eot_file_name(Path::new("bare")),
            PathBuf::from("bare.eot"),
        );
    }
}
