//! Synthetic font blobs shared between the eotlite crates' tests.

/// A bogus SFNT signature followed by an otherwise plausible header.
#[rustfmt::skip]
pub static BAD_VERSION: &[u8] = &[
    0xDE, 0xAD, 0xBE, 0xEF, // not an sfnt signature
    0x00, 0x00,             // numTables
    0x00, 0x00,             // searchRange
    0x00, 0x00,             // entrySelector
    0x00, 0x00,             // rangeShift
];

/// Assemble a single-font SFNT file from `(tag, table data)` pairs.
///
/// Tables are laid out back to back in the given order, directly after the
/// directory, with correct offsets and lengths. Checksums are left at zero.
pub fn sfnt_font(tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(num_tables);

    let mut font = Vec::new();
    font.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // TrueType sfnt version
    font.extend_from_slice(&num_tables.to_be_bytes());
    font.extend_from_slice(&search_range.to_be_bytes());
    font.extend_from_slice(&entry_selector.to_be_bytes());
    font.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = 12 + tables.len() * 16;
    for (tag, data) in tables {
        font.extend_from_slice(*tag);
        font.extend_from_slice(&0u32.to_be_bytes()); // checksum
        font.extend_from_slice(&(offset as u32).to_be_bytes());
        font.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += data.len();
    }
    for (_, data) in tables {
        font.extend_from_slice(data);
    }
    font
}

fn search_params(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;
    (search_range, entry_selector, num_tables * 16 - search_range)
}

/// A 54-byte `head` table with the given checksum adjustment.
pub fn head_table(checksum_adjustment: u32) -> Vec<u8> {
    let mut head = Vec::with_capacity(54);
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
    head.extend_from_slice(&checksum_adjustment.to_be_bytes());
    head.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magicNumber
    head.resize(54, 0);
    head[18] = 0x03; // unitsPerEm = 1000
    head[19] = 0xE8;
    head
}

/// Inputs for a synthetic `OS/2` table.
#[derive(Debug, Clone)]
pub struct Os2Params {
    pub weight_class: u16,
    pub fs_type: u16,
    pub panose: [u8; 10],
    pub unicode_range: [u32; 4],
    pub fs_selection: u16,
    pub code_page_range: [u32; 2],
}

impl Default for Os2Params {
    fn default() -> Self {
        Os2Params {
            weight_class: 400,
            fs_type: 0,
            panose: [2, 0, 5, 3, 0, 0, 0, 0, 0, 0],
            unicode_range: [1, 0, 0, 0],
            fs_selection: 0x0040, // REGULAR
            code_page_range: [1, 0],
        }
    }
}

/// A version-4 `OS/2` table, 86 bytes through `ulCodePageRange2`.
pub fn os2_table(params: &Os2Params) -> Vec<u8> {
    let mut os2 = vec![0u8; 86];
    os2[1] = 4; // version
    os2[4..6].copy_from_slice(&params.weight_class.to_be_bytes());
    os2[8..10].copy_from_slice(&params.fs_type.to_be_bytes());
    os2[32..42].copy_from_slice(&params.panose);
    for (i, range) in params.unicode_range.iter().enumerate() {
        os2[42 + i * 4..46 + i * 4].copy_from_slice(&range.to_be_bytes());
    }
    os2[58..62].copy_from_slice(b"TEST"); // achVendID
    os2[62..64].copy_from_slice(&params.fs_selection.to_be_bytes());
    for (i, range) in params.code_page_range.iter().enumerate() {
        os2[78 + i * 4..82 + i * 4].copy_from_slice(&range.to_be_bytes());
    }
    os2
}

/// One record for a synthetic `name` table.
#[derive(Debug, Clone)]
pub struct NameEntry {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub string: Vec<u8>,
}

impl NameEntry {
    /// A Microsoft-platform, Unicode-BMP, US-English record.
    pub fn microsoft(name_id: u16, text: &str) -> Self {
        NameEntry {
            platform_id: 3,
            encoding_id: 1,
            language_id: 0x0409,
            name_id,
            string: utf16_be(text),
        }
    }
}

/// Encode `text` as UTF-16BE bytes.
pub fn utf16_be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// A format-0 `name` table holding the given records in order.
pub fn name_table(entries: &[NameEntry]) -> Vec<u8> {
    let storage_offset = 6 + entries.len() * 12;
    let mut table = Vec::new();
    table.extend_from_slice(&0u16.to_be_bytes()); // format
    table.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    table.extend_from_slice(&(storage_offset as u16).to_be_bytes());

    let mut storage = Vec::new();
    for entry in entries {
        table.extend_from_slice(&entry.platform_id.to_be_bytes());
        table.extend_from_slice(&entry.encoding_id.to_be_bytes());
        table.extend_from_slice(&entry.language_id.to_be_bytes());
        table.extend_from_slice(&entry.name_id.to_be_bytes());
        table.extend_from_slice(&(entry.string.len() as u16).to_be_bytes());
        table.extend_from_slice(&(storage.len() as u16).to_be_bytes());
        storage.extend_from_slice(&entry.string);
    }
    table.extend_from_slice(&storage);
    table
}

/// The smallest font the EOT builder accepts: head, name and OS/2 only,
/// an empty name table, and no glyph data.
pub fn minimal_font() -> Vec<u8> {
    let head = head_table(0xB1B0_AFBA);
    let name = name_table(&[]);
    let os2 = os2_table(&Os2Params::default());
    sfnt_font(&[(b"OS/2", &os2), (b"head", &head), (b"name", &name)])
}

/// A font with a full set of Microsoft/US-English names, bold weight and
/// the italic selection bit set, plus a small dummy glyph table.
pub fn sample_font() -> Vec<u8> {
    let head = head_table(0x4F1E_77C3);
    let os2 = os2_table(&Os2Params {
        weight_class: 700,
        fs_type: 0x0004,
        unicode_range: [0x0000_0003, 0, 0, 0],
        fs_selection: 0x0021, // ITALIC | BOLD
        ..Default::default()
    });
    let name = name_table(&[
        NameEntry::microsoft(1, "Test Family"),
        NameEntry::microsoft(2, "Bold Italic"),
        NameEntry::microsoft(4, "Test Family Bold Italic"),
        NameEntry::microsoft(5, "Version 1.0"),
        // a Macintosh record the EOT path must ignore
        NameEntry {
            platform_id: 1,
            encoding_id: 0,
            language_id: 0,
            name_id: 1,
            string: b"Mac Family".to_vec(),
        },
    ]);
    let glyf = [0u8; 16];
    sfnt_font(&[
        (b"OS/2", &os2),
        (b"glyf", &glyf),
        (b"head", &head),
        (b"name", &name),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_match_directory_formula() {
        // from the table directory definition: searchRange is the maximum
        // power of two <= numTables, times sixteen
        assert_eq!(search_params(1), (16, 0, 0));
        assert_eq!(search_params(3), (32, 1, 16));
        assert_eq!(search_params(4), (64, 2, 0));
        assert_eq!(search_params(22), (256, 4, 96));
    }

    #[test]
    fn tables_are_where_the_directory_says() {
        let head = head_table(7);
        let name = name_table(&[]);
        let font = sfnt_font(&[(b"head", &head), (b"name", &name)]);
        // first table directly follows the 12 + 2*16 byte directory
        assert_eq!(&font[44..44 + head.len()], head.as_slice());
        assert_eq!(&font[44 + head.len()..], name.as_slice());
    }
}
