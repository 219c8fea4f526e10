//! The icon build manifest: JSON in, JSON out, missing codepoints filled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codepoints::CodepointAllocator;

/// An error while reading or updating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid codepoint `{0}`")]
    InvalidCodepoint(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One icon entry. `code` is a hex string such as `"0xf101"`, or absent
/// for icons that still need a codepoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The icon-font build manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconManifest {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub prefix: String,
    pub icons: Vec<Icon>,
}

impl IconManifest {
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// Assign codepoints to icons that lack one, starting at `first`.
    ///
    /// Existing assignments are never changed; new ones skip every code
    /// already present in the manifest as well as codes handed out earlier
    /// in this pass. Returns how many icons were filled in.
    pub fn assign_codepoints(&mut self, first: u32) -> Result<usize, ManifestError> {
        let mut assigned = Vec::new();
        for icon in &self.icons {
            if let Some(code) = &icon.code {
                assigned.push(parse_code(code)?);
            }
        }
        let mut allocator = CodepointAllocator::new(first, assigned);

        let mut filled = 0;
        for icon in &mut self.icons {
            if icon.code.is_none() {
                icon.code = Some(format_code(allocator.allocate()));
                filled += 1;
            }
        }
        Ok(filled)
    }
}

/// Parse a manifest codepoint, with or without its `0x` prefix.
pub fn parse_code(code: &str) -> Result<u32, ManifestError> {
    let digits = code.strip_prefix("0x").unwrap_or(code);
    u32::from_str_radix(digits, 16).map_err(|_| ManifestError::InvalidCodepoint(code.to_owned()))
}

fn format_code(code: u32) -> String {
    format!("0x{code:04x}")
}
