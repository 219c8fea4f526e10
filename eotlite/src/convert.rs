//! One-font conversion: read the font, wrap it, write the EOT file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use write_eot::read::ParseError;

/// An error converting a single font. The rest of a batch is unaffected.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Font(#[from] ParseError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convert `font_path`, writing next to it unless `output` overrides the
/// destination. Returns the path written.
///
/// A failed conversion writes nothing.
pub fn convert_font(font_path: &Path, output: Option<&Path>) -> Result<PathBuf, ConvertError> {
    let data = std::fs::read(font_path).map_err(|source| ConvertError::Read {
        path: font_path.to_owned(),
        source,
    })?;
    let eot = write_eot::wrap_font(&data)?;
    let out_path = match output {
        Some(path) => path.to_owned(),
        None => write_eot::eot_file_name(font_path),
    };
    std::fs::write(&out_path, eot).map_err(|source| ConvertError::Write {
        path: out_path.clone(),
        source,
    })?;
    Ok(out_path)
}
