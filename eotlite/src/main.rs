//! Wrap OpenType fonts in EOT headers for legacy consumers.
//!
//! Each input font is converted independently: a font that fails to parse
//! is reported and skipped, and the rest of the batch still runs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use eotlite::manifest::{self, IconManifest, ManifestError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Produce an .eot file for each input font
    Wrap {
        /// Fonts to convert.
        fonts: Vec<PathBuf>,
        /// Output file; only valid with a single input font.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fill in missing icon codepoints in a build manifest
    AssignCodepoints {
        /// The icon manifest (JSON), updated in place.
        manifest: PathBuf,
        /// First candidate codepoint for new assignments.
        #[arg(long, default_value = "0xf100")]
        first: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Wrap { fonts, output } => wrap_fonts(&fonts, output.as_deref()),
        Command::AssignCodepoints { manifest, first } => assign_codepoints(&manifest, &first),
    }
}

fn wrap_fonts(fonts: &[PathBuf], output: Option<&Path>) -> ExitCode {
    if fonts.is_empty() {
        eprintln!("no input fonts");
        return ExitCode::FAILURE;
    }
    if output.is_some() && fonts.len() > 1 {
        eprintln!("--output requires a single input font");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for font_path in fonts {
        match eotlite::convert_font(font_path, output) {
            Ok(written) => log::info!("wrote {}", written.display()),
            Err(e) => {
                eprintln!("{}: {e}", font_path.display());
                failed = true;
            }
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn assign_codepoints(manifest_path: &Path, first: &str) -> ExitCode {
    match try_assign(manifest_path, first) {
        Ok(filled) => {
            println!("assigned {filled} codepoint(s)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", manifest_path.display());
            ExitCode::FAILURE
        }
    }
}

fn try_assign(manifest_path: &Path, first: &str) -> Result<usize, ManifestError> {
    let first = manifest::parse_code(first)?;
    let text = std::fs::read_to_string(manifest_path)?;
    let mut manifest = IconManifest::from_json(&text)?;
    let filled = manifest.assign_codepoints(first)?;
    std::fs::write(manifest_path, manifest.to_json()?)?;
    Ok(filled)
}
