//! Input resolution: validate the document path and derive every path a
//! build touches.
//!
//! All outputs live next to the input document:
//!
//! ```text
//! <dir>/<stem>.<ext>          input (never modified)
//! <dir>/<stem>.build.<ext>    rewritten document
//! <dir>/diagrams/             rendered images
//! <dir>/.scratch-temp/        scratch sources, removed after the run
//! ```

use crate::error::BuildError;
use crate::templates::{BUILD_MARKER, DIAGRAMS_DIR, SCRATCH_DIR};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths used by one build, derived from the input path alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    /// The input document as given.
    pub input: PathBuf,
    /// Directory containing the input (empty for a bare file name).
    pub dir: PathBuf,
    /// Input file name without its extension.
    pub stem: String,
    /// Input extension without the dot, if any.
    pub extension: Option<String>,
    /// `<dir>/diagrams`
    pub diagrams_dir: PathBuf,
    /// `<dir>/.scratch-temp`
    pub scratch_dir: PathBuf,
    /// `<dir>/<stem>.build.<ext>`
    pub output: PathBuf,
}

impl BuildLayout {
    /// Derive the layout for `input` without touching the filesystem.
    pub fn for_input(input: impl AsRef<Path>) -> Self {
        let input = input.as_ref().to_path_buf();
        let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = input
            .extension()
            .map(|e| e.to_string_lossy().into_owned());

        let output_name = match &extension {
            Some(ext) => format!("{stem}.{BUILD_MARKER}.{ext}"),
            None => format!("{stem}.{BUILD_MARKER}"),
        };

        Self {
            diagrams_dir: dir.join(DIAGRAMS_DIR),
            scratch_dir: dir.join(SCRATCH_DIR),
            output: dir.join(output_name),
            input,
            dir,
            stem,
            extension,
        }
    }
}

/// Validate that `input` is a readable regular file and return its layout.
pub fn resolve_input(input: impl AsRef<Path>) -> Result<BuildLayout, BuildError> {
    let path = input.as_ref().to_path_buf();

    if !path.exists() {
        return Err(BuildError::FileNotFound { path });
    }
    if !path.is_file() {
        return Err(BuildError::NotAFile { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(BuildError::PermissionDenied { path });
        }
        Err(e) => {
            return Err(BuildError::ReadFailed { path, source: e });
        }
    }

    debug!("Resolved input document: {}", path.display());
    Ok(BuildLayout::for_input(path))
}
