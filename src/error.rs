//! Error types for the mermaid2img library.
//!
//! Two error types reflect two failure modes:
//!
//! * [`BuildError`]: **Fatal**. The run cannot proceed at all (missing input
//!   file, unreadable document, output cannot be written). Returned as
//!   `Err(BuildError)` from the top-level `build*` functions.
//!
//! * [`DiagramError`]: **Non-fatal**. A single diagram failed to render but
//!   the rest of the document is fine. Stored inside
//!   [`crate::output::DiagramResult`]; the block keeps its original source in
//!   the rewritten document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mermaid2img library.
///
/// Per-diagram failures use [`DiagramError`] and are stored in
/// [`crate::output::DiagramResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BuildError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File {} not found", .path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r {path:?}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The path exists but is a directory or other non-regular file.
    #[error("'{}' is not a regular file", .path.display())]
    NotAFile { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{}': {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Workspace errors ──────────────────────────────────────────────────
    /// Could not create the diagrams directory or the scratch directory.
    #[error("Failed to prepare directory '{}': {source}", .path.display())]
    WorkspaceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the rewritten Markdown file.
    #[error("Failed to write output file '{}': {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some diagrams rendered but at least one failed.
    ///
    /// Returned by [`crate::output::BuildOutput::into_result`] when the
    /// caller wants to treat any diagram failure as an error.
    #[error("{failed}/{total} diagrams failed to render; first: {first_error}")]
    PartialFailure {
        rendered: usize,
        failed: usize,
        total: usize,
        first_error: String,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single diagram.
///
/// Stored alongside [`crate::output::DiagramResult`] when a diagram fails.
/// The run always continues with the next diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum DiagramError {
    /// The diagram source could not be written to its scratch file.
    #[error("Diagram {index}: failed to write scratch file '{path}': {detail}")]
    ScratchWriteFailed {
        index: usize,
        path: String,
        detail: String,
    },

    /// The renderer program could not be started at all.
    #[error("Diagram {index}: could not run '{program}': {detail}")]
    RendererUnavailable {
        index: usize,
        program: String,
        detail: String,
    },

    /// The renderer ran but exited unsuccessfully.
    #[error("Diagram {index}: renderer exited with {status}{}", stderr_suffix(.stderr))]
    RendererFailed {
        index: usize,
        status: String,
        stderr: String,
    },
}

impl DiagramError {
    /// The 1-based index of the diagram this error belongs to.
    pub fn index(&self) -> usize {
        match self {
            DiagramError::ScratchWriteFailed { index, .. }
            | DiagramError::RendererUnavailable { index, .. }
            | DiagramError::RendererFailed { index, .. } => *index,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
