//! Result types returned by a build.

use crate::error::{BuildError, DiagramError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of rendering a single diagram block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramResult {
    /// 1-based position of the block in the document.
    pub index: usize,
    /// Image path relative to the document directory, set on success.
    pub image_path: Option<String>,
    /// Why the diagram was left in place, set on failure.
    pub error: Option<DiagramError>,
    /// Wall-clock time spent on this diagram.
    pub duration_ms: u64,
}

impl DiagramResult {
    pub fn is_rendered(&self) -> bool {
        self.error.is_none() && self.image_path.is_some()
    }
}

/// Aggregate counters for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    pub total_diagrams: usize,
    pub rendered: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Everything a build produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutput {
    /// The document that was read.
    pub input_path: PathBuf,
    /// The rewritten document that was written.
    pub output_path: PathBuf,
    /// Directory holding the rendered images.
    pub diagrams_dir: PathBuf,
    /// Rewritten document text, as written to `output_path`.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub markdown: String,
    /// Per-diagram outcomes, in document order.
    pub diagrams: Vec<DiagramResult>,
    pub stats: BuildStats,
}

impl BuildOutput {
    /// Treat any failed diagram as an error.
    ///
    /// Returns the first [`DiagramError`] when at least one diagram failed.
    pub fn into_result(self) -> Result<Self, BuildError> {
        let first_error = self
            .diagrams
            .iter()
            .find_map(|d| d.error.as_ref())
            .map(ToString::to_string);

        match first_error {
            Some(first_error) => Err(BuildError::PartialFailure {
                rendered: self.stats.rendered,
                failed: self.stats.failed,
                total: self.stats.total_diagrams,
                first_error,
            }),
            None => Ok(self),
        }
    }
}
