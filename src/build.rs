//! Build entry points: turn one Markdown document into its `.build` twin.
//!
//! A build runs strictly in order:
//!
//! ```text
//! resolve ─▶ read ─▶ extract(all) ─▶ for each block { render ─▶ maybe replace } ─▶ write
//! ```
//!
//! Blocks are rendered one at a time. The scratch directory is created fresh
//! for every build and removed when the build ends, whether blocks succeeded,
//! failed, or the build aborted half-way.

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::output::{BuildOutput, BuildStats, DiagramResult};
use crate::pipeline::extract::{BlockExtractor, DiagramBlock};
use crate::pipeline::input::{self, BuildLayout};
use crate::pipeline::render::{self, DiagramRenderer, MermaidCli};
use crate::pipeline::rewrite::{apply_replacements, Replacement};
use crate::templates::SCRATCH_DIR;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Render every diagram in `input` and write `<stem>.build.<ext>` next to it.
///
/// # Returns
/// `Ok(BuildOutput)` once the rewritten document is on disk, even if some
/// diagrams failed (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(BuildError)` only for fatal errors:
/// - File not found / not a file / permission denied
/// - The document is not valid UTF-8
/// - The diagrams or scratch directory cannot be created
/// - The output document cannot be written
pub async fn build(
    input_path: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<BuildOutput, BuildError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting build: {}", input_path.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let layout = input::resolve_input(input_path)?;

    // ── Step 2: Read document ────────────────────────────────────────────
    let markdown = tokio::fs::read_to_string(&layout.input)
        .await
        .map_err(|e| BuildError::ReadFailed {
            path: layout.input.clone(),
            source: e,
        })?;
    debug!("Read {} bytes from {}", markdown.len(), layout.input.display());

    // ── Step 3: Render, rewrite and write (blocking) ─────────────────────
    let config = config.clone();
    let task_layout = layout.clone();
    let (rewritten, diagrams) = tokio::task::spawn_blocking(move || {
        let result = build_document(&markdown, &task_layout, &config)?;
        write_output(&task_layout.output, &result.0)?;
        Ok::<_, BuildError>(result)
    })
    .await
    .map_err(|e| BuildError::Internal(format!("Build task panicked: {}", e)))??;

    // ── Step 4: Compute stats ────────────────────────────────────────────
    let rendered = diagrams.iter().filter(|d| d.is_rendered()).count();
    let stats = BuildStats {
        total_diagrams: diagrams.len(),
        rendered,
        failed: diagrams.len() - rendered,
        duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Build complete: {}/{} diagrams rendered, {}ms total → {}",
        stats.rendered,
        stats.total_diagrams,
        stats.duration_ms,
        layout.output.display()
    );

    Ok(BuildOutput {
        input_path: layout.input,
        output_path: layout.output,
        diagrams_dir: layout.diagrams_dir,
        markdown: rewritten,
        diagrams,
        stats,
    })
}

/// Synchronous wrapper around [`build`].
///
/// Creates a temporary tokio runtime internally.
pub fn build_sync(
    input_path: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<BuildOutput, BuildError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BuildError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(build(input_path, config))
}

/// Render every diagram of `markdown` into `layout` and return the rewritten
/// document with one [`DiagramResult`] per block, in document order.
///
/// Creates `layout.diagrams_dir` if needed and a fresh `layout.scratch_dir`,
/// which is removed again before returning. Does not write the output
/// document.
pub fn build_document(
    markdown: &str,
    layout: &BuildLayout,
    config: &BuildConfig,
) -> Result<(String, Vec<DiagramResult>), BuildError> {
    let extractor = BlockExtractor::new(&config.language)?;
    let renderer = resolve_renderer(config);

    std::fs::create_dir_all(&layout.diagrams_dir).map_err(|e| BuildError::WorkspaceFailed {
        path: layout.diagrams_dir.clone(),
        source: e,
    })?;
    // The TempDir is kept alive until every block has been rendered.
    let scratch = create_scratch_dir(layout)?;

    let blocks: Vec<DiagramBlock> = extractor.blocks(markdown).collect();
    let total = blocks.len();
    info!("Found {} diagram blocks", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_build_start(total);
    }

    let mut results = Vec::with_capacity(total);
    let mut replacements = Vec::with_capacity(total);

    for block in &blocks {
        if let Some(ref cb) = config.progress_callback {
            cb.on_diagram_start(block.index, total);
        }

        let start = Instant::now();
        let outcome = render::render_block(renderer.as_ref(), block, layout, config);
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(image_path) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_diagram_complete(block.index, total, &image_path);
                }
                replacements.push(Replacement::embed(
                    block.original.as_str(),
                    &image_path,
                    block.index,
                ));
                DiagramResult {
                    index: block.index,
                    image_path: Some(image_path),
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_diagram_error(block.index, total, &e.to_string());
                }
                DiagramResult {
                    index: block.index,
                    image_path: None,
                    error: Some(e),
                    duration_ms,
                }
            }
        };
        results.push(result);
    }

    let rewritten = apply_replacements(markdown, &replacements);

    let scratch_path = scratch.path().to_path_buf();
    match scratch.close() {
        Ok(()) => debug!("Removed scratch directory {}", scratch_path.display()),
        Err(e) => warn!(
            "Failed to remove scratch directory {}: {}",
            scratch_path.display(),
            e
        ),
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_build_complete(total, replacements.len());
    }

    Ok((rewritten, results))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Use the injected renderer if there is one, else `mmdc` (or the configured
/// command).
fn resolve_renderer(config: &BuildConfig) -> Arc<dyn DiagramRenderer> {
    match config.renderer {
        Some(ref renderer) => Arc::clone(renderer),
        None => Arc::new(MermaidCli::new(config.renderer_command.clone())),
    }
}

/// Write the rewritten document: temp file next to it, then rename.
fn write_output(path: &Path, markdown: &str) -> Result<(), BuildError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let write_err = |e| BuildError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    std::fs::write(&tmp_path, markdown).map_err(write_err)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    debug!("Wrote {} bytes to {}", markdown.len(), path.display());
    Ok(())
}

/// Create `layout.scratch_dir` empty, wiping leftovers from an interrupted run.
///
/// The returned `TempDir` removes the directory when dropped, including on
/// early return or panic.
fn create_scratch_dir(layout: &BuildLayout) -> Result<TempDir, BuildError> {
    let workspace_err = |e| BuildError::WorkspaceFailed {
        path: layout.scratch_dir.clone(),
        source: e,
    };

    if layout.scratch_dir.exists() {
        std::fs::remove_dir_all(&layout.scratch_dir).map_err(workspace_err)?;
    }

    let parent = if layout.dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        layout.dir.as_path()
    };
    tempfile::Builder::new()
        .prefix(SCRATCH_DIR)
        .rand_bytes(0)
        .tempdir_in(parent)
        .map_err(workspace_err)
}
