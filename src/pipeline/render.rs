//! Diagram rendering: hand one block to an external renderer.
//!
//! [`render_block`] writes the block source to its scratch file and asks a
//! [`DiagramRenderer`] to produce the image. The production renderer,
//! [`MermaidCli`], shells out to `mmdc` and blocks until it exits; there is
//! no timeout. Only the exit status is interpreted. Stdout is discarded and
//! stderr is kept for the error message.
//!
//! A failure here is never fatal: the caller records the [`DiagramError`]
//! and moves on to the next block.

use crate::config::{BuildConfig, Theme};
use crate::error::DiagramError;
use crate::pipeline::extract::DiagramBlock;
use crate::pipeline::input::BuildLayout;
use crate::templates::{image_file_name, relative_image_path, scratch_file_name};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Everything a renderer needs to turn one scratch file into one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// 1-based diagram index.
    pub index: usize,
    /// Scratch file holding the diagram source.
    pub source: PathBuf,
    /// Where the image must be written.
    pub target: PathBuf,
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub theme: Theme,
}

/// Converts a diagram source file into an image file.
///
/// Implementations block until the image is written or the attempt failed.
/// Tests substitute stubs; [`MermaidCli`] is used otherwise.
pub trait DiagramRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<(), DiagramError>;
}

/// Renderer backed by the Mermaid CLI (`mmdc`).
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: String,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RENDERER)
    }
}

impl MermaidCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program for `request`.
    ///
    /// Paths are passed through as-is, so directories whose names are not
    /// valid UTF-8 still reach the renderer intact.
    pub fn args(request: &RenderRequest) -> Vec<OsString> {
        vec![
            "-i".into(),
            request.source.clone().into_os_string(),
            "-o".into(),
            request.target.clone().into_os_string(),
            "-b".into(),
            request.background.clone().into(),
            "-t".into(),
            request.theme.as_str().into(),
            "-w".into(),
            request.width.to_string().into(),
            "-H".into(),
            request.height.to_string().into(),
        ]
    }
}

impl DiagramRenderer for MermaidCli {
    fn render(&self, request: &RenderRequest) -> Result<(), DiagramError> {
        let args = Self::args(request);
        debug!(
            "Running {} {}",
            self.program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| DiagramError::RendererUnavailable {
                index: request.index,
                program: self.program.clone(),
                detail: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DiagramError::RendererFailed {
                index: request.index,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Build the render request for `block` under `layout`.
pub fn request_for(block: &DiagramBlock, layout: &BuildLayout, config: &BuildConfig) -> RenderRequest {
    RenderRequest {
        index: block.index,
        source: layout.scratch_dir.join(scratch_file_name(block.index)),
        target: layout.diagrams_dir.join(image_file_name(block.index)),
        width: config.width,
        height: config.height,
        background: config.background.clone(),
        theme: config.theme,
    }
}

/// Write `block` to its scratch file and render it.
///
/// # Returns
/// The image path relative to the document directory (always `/`-separated),
/// ready to be embedded in the rewritten document.
pub fn render_block(
    renderer: &dyn DiagramRenderer,
    block: &DiagramBlock,
    layout: &BuildLayout,
    config: &BuildConfig,
) -> Result<String, DiagramError> {
    let request = request_for(block, layout, config);

    write_scratch(&request.source, &block.source).map_err(|e| {
        DiagramError::ScratchWriteFailed {
            index: block.index,
            path: request.source.display().to_string(),
            detail: e.to_string(),
        }
    })?;

    match renderer.render(&request) {
        Ok(()) => {
            let rel = relative_image_path(block.index);
            info!("Diagram {} rendered → {}", block.index, rel);
            Ok(rel)
        }
        Err(e) => {
            warn!("Diagram {} failed: {}", block.index, e);
            Err(e)
        }
    }
}

fn write_scratch(path: &Path, source: &str) -> std::io::Result<()> {
    std::fs::write(path, source)
}
