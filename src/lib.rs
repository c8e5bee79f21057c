//! # mermaid2img
//!
//! Render the Mermaid diagrams embedded in a Markdown document to SVG files
//! and rewrite the document to reference the images instead.
//!
//! Slide tools such as Marp render Markdown and HTML but not Mermaid. This
//! crate turns a deck written with inline ```` ```mermaid ```` blocks into a
//! `.build` copy those tools can consume directly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notes.md
//!  │
//!  ├─ 1. Input    validate the path, derive output paths
//!  ├─ 2. Extract  find ```mermaid fences (document order, non-greedy)
//!  ├─ 3. Render   per block: scratch .mmd → `mmdc` → diagrams/diagram-N.svg
//!  ├─ 4. Rewrite  replace each rendered block with an <img> snippet
//!  └─ 5. Output   notes.build.md (input left untouched)
//! ```
//!
//! A diagram that fails to render is reported and left in the document as
//! Mermaid source; the rest of the build carries on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mermaid2img::{build, BuildConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = build("slides.md", &BuildConfig::default()).await?;
//!     eprintln!(
//!         "{}/{} diagrams rendered → {}",
//!         output.stats.rendered,
//!         output.stats.total_diagrams,
//!         output.output_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mermaid2img` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod build;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use build::{build, build_document, build_sync};
pub use config::{BuildConfig, BuildConfigBuilder, Theme};
pub use error::{BuildError, DiagramError};
pub use output::{BuildOutput, BuildStats, DiagramResult};
pub use pipeline::extract::{extract_blocks, BlockExtractor, DiagramBlock};
pub use pipeline::input::{resolve_input, BuildLayout};
pub use pipeline::render::{DiagramRenderer, MermaidCli, RenderRequest};
pub use progress::{BuildProgressCallback, NoopProgressCallback, ProgressCallback};
