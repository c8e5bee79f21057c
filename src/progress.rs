//! Progress-callback trait for per-diagram build events.
//!
//! Inject an [`Arc<dyn BuildProgressCallback>`] via
//! [`crate::config::BuildConfigBuilder::progress_callback`] to receive events
//! as the pipeline renders each diagram. The CLI uses this to draw its
//! progress bar and per-diagram log lines.
//!
//! # Example
//!
//! ```rust
//! use mermaid2img::{BuildConfig, BuildProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl BuildProgressCallback for CountingCallback {
//!     fn on_diagram_complete(&self, index: usize, total: usize, image_path: &str) {
//!         self.rendered.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Diagram {}/{} -> {}", index, total, image_path);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { rendered: AtomicUsize::new(0) });
//!
//! let config = BuildConfig::builder()
//!     .progress_callback(counter as Arc<dyn BuildProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the build pipeline as it processes each diagram.
///
/// Diagrams are processed strictly in document order on one thread, but the
/// pipeline itself runs on a blocking worker thread, so implementations must
/// be `Send + Sync`. All methods default to no-ops.
pub trait BuildProgressCallback: Send + Sync {
    /// Called once after extraction, before any diagram is rendered.
    ///
    /// # Arguments
    /// * `total`: number of diagram blocks found (may be zero)
    fn on_build_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before the renderer is invoked for a diagram.
    fn on_diagram_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when a diagram rendered successfully.
    ///
    /// # Arguments
    /// * `index`: 1-based diagram index
    /// * `total`: total diagrams in the document
    /// * `image_path`: image path relative to the document directory
    fn on_diagram_complete(&self, index: usize, total: usize, image_path: &str) {
        let _ = (index, total, image_path);
    }

    /// Called when a diagram failed; its source stays in the document.
    fn on_diagram_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every diagram has been attempted.
    fn on_build_complete(&self, total: usize, rendered: usize) {
        let _ = (total, rendered);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BuildProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BuildConfig`].
pub type ProgressCallback = Arc<dyn BuildProgressCallback>;
