//! Pipeline stages for a diagram build.
//!
//! Each submodule implements one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ render (per block) ──▶ rewrite
//! (paths)    (regex)     (scratch + mmdc)       (string replace)
//! ```
//!
//! 1. [`input`]: validate the document path and derive the output layout
//! 2. [`extract`]: find fenced diagram blocks, in document order
//! 3. [`render`]: write each block to a scratch file and run the renderer
//! 4. [`rewrite`]: replace rendered blocks with the embed snippet

pub mod extract;
pub mod input;
pub mod render;
pub mod rewrite;
