//! Configuration types for a diagram build.
//!
//! All build behaviour is controlled through [`BuildConfig`], built via its
//! [`BuildConfigBuilder`]. The defaults reproduce the fixed rendering setup
//! used for slide decks: a 1400×1000 canvas, transparent background and the
//! `default` Mermaid theme, rendered by `mmdc`.

use crate::error::BuildError;
use crate::pipeline::render::DiagramRenderer;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default renderer program (Mermaid CLI).
pub const DEFAULT_RENDERER: &str = "mmdc";
/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1400;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 1000;
/// Default background colour passed to the renderer.
pub const DEFAULT_BACKGROUND: &str = "transparent";
/// Default fence info string identifying diagram blocks.
pub const DEFAULT_LANGUAGE: &str = "mermaid";

/// Configuration for a Markdown diagram build.
///
/// Built via [`BuildConfig::builder()`] or using [`BuildConfig::default()`].
///
/// # Example
/// ```rust
/// use mermaid2img::{BuildConfig, Theme};
///
/// let config = BuildConfig::builder()
///     .width(1600)
///     .theme(Theme::Dark)
///     .build()
///     .unwrap();
/// assert_eq!(config.height, 1000);
/// ```
#[derive(Clone)]
pub struct BuildConfig {
    /// Program invoked for each diagram. Default: `mmdc`.
    ///
    /// Ignored when [`BuildConfig::renderer`] is set.
    pub renderer_command: String,

    /// Pre-constructed renderer. Takes precedence over `renderer_command`.
    pub renderer: Option<Arc<dyn DiagramRenderer>>,

    /// Canvas width in pixels. Default: 1400.
    pub width: u32,

    /// Canvas height in pixels. Default: 1000.
    pub height: u32,

    /// Background colour handed to the renderer. Default: `transparent`.
    pub background: String,

    /// Mermaid theme. Default: [`Theme::Default`].
    pub theme: Theme,

    /// Fence info string that marks a diagram block. Default: `mermaid`.
    pub language: String,

    /// Optional progress callback for per-diagram events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            renderer_command: DEFAULT_RENDERER.to_string(),
            renderer: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND.to_string(),
            theme: Theme::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("renderer_command", &self.renderer_command)
            .field("renderer", &self.renderer.as_ref().map(|_| "<dyn DiagramRenderer>"))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("theme", &self.theme)
            .field("language", &self.language)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BuildProgressCallback>"),
            )
            .finish()
    }
}

impl BuildConfig {
    /// Create a new builder for `BuildConfig`.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BuildConfig`].
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl fmt::Debug for BuildConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl BuildConfigBuilder {
    pub fn renderer_command(mut self, program: impl Into<String>) -> Self {
        self.config.renderer_command = program.into();
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn DiagramRenderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn width(mut self, px: u32) -> Self {
        self.config.width = px;
        self
    }

    pub fn height(mut self, px: u32) -> Self {
        self.config.height = px;
        self
    }

    pub fn background(mut self, colour: impl Into<String>) -> Self {
        self.config.background = colour.into();
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Attach a progress callback to receive per-diagram events.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BuildConfig, BuildError> {
        let c = &self.config;
        if c.width == 0 || c.height == 0 {
            return Err(BuildError::InvalidConfig(format!(
                "Canvas must be at least 1×1 px, got {}×{}",
                c.width, c.height
            )));
        }
        if c.renderer.is_none() && c.renderer_command.trim().is_empty() {
            return Err(BuildError::InvalidConfig(
                "Renderer command must not be empty".into(),
            ));
        }
        if c.background.trim().is_empty() {
            return Err(BuildError::InvalidConfig(
                "Background must not be empty".into(),
            ));
        }
        let lang = c.language.trim();
        if lang.is_empty() || lang.chars().any(char::is_whitespace) {
            return Err(BuildError::InvalidConfig(format!(
                "Fence language must be a single word, got {:?}",
                c.language
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Mermaid theme passed to the renderer via `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Mermaid's stock theme. (default)
    #[default]
    Default,
    /// Green palette.
    Forest,
    /// Light strokes on a dark canvas.
    Dark,
    /// Greyscale, suited to print.
    Neutral,
}

impl Theme {
    /// The name the Mermaid CLI expects for this theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Forest => "forest",
            Theme::Dark => "dark",
            Theme::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_slide_setup() {
        let c = BuildConfig::default();
        assert_eq!(c.renderer_command, "mmdc");
        assert_eq!((c.width, c.height), (1400, 1000));
        assert_eq!(c.background, "transparent");
        assert_eq!(c.theme, Theme::Default);
        assert_eq!(c.language, "mermaid");
        assert!(c.renderer.is_none());
    }

    #[test]
    fn builder_rejects_zero_canvas() {
        let err = BuildConfig::builder().width(0).build().unwrap_err();
        assert!(err.to_string().contains("0×1000"), "got: {err}");
    }

    #[test]
    fn builder_rejects_empty_command() {
        assert!(BuildConfig::builder().renderer_command("  ").build().is_err());
    }

    #[test]
    fn builder_rejects_multiword_language() {
        assert!(BuildConfig::builder().language("mer maid").build().is_err());
        assert!(BuildConfig::builder().language("").build().is_err());
    }

    #[test]
    fn theme_names() {
        assert_eq!(Theme::Forest.to_string(), "forest");
        assert_eq!(Theme::Neutral.as_str(), "neutral");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
