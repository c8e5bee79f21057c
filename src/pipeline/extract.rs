//! Block extraction: find fenced diagram blocks in a Markdown document.
//!
//! A block starts with a fence line of exactly ```` ```<lang> ```` followed by
//! a newline and ends at the nearest following ```` ``` ````. Matching is
//! non-greedy and non-overlapping; nested fences are not recognised. The
//! document itself is never modified here.

use crate::error::BuildError;
use once_cell::sync::Lazy;
use regex::Regex;

/// One fenced diagram block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// 1-based position among the blocks of the document.
    pub index: usize,
    /// Diagram source with surrounding whitespace trimmed.
    pub source: String,
    /// Exact matched text, fences included. Used as the replacement key.
    pub original: String,
    /// Byte offset of `original` in the scanned document.
    pub start: usize,
}

static RE_MERMAID_FENCE: Lazy<Regex> = Lazy::new(|| fence_regex("mermaid").unwrap());

fn fence_regex(language: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"```{}\n([\s\S]*?)```", regex::escape(language)))
}

/// Compiled matcher for one fence language.
#[derive(Debug, Clone)]
pub struct BlockExtractor {
    pattern: Regex,
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self {
            pattern: RE_MERMAID_FENCE.clone(),
        }
    }
}

impl BlockExtractor {
    /// Matcher for ```` ```<language> ```` fences.
    pub fn new(language: &str) -> Result<Self, BuildError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(BuildError::InvalidConfig(
                "Fence language must not be empty".into(),
            ));
        }
        if language == "mermaid" {
            return Ok(Self::default());
        }
        let pattern = fence_regex(language).map_err(|e| {
            BuildError::InvalidConfig(format!("Bad fence language {language:?}: {e}"))
        })?;
        Ok(Self { pattern })
    }

    /// Lazily yield every block of `markdown` in document order.
    pub fn blocks<'a>(&'a self, markdown: &'a str) -> impl Iterator<Item = DiagramBlock> + 'a {
        self.pattern
            .captures_iter(markdown)
            .enumerate()
            .filter_map(|(i, caps)| {
                let whole = caps.get(0)?;
                let body = caps.get(1)?;
                Some(DiagramBlock {
                    index: i + 1,
                    source: body.as_str().trim().to_string(),
                    original: whole.as_str().to_string(),
                    start: whole.start(),
                })
            })
    }
}

/// Extract Mermaid blocks with the default matcher.
pub fn extract_blocks(markdown: &str) -> Vec<DiagramBlock> {
    BlockExtractor::default().blocks(markdown).collect()
}
