//! Document rewriting: swap rendered blocks for their embed snippets.
//!
//! Replacements are keyed on the exact original block text rather than on
//! byte offsets, so earlier replacements (which change the document length)
//! never invalidate later ones. Each replacement hits only the first
//! remaining occurrence of its block text.

use crate::templates::embed_snippet;

/// One pending substitution: `original` becomes `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub original: String,
    pub replacement: String,
}

impl Replacement {
    /// Substitution for a rendered diagram.
    pub fn embed(original: impl Into<String>, image_path: &str, index: usize) -> Self {
        Self {
            original: original.into(),
            replacement: embed_snippet(image_path, index),
        }
    }
}

/// Replace the first occurrence of `original` in `document`.
///
/// Returns the document unchanged when `original` is absent.
pub fn replace_first(document: &str, original: &str, replacement: &str) -> String {
    document.replacen(original, replacement, 1)
}

/// Apply `replacements` in order against a running copy of `document`.
pub fn apply_replacements(document: &str, replacements: &[Replacement]) -> String {
    replacements.iter().fold(document.to_string(), |doc, r| {
        replace_first(&doc, &r.original, &r.replacement)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::extract_blocks;

    #[test]
    fn no_replacements_is_identity() {
        let doc = "# Slides\n\n```mermaid\npie\n```\n";
        assert_eq!(apply_replacements(doc, &[]), doc);
    }

    #[test]
    fn replaces_blocks_in_order() {
        let doc = "A\n```mermaid\ngraph TD; A-->B;\n```\nB\n```mermaid\npie\n```\nC\n";
        let reps: Vec<_> = extract_blocks(doc)
            .iter()
            .map(|b| Replacement::embed(b.original.clone(), &format!("diagrams/diagram-{}.svg", b.index), b.index))
            .collect();

        let out = apply_replacements(doc, &reps);
        assert!(!out.contains("```mermaid"));
        let first = out.find("diagram-1.svg").unwrap();
        let second = out.find("diagram-2.svg").unwrap();
        assert!(first < second);
        assert!(out.starts_with("A\n<div"));
        assert!(out.ends_with("</div>\nC\n"));
    }

    #[test]
    fn skipped_block_keeps_its_source() {
        let doc = "```mermaid\nfirst\n```\n\n```mermaid\nsecond\n```\n";
        let blocks = extract_blocks(doc);
        let reps = vec![Replacement::embed(blocks[1].original.clone(), "diagrams/diagram-2.svg", 2)];

        let out = apply_replacements(doc, &reps);
        assert!(out.contains(&blocks[0].original));
        assert!(!out.contains(&blocks[1].original));
        assert!(out.contains("alt=\"Diagram 2\""));
    }

    #[test]
    fn duplicate_source_only_first_remaining_occurrence() {
        let block = "```mermaid\npie\n```";
        let doc = format!("{block}\n\n{block}\n");
        let reps = vec![
            Replacement::embed(block, "diagrams/diagram-1.svg", 1),
            Replacement::embed(block, "diagrams/diagram-2.svg", 2),
        ];

        let out = apply_replacements(&doc, &reps);
        // Each replacement consumes the first remaining copy.
        assert!(!out.contains(block));
        assert!(out.find("diagram-1.svg").unwrap() < out.find("diagram-2.svg").unwrap());
    }

    #[test]
    fn duplicate_source_with_first_failed() {
        let block = "```mermaid\npie\n```";
        let doc = format!("{block}\n\n{block}\n");
        // Diagram 1 failed; diagram 2's key still matches the first copy.
        let reps = vec![Replacement::embed(block, "diagrams/diagram-2.svg", 2)];

        let out = apply_replacements(&doc, &reps);
        assert!(out.starts_with("<div"));
        assert!(out.ends_with(&format!("{block}\n")));
    }

    #[test]
    fn absent_original_is_ignored() {
        assert_eq!(replace_first("abc", "xyz", "123"), "abc");
    }
}
