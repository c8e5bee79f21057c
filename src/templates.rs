//! Fixed text produced by a build: the embed snippet, generated file names
//! and the follow-up commands suggested to the user.
//!
//! Every string a build writes into the document or derives a file name from
//! lives here so unit tests can inspect it directly.

/// Directory, next to the input document, that receives rendered images.
pub const DIAGRAMS_DIR: &str = "diagrams";

/// Hidden working directory, next to the input document, for scratch sources.
pub const SCRATCH_DIR: &str = ".scratch-temp";

/// Marker inserted between the document stem and its extension.
pub const BUILD_MARKER: &str = "build";

/// HTML that replaces a rendered diagram block.
///
/// `{path}` is the image path relative to the document and `{index}` the
/// 1-based diagram index used in the alt text.
pub const EMBED_TEMPLATE: &str = r#"<div style="text-align: center; margin: 10px auto;">
  <img src="{path}" alt="Diagram {index}" style="max-width: 95%; height: auto; max-height: 350px; object-fit: contain;" />
</div>"#;

/// Render [`EMBED_TEMPLATE`] for one diagram.
pub fn embed_snippet(image_path: &str, index: usize) -> String {
    EMBED_TEMPLATE
        .replace("{path}", image_path)
        .replace("{index}", &index.to_string())
}

/// File name of the scratch source for diagram `index`.
pub fn scratch_file_name(index: usize) -> String {
    format!("diagram-{index}.mmd")
}

/// File name of the rendered image for diagram `index`.
pub fn image_file_name(index: usize) -> String {
    format!("diagram-{index}.svg")
}

/// Image path as referenced from the rewritten document.
///
/// Always uses `/`, whatever the host path separator.
pub fn relative_image_path(index: usize) -> String {
    format!("{DIAGRAMS_DIR}/{}", image_file_name(index))
}

/// Marp commands that turn the rewritten document into slides.
pub fn next_steps(output: &str, stem: &str) -> [String; 2] {
    [
        format!("marp {output} --pdf -o {stem}.pdf"),
        format!("marp {output} --html -o {stem}.html"),
    ]
}
