//! Tests for the `mermaid2img` binary: exit codes, output files, JSON mode.

use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mermaid2img"));
    for var in [
        "MERMAID2IMG_RENDERER",
        "MERMAID2IMG_WIDTH",
        "MERMAID2IMG_HEIGHT",
        "MERMAID2IMG_THEME",
        "MERMAID2IMG_BACKGROUND",
        "MERMAID2IMG_LANGUAGE",
        "MERMAID2IMG_JSON",
        "MERMAID2IMG_NO_PROGRESS",
        "MERMAID2IMG_VERBOSE",
        "MERMAID2IMG_QUIET",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir).args(args).output().unwrap()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn missing_argument_prints_usage_and_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn help_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["--help"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
}

#[test]
fn nonexistent_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["missing.md"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing.md not found"), "stderr: {stderr}");
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn directory_input_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("deck.md")).unwrap();
    let out = run(dir.path(), &["deck.md"]);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(entries(dir.path()), vec!["deck.md"]);
}

#[test]
fn document_without_diagrams_never_calls_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let body = "# Slides\n\n```js\nconsole.log(1)\n```\n";
    std::fs::write(dir.path().join("plain.md"), body).unwrap();

    let out = run(
        dir.path(),
        &["--renderer", "no-such-renderer-on-path", "plain.md"],
    );

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("plain.build.md")).unwrap(),
        body
    );
    assert_eq!(entries(dir.path()), vec!["diagrams", "plain.build.md", "plain.md"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("marp plain.build.md --pdf -o plain.pdf"), "stdout: {stdout}");
}

#[test]
fn plain_mode_logs_at_info() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("plain.md"), "# Slides\n").unwrap();

    // Output is piped, so no progress bar is drawn and INFO logs are on.
    let out = run(dir.path(), &["--no-progress", "plain.md"]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Build complete"), "stderr: {stderr}");

    let out = run(dir.path(), &["-q", "plain.md"]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!stderr.contains("Build complete"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn quiet_mode_still_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("deck.md"), "```mermaid\npie\n```\n").unwrap();

    let out = run(
        dir.path(),
        &["-q", "--renderer", "no-such-renderer-on-path", "deck.md"],
    );

    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error converting diagram 1"), "stderr: {stderr}");
}

#[test]
fn missing_renderer_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let body = "```mermaid\ngraph TD; A-->B;\n```\n";
    std::fs::write(dir.path().join("deck.md"), body).unwrap();

    let out = run(
        dir.path(),
        &["--renderer", "no-such-renderer-on-path", "deck.md"],
    );

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error converting diagram 1"), "stderr: {stderr}");
    assert!(!stdout.contains("Error converting"), "stdout: {stdout}");
    assert!(stdout.contains("Converting diagram 1..."), "stdout: {stdout}");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("deck.build.md")).unwrap(),
        body
    );
    assert!(!dir.path().join(".scratch-temp").exists());
}

#[cfg(unix)]
#[test]
fn failing_renderer_reported_in_json() {
    let dir = tempfile::tempdir().unwrap();
    let body = "```mermaid\ngraph TD; A-->B;\n```\n";
    std::fs::write(dir.path().join("deck.md"), body).unwrap();

    let out = run(dir.path(), &["--renderer", "false", "--json", "deck.md"]);

    assert_eq!(out.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["stats"]["total_diagrams"], 1);
    assert_eq!(json["stats"]["failed"], 1);
    assert_eq!(json["diagrams"][0]["index"], 1);
    assert!(json["diagrams"][0]["image_path"].is_null());
    assert!(json.get("markdown").is_none());
}

/// Installs a shell script that behaves like `mmdc`: writes an SVG to the
/// path following `-o`.
#[cfg(unix)]
fn fake_mmdc(dir: &Path) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-mmdc.sh");
    std::fs::write(
        &path,
        "#!/bin/sh\n\
         while [ $# -gt 0 ]; do\n\
           if [ \"$1\" = \"-o\" ]; then printf '<svg/>' > \"$2\"; fi\n\
           shift\n\
         done\n",
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

#[cfg(unix)]
#[test]
fn renders_notes_with_external_program() {
    let tools = tempfile::tempdir().unwrap();
    let renderer = fake_mmdc(tools.path());

    let dir = tempfile::tempdir().unwrap();
    let body = "# Notes\n\n```mermaid\ngraph TD; A-->B;\n```\n\n```mermaid\npie\n  \"x\": 1\n```\n";
    std::fs::write(dir.path().join("notes.md"), body).unwrap();

    let out = run(dir.path(), &["--renderer", &renderer, "notes.md"]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(entries(dir.path()), vec!["diagrams", "notes.build.md", "notes.md"]);
    assert_eq!(
        entries(&dir.path().join("diagrams")),
        vec!["diagram-1.svg", "diagram-2.svg"]
    );

    let built = std::fs::read_to_string(dir.path().join("notes.build.md")).unwrap();
    assert!(built.contains(r#"<img src="diagrams/diagram-1.svg" alt="Diagram 1""#));
    assert!(built.contains(r#"<img src="diagrams/diagram-2.svg" alt="Diagram 2""#));
    assert!(!built.contains("```mermaid"));
    assert_eq!(std::fs::read_to_string(dir.path().join("notes.md")).unwrap(), body);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Generated: diagrams/diagram-2.svg"), "stdout: {stdout}");
    assert!(stdout.contains("marp notes.build.md --html -o notes.html"), "stdout: {stdout}");
}
