//! CLI binary for mermaid2img.
//!
//! A thin shim over the library crate that maps CLI flags to `BuildConfig`
//! and prints progress and a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mermaid2img::{
    build, resolve_input, BuildConfig, BuildLayout, BuildOutput, BuildProgressCallback,
    ProgressCallback, Theme,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Terminal progress callback: per-diagram log lines, drawn above an
/// [indicatif] bar when stderr is a terminal and as plain lines otherwise.
/// Failures always go to stderr; in quiet mode they are all that is printed.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
    quiet: bool,
    language: String,
    started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new(with_bar: bool, quiet: bool, language: &str) -> Arc<Self> {
        let bar = with_bar.then(|| {
            let bar = ProgressBar::new(0); // length set in on_build_start
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} diagrams  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Rendering");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            bar,
            quiet,
            language: language.to_string(),
            started: Mutex::new(None),
        })
    }

    fn line(&self, text: String) {
        if self.quiet {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(text),
            None => println!("{text}"),
        }
    }

    fn elapsed(&self) -> String {
        let secs = self
            .started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        dim(&format!("{secs:.1}s"))
    }
}

impl BuildProgressCallback for CliProgressCallback {
    fn on_build_start(&self, total: usize) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
        }
        self.line(format!(
            "{} Found {} {} diagrams",
            cyan("◆"),
            bold(&total.to_string()),
            self.language
        ));
    }

    fn on_diagram_start(&self, index: usize, total: usize) {
        if let Ok(mut t) = self.started.lock() {
            *t = Some(Instant::now());
        }
        if let Some(bar) = &self.bar {
            bar.set_message(format!("diagram {index}/{total}"));
        }
        self.line(format!("  Converting diagram {index}..."));
    }

    fn on_diagram_complete(&self, _index: usize, _total: usize, image_path: &str) {
        let elapsed = self.elapsed();
        self.line(format!("    {} Generated: {image_path}  {elapsed}", green("✓")));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_diagram_error(&self, index: usize, _total: usize, error: &str) {
        let elapsed = self.elapsed();
        let msg = format!(
            "    {} Error converting diagram {index}: {}  {elapsed}",
            red("✗"),
            red(error.trim())
        );
        match &self.bar {
            Some(bar) if !self.quiet => bar.println(msg),
            _ => eprintln!("{msg}"),
        }
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_build_complete(&self, _total: usize, _rendered: usize) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render every ```mermaid block of slides.md → slides.build.md + diagrams/
  mermaid2img slides.md

  # Dark theme on a white canvas
  mermaid2img --theme dark --background white slides.md

  # Use mmdc through npx
  mermaid2img --renderer ./node_modules/.bin/mmdc slides.md

  # Machine-readable summary
  mermaid2img --json slides.md > build.json

  # Then build the deck
  marp slides.build.md --pdf -o slides.pdf

OUTPUT LAYOUT (next to the input):
  <name>.build.<ext>     rewritten document (overwritten on each run)
  diagrams/diagram-N.svg one image per rendered diagram
  .scratch-temp/         working directory, removed after every run

ENVIRONMENT VARIABLES:
  MERMAID2IMG_RENDERER    Renderer program (default: mmdc)
  MERMAID2IMG_WIDTH       Canvas width in px
  MERMAID2IMG_HEIGHT      Canvas height in px
  MERMAID2IMG_THEME       default | forest | dark | neutral
  MERMAID2IMG_BACKGROUND  Background colour
  RUST_LOG                Override the tracing filter

SETUP:
  npm install -g @mermaid-js/mermaid-cli
"#;

/// Render Mermaid diagrams in a Markdown file to SVG and rewrite the file.
#[derive(Parser, Debug)]
#[command(
    name = "mermaid2img",
    version,
    about = "Render Mermaid diagrams in Markdown to SVG images for Marp presentations",
    long_about = "Extracts every ```mermaid block from a Markdown document, renders each one \
to diagrams/diagram-N.svg with the Mermaid CLI, and writes <name>.build.<ext> with the blocks \
replaced by centred <img> references. The input file is never modified.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown document to process.
    input: PathBuf,

    /// Renderer program invoked for each diagram.
    #[arg(long, env = "MERMAID2IMG_RENDERER", default_value = "mmdc")]
    renderer: String,

    /// Canvas width in pixels.
    #[arg(long, env = "MERMAID2IMG_WIDTH", default_value_t = 1400,
          value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, env = "MERMAID2IMG_HEIGHT", default_value_t = 1000,
          value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Mermaid theme.
    #[arg(long, env = "MERMAID2IMG_THEME", value_enum, default_value = "default")]
    theme: ThemeArg,

    /// Background colour (e.g. transparent, white, '#F0F0F0').
    #[arg(long, env = "MERMAID2IMG_BACKGROUND", default_value = "transparent")]
    background: String,

    /// Fence info string that marks a diagram block.
    #[arg(long, env = "MERMAID2IMG_LANGUAGE", default_value = "mermaid")]
    language: String,

    /// Print a JSON summary (BuildOutput) on stdout instead of the report.
    #[arg(long, env = "MERMAID2IMG_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MERMAID2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MERMAID2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MERMAID2IMG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ThemeArg {
    Default,
    Forest,
    Dark,
    Neutral,
}

impl From<ThemeArg> for Theme {
    fn from(v: ThemeArg) -> Self {
        match v {
            ThemeArg::Default => Theme::Default,
            ThemeArg::Forest => Theme::Forest,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Neutral => Theme::Neutral,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit with 1; --help and --version go to stdout with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO logs would tear through the progress bar, so they stay off
    // while it is drawn.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Validate input before touching the filesystem ────────────────────
    let layout = resolve_input(&cli.input).context("Cannot build document")?;
    let report = !cli.quiet && !cli.json;

    if report {
        print_banner(&layout);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if cli.json {
        None
    } else {
        let cb = CliProgressCallback::new(show_progress, cli.quiet, &cli.language);
        Some(cb as Arc<dyn BuildProgressCallback>)
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run build ────────────────────────────────────────────────────────
    let output = build(&cli.input, &config).await.context("Build failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if report {
        print_summary(&layout, &output);
    }

    Ok(())
}

/// Map CLI args to `BuildConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BuildConfig> {
    let mut builder = BuildConfig::builder()
        .renderer_command(cli.renderer.clone())
        .width(cli.width)
        .height(cli.height)
        .theme(cli.theme.clone().into())
        .background(cli.background.clone())
        .language(cli.language.clone());

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_banner(layout: &BuildLayout) {
    println!("{}", bold("Mermaid to Images"));
    println!("{}", dim("================="));
    println!("Input:    {}", layout.input.display());
    println!("Output:   {}", layout.output.display());
    println!("Diagrams: {}/", layout.diagrams_dir.display());
    println!();
}

fn print_summary(layout: &BuildLayout, output: &BuildOutput) {
    let stats = &output.stats;
    let output_path = output.output_path.display().to_string();

    println!();
    if stats.failed == 0 {
        println!("{} Conversion complete!", green("✔"));
    } else {
        println!(
            "{} Conversion complete with {} failed diagram(s) left as source",
            cyan("⚠"),
            red(&stats.failed.to_string())
        );
    }
    println!();
    println!("Generated files:");
    println!("   - {output_path}");
    println!(
        "   - {} SVG diagrams in {}/  {}",
        stats.rendered,
        output.diagrams_dir.display(),
        dim(&format!("{}ms", stats.duration_ms))
    );
    println!();
    println!("Next steps:");
    for cmd in mermaid2img::templates::next_steps(&output_path, &layout.stem) {
        println!("   {cmd}");
    }
}
