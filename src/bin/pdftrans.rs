//! CLI binary for pdftrans.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TranslationConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdftrans::{
    extract, inspect, translate, ProgressCallback, TranslationConfig, TranslationProgressCallback,
    TranslationStage,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live four-stage progress bar with
/// per-stage log lines using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-stage wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<&'static str, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        // Four stages: resolve, extract, translate, render.
        let bar = ProgressBar::new(4);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos}/{len} stages  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Translating");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.println(format!("{} {}", cyan("◆"), bold("Starting translation…")));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn stage_title(stage: TranslationStage) -> &'static str {
        match stage {
            TranslationStage::Resolve => "Resolving input",
            TranslationStage::Extract => "Extracting text",
            TranslationStage::Translate => "Translating",
            TranslationStage::Render => "Rendering output",
        }
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: TranslationStage, detail: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(stage.label(), Instant::now());
        self.bar
            .set_message(format!("{} ({detail})", Self::stage_title(stage)));
    }

    fn on_stage_complete(&self, stage: TranslationStage) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(stage.label())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} {:<18} {}",
            green("✓"),
            Self::stage_title(stage),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, elapsed_ms: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} translated in {}",
            green("✔"),
            bold(&format!("{:.1}s", elapsed_ms as f64 / 1000.0))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate to English (default), output next to the input
  pdftrans document.pdf --font NotoSans-Regular.ttf

  # Translate to Spanish with an explicit output path
  pdftrans document.pdf -t es -o documento.pdf --font NotoSans-Regular.ttf

  # Translate a PDF straight from a URL
  pdftrans https://example.com/paper.pdf -t fr --font DejaVuSans.ttf

  # Inspect PDF metadata (no network call)
  pdftrans --inspect-only document.pdf

  # Extract the text layer only, no translation
  pdftrans --extract-only document.pdf > text.txt

  # Structured JSON output with both texts and timing stats
  pdftrans --json document.pdf --font DejaVuSans.ttf > result.json

  # Point at a self-hosted translation endpoint
  pdftrans --endpoint http://localhost:8080/translate_a/single document.pdf --font f.ttf

LANGUAGE CODES:
  Any code the translation service accepts, e.g.:
  en  English      es  Spanish      fr  French       de  German
  it  Italian      pt  Portuguese   nl  Dutch        pl  Polish
  ja  Japanese     ko  Korean       zh-CN  Chinese (Simplified)

  Note: the overlay uses WinAnsi (Latin) text encoding. Non-Latin target
  languages translate fine but render as '?' unless the glyphs fall inside
  the encoding.

ENVIRONMENT VARIABLES:
  PDFTRANS_FONT              Path to the TrueType font to embed
  PDFTRANS_TARGET_LANG       Target language code (default: en)
  PDFTRANS_OUTPUT            Output file path
  PDFTRANS_ENDPOINT          Override the translation service URL
  PDFTRANS_MAX_CHARS         Input size cap in characters (default: 50000)
  PDFTRANS_TIMEOUT           Translation request timeout in seconds
  PDFTRANS_DOWNLOAD_TIMEOUT  Input download timeout in seconds

SETUP:
  1. Get a font:   any TrueType file with Latin coverage works, e.g.
                   DejaVu Sans or Noto Sans
  2. Translate:    pdftrans document.pdf -t es --font DejaVuSans.ttf

  Without -o the output lands next to the input as <name>_translated.pdf.
"#;

/// Translate PDF files and URLs with a remote machine-translation service.
#[derive(Parser, Debug)]
#[command(
    name = "pdftrans",
    version,
    about = "Translate PDF files and URLs with a remote machine-translation service",
    long_about = "Translate PDF documents (local files or URLs) by extracting their text layer, \
translating it with a remote machine-translation service, and overlaying the translation onto \
the first page of a copy of the original document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the translated PDF here (default: <input>_translated.pdf).
    #[arg(short, long, env = "PDFTRANS_OUTPUT")]
    output: Option<PathBuf>,

    /// TrueType font file to embed for the translated text.
    #[arg(
        long,
        env = "PDFTRANS_FONT",
        long_help = "TrueType font file to embed for the translated text.\n\
          Any font with Latin coverage works (DejaVu Sans, Noto Sans, …).\n\
          Required unless --inspect-only or --extract-only is given."
    )]
    font: Option<PathBuf>,

    /// Target language code (e.g. en, es, fr, de, ja).
    #[arg(
        short,
        long,
        env = "PDFTRANS_TARGET_LANG",
        default_value = pdftrans::config::DEFAULT_TARGET_LANG
    )]
    target_lang: String,

    /// Input size cap in characters; larger documents are rejected.
    #[arg(
        long,
        env = "PDFTRANS_MAX_CHARS",
        default_value_t = pdftrans::config::DEFAULT_MAX_INPUT_CHARS
    )]
    max_chars: usize,

    /// Override the translation service URL.
    #[arg(long, env = "PDFTRANS_ENDPOINT")]
    endpoint: Option<String>,

    /// Translation request timeout in seconds.
    #[arg(long, env = "PDFTRANS_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFTRANS_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output structured JSON (TranslationOutput) instead of a summary.
    #[arg(long, env = "PDFTRANS_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFTRANS_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no translation.
    #[arg(long)]
    inspect_only: bool,

    /// Print the extracted text only, no translation.
    #[arg(long)]
    extract_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFTRANS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTRANS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            println!("Encrypted:    {}", meta.encrypted);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let text = extract(&cli.input)
            .await
            .context("Failed to extract text")?;

        if let Some(ref path) = cli.output {
            tokio::fs::write(path, &text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .context("Failed to write to stdout")?;
            if !text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn TranslationProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run translation ──────────────────────────────────────────────────
    let output = translate(&config).await.context("Translation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        // The progress callback already printed the final green tick.
        let tick = if show_progress {
            String::new()
        } else {
            format!("{} ", green("✔"))
        };
        eprintln!(
            "{tick}{} pages  {} → {} chars  {}ms  →  {}",
            output.stats.page_count,
            dim(&output.stats.extracted_chars.to_string()),
            dim(&output.stats.translated_chars.to_string()),
            output.stats.total_duration_ms,
            bold(&output.output_path.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `TranslationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let font_path = cli.font.clone().context(
        "No font given. Pass --font <file.ttf> or set PDFTRANS_FONT \
         (any TrueType font with Latin coverage works).",
    )?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let mut builder = TranslationConfig::builder()
        .input(&cli.input)
        .output_path(output_path)
        .font_path(font_path)
        .target_lang(&cli.target_lang)
        .max_input_chars(cli.max_chars)
        .request_timeout_secs(cli.timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint);
    }
    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Default output path: `<stem>_translated.pdf` next to the input, or in
/// the current directory for URLs.
fn default_output_path(input: &str) -> PathBuf {
    if pdftrans::pipeline::input::is_url(input) {
        let name = input
            .rsplit('/')
            .next()
            .and_then(|last| last.split(['?', '#']).next())
            .filter(|s| !s.is_empty())
            .unwrap_or("document.pdf");
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        return PathBuf::from(format!("{stem}_translated.pdf"));
    }

    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    match path.parent() {
        Some(parent) => parent.join(format!("{stem}_translated.pdf")),
        None => PathBuf::from(format!("{stem}_translated.pdf")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_derives_from_stem() {
        assert_eq!(
            default_output_path("demo_123.pdf"),
            PathBuf::from("demo_123_translated.pdf")
        );
        assert_eq!(
            default_output_path("docs/report.pdf"),
            PathBuf::from("docs/report_translated.pdf")
        );
    }

    #[test]
    fn output_path_for_urls_lands_in_cwd() {
        assert_eq!(
            default_output_path("https://example.com/a/paper.pdf?dl=1"),
            PathBuf::from("paper_translated.pdf")
        );
    }
}
