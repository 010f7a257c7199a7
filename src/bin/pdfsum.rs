//! CLI binary for edgequake-pdfsum.
//!
//! A thin shim over the library crate: resolves `SummaryConfig` from flags,
//! environment and the properties file, runs the batch, and prints one line
//! per report plus a single error line when the run aborts.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfsum::pipeline::discover::list_pdf_files;
use edgequake_pdfsum::{
    exit_code, BatchOutcome, BatchProgressCallback, BatchRunner, FileReport, PdfSumError,
    ProcessEnv, ProgressCallback, Properties, SummaryConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Prints `✅ Summary for … created!` as each report lands, with an optional
/// indicatif bar across the batch.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(show_bar: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {pos:>3}/{len} files  \
                     ⏱ {elapsed_precise}  {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(TICKS),
            );
            bar.set_prefix("Summarising");
            bar
        });
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
            bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    fn on_file_start(&self, _index: usize, _total: usize, path: &Path) {
        if let Some(ref bar) = self.bar {
            bar.set_message(display_name(path));
        }
    }

    fn on_file_complete(&self, _index: usize, _total: usize, report: &FileReport) {
        let line = format!("✅ Summary for {} created!", display_name(&report.pdf_path));
        match self.bar {
            Some(ref bar) => {
                bar.suspend(|| {
                    println!("{line}");
                    eprintln!(
                        "   {}  {}",
                        dim(&format!(
                            "{} chunk(s), {} call(s)",
                            report.chunks, report.completion_calls
                        )),
                        dim(&format!("{:.1}s", report.duration_ms as f64 / 1000.0)),
                    );
                });
                bar.inc(1);
            }
            None => println!("{line}"),
        }
    }

    fn on_file_error(&self, _index: usize, _total: usize, _path: &Path, _error: &str) {
        if let Some(ref bar) = self.bar {
            bar.abandon();
        }
    }

    fn on_batch_complete(&self, _processed: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise every PDF in ./pdfs/
  pdfsum

  # Another directory and model
  pdfsum --dir ~/papers --model gpt-4.1-mini

  # Machine-readable results
  pdfsum --json > results.json

OUTPUT:
  For each <name>.pdf a report <name>.pdf.md is written next to it.
  Existing reports are overwritten. The first failing file stops the run.

CONFIGURATION (first match wins):
  1. Command-line flags
  2. Environment variables
  3. Properties file (./application.properties, or --properties)
  4. Built-in defaults

  Property                 Environment              Default
  ───────────────────────  ───────────────────────  ────────────
  openai.api.key           OPENAI_API_KEY           (required)
  openai.model.name        OPENAI_MODEL_NAME        gpt-4.1-nano
  openai.temperature       OPENAI_TEMPERATURE       0.7
  openai.timeout.seconds   OPENAI_TIMEOUT_SECONDS   120
  pdf.max.size.mb          PDF_MAX_SIZE_MB          5
  pdf.directory            PDF_DIRECTORY            ./pdfs/

ENVIRONMENT VARIABLES:
  PDFSUM_PROPERTIES       Properties file to read instead of the default
  RUST_LOG                Tracing filter (overrides -v / -q)
  PDFIUM_LIB_PATH         Path to an existing libpdfium — skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory

EXIT STATUS:
  0  all PDFs summarised, or no PDFs found
  1  any error (missing API key, oversized file, extraction, API, write)
"#;

/// Summarise a directory of PDF files into Markdown reports using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarise a directory of PDF files into Markdown reports using an LLM",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory scanned for *.pdf files.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1-mini).
    #[arg(long)]
    model: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long)]
    temperature: Option<f32>,

    /// Largest accepted PDF, in megabytes.
    #[arg(long)]
    max_size_mb: Option<u64>,

    /// Per-call LLM timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Properties file with fallback settings.
    #[arg(long, env = "PDFSUM_PROPERTIES")]
    properties: Option<PathBuf>,

    /// Print the batch outcome as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are noise next to the progress bar.
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

    // ── Build runner ─────────────────────────────────────────────────────
    let runner = match prepare(&cli, show_progress) {
        Ok(runner) => runner,
        Err(e) => {
            let message = match e.downcast_ref::<PdfSumError>() {
                Some(pe) => pe.user_message(),
                None => format!("{e:#}"),
            };
            print_error(&message);
            return ExitCode::FAILURE;
        }
    };

    // ── Run batch ────────────────────────────────────────────────────────
    let result = runner.run().await;
    let code = write_outcome(
        &result,
        cli.json,
        cli.quiet,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    match code {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            print_error(&format!("Failed to write output: {e}"));
            ExitCode::FAILURE
        }
    }
}

// ── Final output ─────────────────────────────────────────────────────────────

/// Write the end-of-run lines for `result` and return the exit code.
///
/// Reports were already announced by the progress callback, so a success
/// only adds the totals line (or the JSON outcome with `--json`). A failure
/// is exactly one `❌ Error:` line on `err`.
fn write_outcome(
    result: &std::result::Result<BatchOutcome, PdfSumError>,
    json: bool,
    quiet: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    match result {
        Ok(outcome) if json => {
            let json = serde_json::to_string_pretty(outcome).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
        Ok(outcome) if outcome.is_empty() => {
            if !quiet {
                writeln!(out, "No PDFs found in {}", outcome.directory.display())?;
            }
        }
        Ok(outcome) => {
            if !quiet {
                writeln!(
                    err,
                    "{}  {} file(s)  {} call(s)  {}ms",
                    green("✔"),
                    bold(&outcome.files.len().to_string()),
                    outcome.total_completion_calls(),
                    outcome.total_duration_ms,
                )?;
            }
        }
        Err(e) => write_error(err, &e.user_message())?,
    }
    Ok(exit_code(result))
}

fn write_error(w: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(w, "❌ Error: {message}")
}

fn print_error(message: &str) {
    let _ = write_error(&mut io::stderr().lock(), message);
}

/// Resolve configuration, provision pdfium when needed, and wire the runner.
fn prepare(cli: &Cli, show_progress: bool) -> Result<BatchRunner> {
    let (props_path, explicit) = match cli.properties {
        Some(ref p) => (p.clone(), true),
        None => (PathBuf::from(edgequake_pdfsum::config::DEFAULT_PROPERTIES_FILE), false),
    };
    let properties = Properties::load(&props_path, explicit);

    let config = apply_overrides(SummaryConfig::resolve(&ProcessEnv, &properties)?, cli)?;
    tracing::debug!("{config:?}");

    // Key check first so a misconfigured run never triggers a download.
    config.require_api_key()?;
    let has_work = !list_pdf_files(&config.pdf_directory)?.is_empty();
    if has_work {
        ensure_pdfium(cli.quiet)?;
    }

    let mut runner = BatchRunner::from_config(config)?;
    if !cli.quiet && !cli.json {
        let cb = CliProgressCallback::new(show_progress);
        runner = runner.progress_callback(cb as ProgressCallback);
    }
    Ok(runner)
}

/// Layer CLI flags over the resolved configuration.
fn apply_overrides(config: SummaryConfig, cli: &Cli) -> Result<SummaryConfig> {
    let mut builder = SummaryConfig::builder()
        .model(cli.model.clone().unwrap_or(config.model))
        .temperature(cli.temperature.unwrap_or(config.temperature))
        .max_pdf_size_mb(cli.max_size_mb.unwrap_or(config.max_pdf_size_mb))
        .pdf_directory(cli.dir.clone().unwrap_or(config.pdf_directory))
        .api_timeout_secs(cli.timeout.unwrap_or(config.api_timeout_secs))
        .chunk_budget(config.chunk_budget);
    if let Some(key) = config.api_key {
        builder = builder.api_key(key);
    }
    builder.build().context("Invalid configuration")
}

// ── Ensure PDFium engine is available ───────────────────────────────────────
// On the very first run the pdfium library (~30 MB) is downloaded and cached;
// later startups only check the cache path.
fn ensure_pdfium(quiet: bool) -> Result<()> {
    if pdfium_auto::is_pdfium_cached() {
        return Ok(());
    }

    if quiet {
        tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None))
            .context("Failed to download PDFium engine")?;
        return Ok(());
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));
    eprintln!("{} {}", cyan("◆"), bold("Downloading PDF engine (first run only)…"));

    let bar = dl_bar.clone();
    tokio::task::block_in_place(|| {
        pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
            if let Some(t) = total {
                if bar.length().unwrap_or(0) != t {
                    bar.set_length(t);
                }
            }
            bar.set_position(downloaded);
        }))
    })
    .context("Failed to download PDFium engine")?;

    dl_bar.finish_with_message("ready ✓");
    Ok(())
}
