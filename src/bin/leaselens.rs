//! CLI binary for leaselens.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use leaselens::{
    extract, extract_to_file, inspect, positional, sectioned, ExtractionConfig, TextSource,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract one contract (JSON record to stdout)
  leaselens contract.pdf

  # Extract to a file
  leaselens contract.pdf -o contract.json

  # Batch: every result lands next to its input as <stem>.json
  leaselens scans/*.pdf --out-dir results/

  # Scanned contract with mixed-language riders
  leaselens scan.pdf --lang kor+eng

  # Inspect PDF metadata only (no OCR, instant)
  leaselens --inspect-only contract.pdf

  # Dump text items with page coordinates (template debugging)
  leaselens --coords new_template.pdf

  # Party-section strategy instead of the marker engine
  leaselens --strategy sectioned contract.pdf

EXTRACTION STRATEGIES:
  marker     Ordered marker segmentation (default). General; follows the
             label order of the standard lease form.
  sectioned  Split at the 임대인/임차인 headings, then match fields by
             shape (registration/phone number patterns). For templates
             that label blocks but not every field.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to an existing libpdfium
  RUST_LOG            Tracing filter (overrides -v/-q)

SETUP:
  Tesseract with Korean language data must be installed for scanned
  documents:  apt install tesseract-ocr tesseract-ocr-kor
"#;

/// Extract structured lease-contract data from PDF files.
#[derive(Parser, Debug)]
#[command(
    name = "leaselens",
    version,
    about = "Extract structured party and contract-term data from lease-contract PDFs",
    long_about = "Extract landlord/tenant identities, agents, and contract terms from \
digital or scanned Korean lease contracts. Digital text layers are read directly; \
scanned documents fall back to Tesseract OCR automatically.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// One or more PDF files.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the record to this file instead of stdout (single input only).
    #[arg(short, long, env = "LEASELENS_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory for batch results, one <stem>.json per input.
    #[arg(long, env = "LEASELENS_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Extraction strategy: marker, sectioned.
    #[arg(long, env = "LEASELENS_STRATEGY", value_enum, default_value = "marker")]
    strategy: StrategyArg,

    /// Tesseract language code(s) for the OCR fallback.
    #[arg(long, env = "LEASELENS_LANG", default_value = "kor")]
    lang: String,

    /// Minimum text-layer length before the OCR fallback triggers.
    #[arg(long, env = "LEASELENS_MIN_TEXT_LEN", default_value_t = 10)]
    min_text_len: usize,

    /// Maximum rendered page dimension in pixels for OCR.
    #[arg(long, env = "LEASELENS_MAX_PIXELS", default_value_t = 2000)]
    max_pixels: u32,

    /// Maximum pages fed to OCR (0 = all).
    #[arg(long, env = "LEASELENS_OCR_PAGES", default_value_t = 0)]
    ocr_pages: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "LEASELENS_PASSWORD")]
    password: Option<String>,

    /// Documents processed concurrently in batch mode.
    #[arg(short, long, env = "LEASELENS_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Emit the full output (record + text + stats) instead of the record only.
    #[arg(long, env = "LEASELENS_FULL")]
    full: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Dump text items with page coordinates instead of extracting.
    #[arg(long)]
    coords: bool,

    /// Disable the batch progress bar.
    #[arg(long, env = "LEASELENS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LEASELENS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "LEASELENS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
enum StrategyArg {
    Marker,
    Sectioned,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        for input in &cli.inputs {
            let info = inspect(input)
                .await
                .with_context(|| format!("Failed to inspect {input}"))?;
            println!("File:         {input}");
            if let Some(ref t) = info.title {
                println!("Title:        {t}");
            }
            if let Some(ref a) = info.author {
                println!("Author:       {a}");
            }
            if let Some(ref p) = info.producer {
                println!("Producer:     {p}");
            }
            println!("Pages:        {}", info.page_count);
            println!("PDF Version:  {}", info.pdf_version);
        }
        return Ok(());
    }

    // ── Coordinate dump mode ─────────────────────────────────────────────
    if cli.coords {
        for input in &cli.inputs {
            let path = PathBuf::from(input);
            let items = positional::text_items(&path, cli.password.as_deref())
                .await
                .with_context(|| format!("Failed to scan {input}"))?;
            eprintln!("{} {} text items", bold(input), items.len());
            for item in items {
                println!(
                    "page {:>2}  x {:>8.2}  y {:>8.2}  {:?}",
                    item.page, item.x, item.y, item.text
                );
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut config = ExtractionConfig::builder()
        .min_text_len(cli.min_text_len)
        .ocr_language(cli.lang.clone())
        .max_rendered_pixels(cli.max_pixels)
        .ocr_page_limit(cli.ocr_pages)
        .concurrency(cli.concurrency)
        .build()
        .context("Invalid configuration")?;
    config.password = cli.password.clone();

    // ── Run ──────────────────────────────────────────────────────────────
    if cli.inputs.len() == 1 {
        run_single(&cli, &cli.inputs[0], &config).await
    } else {
        if cli.strategy == StrategyArg::Sectioned {
            anyhow::bail!("--strategy sectioned supports a single input only");
        }
        run_batch(&cli, &config).await
    }
}

/// Extract one document and print or write the result.
async fn run_single(cli: &Cli, input: &str, config: &ExtractionConfig) -> Result<()> {
    let output = extract(input, config).await.context("Extraction failed")?;

    let record = match cli.strategy {
        StrategyArg::Marker => output.record.clone(),
        StrategyArg::Sectioned => sectioned::extract_parties(&output.text, &config.schema)
            .context("Section extraction failed")?,
    };

    let json = if cli.full {
        serde_json::to_string_pretty(&output).context("Failed to serialise output")?
    } else {
        serde_json::to_string_pretty(&record).context("Failed to serialise record")?
    };

    if let Some(ref output_path) = cli.output {
        tokio::fs::write(output_path, format!("{json}\n"))
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}  {}/{} fields  {}ms  →  {}",
                green("✔"),
                record.matched_count(),
                config.schema.len(),
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes()).context("Failed to write to stdout")?;
    stdout.write_all(b"\n").ok();

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} fields  {}  {}ms",
            green("✔"),
            record.matched_count(),
            config.schema.len(),
            dim(match output.source {
                TextSource::TextLayer => "text layer",
                TextSource::Ocr => "ocr",
            }),
            output.stats.total_duration_ms,
        );
    }
    Ok(())
}

/// Extract many documents concurrently, one JSON file per input.
async fn run_batch(cli: &Cli, config: &ExtractionConfig) -> Result<()> {
    let out_dir = cli
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let bar = if cli.quiet || cli.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(cli.inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };

    let results: Vec<(String, Result<()>)> = stream::iter(cli.inputs.iter().map(|input| {
        let config = config.clone();
        let out_dir = out_dir.clone();
        let bar = bar.clone();
        let quiet = cli.quiet;
        async move {
            let stem = PathBuf::from(&input)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            let out_path = out_dir.join(format!("{stem}.json"));

            let result = extract_to_file(input, &out_path, &config).await;
            let line = match &result {
                Ok(stats) => format!(
                    "  {} {:<40}  {}/{} fields  {}",
                    green("✓"),
                    input,
                    stats.matched_fields,
                    stats.total_fields,
                    dim(&format!("{}ms", stats.total_duration_ms)),
                ),
                Err(e) => format!("  {} {:<40}  {}", red("✗"), input, red(&e.to_string())),
            };
            // A hidden bar's println is a no-op; fall back to stderr so
            // --no-progress still reports per-file results.
            if bar.is_hidden() {
                if !quiet {
                    eprintln!("{line}");
                }
            } else {
                bar.println(line);
            }
            bar.inc(1);
            (input.clone(), result.map(|_| ()).map_err(Into::into))
        }
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await;

    bar.finish_and_clear();

    let failed: Vec<&String> = results
        .iter()
        .filter(|(_, r)| r.is_err())
        .map(|(input, _)| input)
        .collect();

    if !cli.quiet {
        if failed.is_empty() {
            eprintln!(
                "{} {} contracts extracted to {}",
                green("✔"),
                bold(&results.len().to_string()),
                out_dir.display()
            );
        } else {
            eprintln!(
                "{} {}/{} contracts extracted  ({} failed)",
                red("✘"),
                results.len() - failed.len(),
                results.len(),
                red(&failed.len().to_string()),
            );
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} inputs failed", failed.len(), results.len())
    }
}
