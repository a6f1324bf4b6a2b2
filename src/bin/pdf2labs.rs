//! CLI binary for edgequake-labreport.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_labreport::export::{self, DEFAULT_TEXT_DUMP};
use edgequake_labreport::{extract, inspect, ExtractionConfig, ExtractionOutput, PageSelection};
use std::io::{self, Write};
use std::path::PathBuf;
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print header and results; write parsed_lab_report.txt
  pdf2labs Blood_Report.pdf

  # Also export the table as CSV, skip the text dump
  pdf2labs Blood_Report.pdf --csv results.csv --no-text-dump

  # Full structured output on stdout
  pdf2labs --json Blood_Report.pdf > report.json

  # Another lab's letterhead and patient block
  pdf2labs --skip-marker "City Diagnostics" --skip-prefix "Patient ID" report.pdf

  # Mark results outside their reference range
  pdf2labs --flags Blood_Report.pdf

  # Reports that print some results without a reference range
  pdf2labs --optional-range report.pdf

  # Inspect PDF metadata only
  pdf2labs --inspect-only Blood_Report.pdf

ROW PATTERN:
  A custom --row-pattern must define the named groups test, value and unit,
  and may define range, e.g.
    '^(?P<test>[^|]+)\|(?P<value>[^|]+)\|(?P<unit>[^|]+)(?:\|(?P<range>.*))?$'

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Override the log filter (e.g. edgequake_labreport=debug)
"#;

/// Extract lab-test results from PDF lab reports.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2labs",
    version,
    about = "Extract lab-test results and patient details from PDF lab reports",
    long_about = "Read the text layer of a PDF lab report (local file or URL), pull the patient \
name, age and gender from page 1, drop footer, bar-code and letterhead lines, and parse each \
remaining result row into test name, value, unit and reference range.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Where to write the page-marked report text.
    #[arg(short = 'o', long, env = "PDF2LABS_TEXT_OUTPUT", default_value = DEFAULT_TEXT_DUMP)]
    text_output: PathBuf,

    /// Do not write the text dump.
    #[arg(long, env = "PDF2LABS_NO_TEXT_DUMP")]
    no_text_dump: bool,

    /// Write the results table as CSV to this file.
    #[arg(long, env = "PDF2LABS_CSV")]
    csv: Option<PathBuf>,

    /// Write the full structured output as JSON to this file.
    #[arg(long, env = "PDF2LABS_JSON_OUTPUT")]
    json_output: Option<PathBuf>,

    /// Print structured JSON on stdout instead of the table.
    #[arg(long, env = "PDF2LABS_JSON")]
    json: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2LABS_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted reports.
    #[arg(long, env = "PDF2LABS_PASSWORD")]
    password: Option<String>,

    /// Extra boilerplate line prefix to drop (repeatable).
    #[arg(long = "skip-prefix", value_name = "PREFIX")]
    skip_prefixes: Vec<String>,

    /// Extra boilerplate text; lines containing it are dropped (repeatable).
    #[arg(long = "skip-marker", value_name = "TEXT")]
    skip_markers: Vec<String>,

    /// Replace the built-in row pattern (see ROW PATTERN below).
    #[arg(long, env = "PDF2LABS_ROW_PATTERN")]
    row_pattern: Option<String>,

    /// Also accept rows that print no reference range.
    #[arg(long, env = "PDF2LABS_OPTIONAL_RANGE")]
    optional_range: bool,

    /// Add an H/L column for values outside the reference range.
    #[arg(long, env = "PDF2LABS_FLAGS")]
    flags: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2LABS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "PDF2LABS_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2LABS_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
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

    let config = build_config(&cli)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

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
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref d) = meta.creation_date {
                println!("Created:      {}", d);
            }
        }
        return Ok(());
    }

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract(&cli.input, &config)
        .await
        .context("Extraction failed")?;

    // ── Exports ──────────────────────────────────────────────────────────
    let mut written: Vec<PathBuf> = Vec::new();
    if !cli.no_text_dump {
        export::write_text_dump(&cli.text_output, &output.marked_text)
            .await
            .context("Failed to write text dump")?;
        written.push(cli.text_output.clone());
    }
    if let Some(ref path) = cli.csv {
        export::write_csv(path, &output.results)
            .await
            .context("Failed to write CSV")?;
        written.push(path.clone());
    }
    if let Some(ref path) = cli.json_output {
        export::write_json(path, &output)
            .await
            .context("Failed to write JSON")?;
        written.push(path.clone());
    }

    // ── Stdout ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        print_report(&output, cli.flags).context("Failed to write to stdout")?;
    }

    if !cli.quiet && !cli.json {
        print_summary(&output, &written);
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let pages: PageSelection = cli.pages.parse().context("Invalid --pages")?;

    let mut builder = ExtractionConfig::builder()
        .pages(pages)
        .download_timeout_secs(cli.download_timeout)
        .optional_range(cli.optional_range);

    for prefix in &cli.skip_prefixes {
        builder = builder.boilerplate_prefix(prefix.clone());
    }
    for marker in &cli.skip_markers {
        builder = builder.boilerplate_marker(marker.clone());
    }
    if let Some(ref pattern) = cli.row_pattern {
        builder = builder.row_pattern(pattern.clone());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }

    builder.build().context("Invalid configuration")
}

fn print_report(output: &ExtractionOutput, flags: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", output.header)?;
    writeln!(handle)?;
    writeln!(handle, "Structured Lab Results:")?;
    handle.write_all(export::render_table(&output.results, flags).as_bytes())?;
    handle.flush()
}

fn print_summary(output: &ExtractionOutput, written: &[PathBuf]) {
    let s = &output.stats;
    eprintln!(
        "{}  {} rows  {}/{} pages with text  {} lines dropped  {}ms",
        green("✔"),
        bold(&s.rows_parsed.to_string()),
        s.pages_with_text,
        s.selected_pages,
        s.lines_dropped(),
        s.total_duration_ms,
    );
    for path in written {
        eprintln!("   {} {}", dim("→"), path.display());
    }
}
