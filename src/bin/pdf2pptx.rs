//! CLI binary for pdf2pptx.
//!
//! A thin shim over the library crate: maps flags to a `ConversionRequest`,
//! makes sure PDFium is present, and turns every error kind into one
//! `Error:` line on stderr plus exit code 1.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfium_fetch::Library;
use pdf2pptx::{
    convert_with, ConversionProgressCallback, ConversionReport, ConversionRequest, ErrorKind,
    Pdf2PptxError, PdfiumRasterizer, DEFAULT_DPI,
};
use std::error::Error as _;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar: a spinner while pages are rasterised, then one
/// tick per slide added.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Rendering");
        bar.set_message("Rasterising pages…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} slides  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_prefix("Assembling");
        self.bar.reset_eta();
    }

    fn on_slide_added(&self, page_num: usize, _total_pages: usize, image_bytes: usize) {
        self.bar
            .set_message(format!("page {page_num} ({})", human_bytes(image_bytes as u64)));
        self.bar.inc(1);
    }

    fn on_saved(&self, _path: &Path, _bytes: u64) {
        self.bar.set_prefix("Saved");
    }

    fn on_conversion_complete(&self, _slide_count: usize) {
        self.bar.finish_and_clear();
    }
}

fn human_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert at the default 200 DPI
  pdf2pptx convert slides.pdf slides.pptx

  # Sharper images, bigger file
  pdf2pptx convert --dpi 300 slides.pdf slides.pptx

  # Machine-readable report
  pdf2pptx convert --json slides.pdf slides.pptx > report.json

  # Debug logging
  pdf2pptx -vv convert slides.pdf slides.pptx

ENVIRONMENT VARIABLES:
  PDF2PPTX_DPI            Default for --dpi
  PDFIUM_LIB_PATH         Path to an existing libpdfium, skips auto-download
  PDFIUM_FETCH_CACHE_DIR  Override the default pdfium cache directory
  RUST_LOG                Log filter, overrides -v

  PDFium (~30 MB) is downloaded automatically on first run and cached in
  ~/.cache/pdf2pptx/pdfium-7690/.
"#;

const COMPLETION_HELP: &str = r#"INSTALLATION:
  bash:  pdf2pptx completion bash > ~/.local/share/bash-completion/completions/pdf2pptx
  zsh:   pdf2pptx completion zsh > "${fpath[1]}/_pdf2pptx"
  fish:  pdf2pptx completion fish > ~/.config/fish/completions/pdf2pptx.fish

Restart the shell (or source the file) afterwards.
"#;

/// Convert PDF files to PowerPoint decks, one full-slide image per page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert PDF files to PowerPoint decks, one full-slide image per page",
    long_about = "Rasterise every page of a PDF and place it as a full-bleed picture on its own \
16:9 slide (10 in × 5.625 in). Page aspect ratio is not preserved; each image fills the slide.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a PDF into a PPTX deck.
    Convert {
        /// Source PDF file.
        input_pdf: PathBuf,

        /// Destination .pptx file (overwritten if it exists).
        output_pptx: PathBuf,

        /// Rasterisation resolution in dots per inch.
        #[arg(long, env = "PDF2PPTX_DPI", default_value_t = DEFAULT_DPI,
              value_parser = clap::value_parser!(u32).range(1..))]
        dpi: u32,

        /// Print the conversion report as JSON on stdout.
        #[arg(long, env = "PDF2PPTX_JSON")]
        json: bool,

        /// Disable progress bar.
        #[arg(long, env = "PDF2PPTX_NO_PROGRESS")]
        no_progress: bool,

        /// Suppress all output except errors.
        #[arg(short, long, env = "PDF2PPTX_QUIET")]
        quiet: bool,
    },

    /// Print a shell completion script to stdout.
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        #[arg(value_enum)]
        shell: ShellArg,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
}

impl From<ShellArg> for clap_complete::Shell {
    fn from(v: ShellArg) -> Self {
        match v {
            ShellArg::Bash => clap_complete::Shell::Bash,
            ShellArg::Zsh => clap_complete::Shell::Zsh,
            ShellArg::Fish => clap_complete::Shell::Fish,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                clap_complete::Shell::from(shell),
                &mut cmd,
                "pdf2pptx",
                &mut io::stdout(),
            );
            ExitCode::SUCCESS
        }
        Commands::Convert {
            input_pdf,
            output_pptx,
            dpi,
            json,
            no_progress,
            quiet,
        } => {
            let opts = ConvertOpts {
                json,
                quiet,
                show_progress: !quiet && !no_progress && !json,
            };
            match run_convert(input_pdf, output_pptx, dpi, &opts) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    report_error(&e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

struct ConvertOpts {
    json: bool,
    quiet: bool,
    show_progress: bool,
}

fn run_convert(
    input: PathBuf,
    output: PathBuf,
    dpi: u32,
    opts: &ConvertOpts,
) -> Result<(), Pdf2PptxError> {
    let request = ConversionRequest::builder(input, output).dpi(dpi).build()?;

    // Validation is cheap; do it before a possible 30 MB download.
    pdf2pptx::validate_input(request.source())?;

    let rasterizer = match ensure_pdfium(opts)
        .map_err(|e| Pdf2PptxError::rasterization(request.source(), format!("{e:#}")))?
    {
        Library::Path(path) => PdfiumRasterizer::with_library(path),
        Library::System => PdfiumRasterizer::new(),
    };

    let report = if opts.show_progress {
        let cb = CliProgressCallback::new();
        let result = convert_with(&request, &rasterizer, &cb);
        cb.abandon();
        result?
    } else {
        convert_with(&request, &rasterizer, &pdf2pptx::NoopProgressCallback)?
    };

    if opts.json {
        let json = serde_json::to_string_pretty(&report).map_err(Pdf2PptxError::unexpected)?;
        println!("{json}");
    } else if !opts.quiet {
        print_summary(&report);
    }
    Ok(())
}

/// Find PDFium (env override, cache, system library) and download it,
/// with a progress bar, only when none of those has one.
fn ensure_pdfium(opts: &ConvertOpts) -> anyhow::Result<Library> {
    if pdfium_fetch::is_cached() || !opts.show_progress {
        return pdfium_fetch::locate(None).context("Failed to download PDFium engine");
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

    let bar = dl_bar.clone();
    let library = pdfium_fetch::locate(Some(&move |downloaded, total| {
        if let Some(t) = total {
            if bar.length().unwrap_or(0) != t {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    }));
    dl_bar.finish_and_clear();

    library.context("Failed to download PDFium engine")
}

fn print_summary(report: &ConversionReport) {
    eprintln!(
        "{}  {} slides  {}ms  →  {}",
        green("✔"),
        bold(&report.slide_count.to_string()),
        report.total_duration_ms,
        bold(&report.destination.display().to_string()),
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{} dpi  ·  {}",
            report.dpi,
            human_bytes(report.output_bytes)
        )),
    );
}

/// Generic text shown for [`ErrorKind::Unexpected`]; details go to the log.
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred; see the log above for details.";

/// The single place errors become user-facing text.
fn user_message(err: &Pdf2PptxError) -> String {
    match err.kind() {
        ErrorKind::NotFound
        | ErrorKind::InvalidInput
        | ErrorKind::RasterizationFailed
        | ErrorKind::SaveFailed
        | ErrorKind::InvalidConfig => err.to_string(),
        ErrorKind::Unexpected => UNEXPECTED_MESSAGE.to_string(),
    }
}

/// `err` followed by every `source()` in its chain.
fn error_chain(err: &Pdf2PptxError) -> String {
    let mut chain = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        chain.push_str(&format!("\n  caused by: {c}"));
        cause = c.source();
    }
    chain
}

fn report_error(err: &Pdf2PptxError) {
    if err.kind() == ErrorKind::Unexpected {
        error!("{}", error_chain(err));
    }
    eprintln!("{} {}", red("Error:"), user_message(err));
}
