//! salvage - Extract PNG images and WAVE audio embedded in binary files
//!
//! This tool scans a binary file for embedded PNG and RIFF/WAVE resources
//! and writes each one out as a numbered file.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use salvage_core::carver::carver_for;
use salvage_core::{
    CarverConfig, DirectorySink, ExtractOptions, Extractor, Format, FormatFilter,
    OversizePolicy,
};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, trace, Level};
use tracing_subscriber::EnvFilter;

/// Extract PNG images and WAVE audio embedded in binary files
#[derive(Parser, Debug)]
#[command(name = "salvage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Binary file to extract resources from
    input: PathBuf,

    /// Output directory for extracted files (must exist)
    #[arg(short, long = "outdir", default_value = ".")]
    outdir: PathBuf,

    /// Resource type to extract
    #[arg(short = 't', long = "type", value_enum, default_value = "all")]
    kind: Kind,

    /// Number of the first extracted file of each type
    #[arg(short, long, default_value = "0")]
    index: u32,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Maximum number of resources to extract per type (0 = unlimited)
    #[arg(long, default_value = "0")]
    max_results: usize,

    /// Handling of WAVE headers that declare more bytes than the file holds
    #[arg(long, value_enum, default_value = "reject")]
    wave_oversize: Oversize,

    /// Dry run - don't write files, just show what would be extracted
    #[arg(long)]
    dry_run: bool,

    /// Only list found resources without extracting
    #[arg(long)]
    list_only: bool,
}

/// Resource type selector
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// PNG images
    Png,
    /// RIFF/WAVE audio
    #[value(alias = "wave")]
    Wav,
    /// Both PNG and WAVE
    All,
}

impl From<Kind> for FormatFilter {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Png => FormatFilter::Png,
            Kind::Wav => FormatFilter::Wave,
            Kind::All => FormatFilter::All,
        }
    }
}

/// Oversized WAVE handling
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Oversize {
    /// Skip the header and keep scanning
    Reject,
    /// Keep everything up to the end of the file
    Clamp,
}

impl From<Oversize> for OversizePolicy {
    fn from(oversize: Oversize) -> Self {
        match oversize {
            Oversize::Reject => OversizePolicy::Reject,
            Oversize::Clamp => OversizePolicy::Clamp,
        }
    }
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .filter(self.kind.into())
            .base_index(self.index)
            .carver(CarverConfig::new().max_results(self.max_results))
            .oversize(self.wave_oversize.into())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    validate_paths(&cli)?;

    trace!("Reading {}", cli.input.display());
    let data = fs::read(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;
    debug!("Read {} bytes from {}", data.len(), cli.input.display());

    if cli.list_only {
        list_resources(&cli, &data)
    } else {
        extract_resources(&cli, &data)
    }
}

/// Fail before scanning if the input or output location is unusable
fn validate_paths(cli: &Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("File does not exist: {}", cli.input.display());
    }
    if !cli.input.is_file() {
        bail!("Input path is not a file: {}", cli.input.display());
    }
    if !cli.list_only && !cli.outdir.is_dir() {
        bail!("Directory does not exist: {}", cli.outdir.display());
    }
    Ok(())
}

/// Carve the input and write every resource to the output directory
fn extract_resources(cli: &Cli, data: &[u8]) -> Result<()> {
    let mut sink = DirectorySink::new(&cli.outdir)
        .with_context(|| format!("Invalid output directory: {}", cli.outdir.display()))?
        .dry_run(cli.dry_run);

    let report = Extractor::new(cli.extract_options())
        .run(data, &mut sink)
        .with_context(|| format!("Failed to extract from: {}", cli.input.display()))?;

    if cli.dry_run {
        for path in sink.written() {
            println!("Would write: {}", path.display());
        }
    }

    debug!("{} resource(s) extracted", report.total());
    Ok(())
}

/// Print one line per resource: format, offset, length and content hash
fn list_resources(cli: &Cli, data: &[u8]) -> Result<()> {
    let options = cli.extract_options();

    for format in options.filter.formats() {
        let carver = carver_for(format, options.carver.clone(), options.oversize);
        let segments = carver
            .scan(data)
            .with_context(|| format!("Failed to scan {}: {}", format, cli.input.display()))?;

        for segment in &segments {
            println!("{}", describe(format, segment.start(), segment.as_bytes()));
        }
    }

    Ok(())
}

/// Compute a short hash of the content (first 8 chars of blake3)
fn content_hash(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes);
    hash.to_hex()[..8].to_string()
}

/// A listing line for one resource
fn describe(format: Format, offset: usize, bytes: &[u8]) -> String {
    format!(
        "{:<4} {:#010x} {:>10} {}",
        format.extension(),
        offset,
        bytes.len(),
        content_hash(bytes)
    )
}
