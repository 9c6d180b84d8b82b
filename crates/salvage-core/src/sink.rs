//! Destinations for carved resources.
//!
//! A [`Sink`] receives each [`Segment`] together with its output index and
//! format. [`DirectorySink`] writes one file per segment, [`CollectSink`]
//! keeps them in memory.

use crate::carver::{Format, Segment};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Trait for receiving carved resources.
///
/// Returning an error stops the extraction run; anything already accepted
/// stays where it is.
pub trait Sink {
    /// Accept one segment
    fn accept(&mut self, index: u32, format: Format, segment: &Segment) -> Result<()>;
}

/// File name for the resource with the given index, e.g. `0007.png`
pub fn output_file_name(index: u32, format: Format) -> String {
    format!("{:04}.{}", index, format.extension())
}

/// Human-readable size in KiB, one decimal, right-aligned to 6 characters
pub fn format_kib(len: usize) -> String {
    format!("{:>6.1} KB", len as f64 / 1024.0)
}

/// Writes each segment to `<dir>/<index>.<ext>`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    dry_run: bool,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, which must already exist
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::not_a_directory(dir));
        }
        Ok(Self {
            dir,
            dry_run: false,
            written: Vec::new(),
        })
    }

    /// Report what would be written without touching the file system
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written (or, in dry-run mode, that would have been written)
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Full output path for a resource
    pub fn path_for(&self, index: u32, format: Format) -> PathBuf {
        self.dir.join(output_file_name(index, format))
    }
}

impl Sink for DirectorySink {
    fn accept(&mut self, index: u32, format: Format, segment: &Segment) -> Result<()> {
        let path = self.path_for(index, format);

        if self.dry_run {
            info!(
                "would create file {} ({})",
                path.display(),
                format_kib(segment.len())
            );
        } else {
            info!(
                "create file {} ({})",
                path.display(),
                format_kib(segment.len())
            );
            fs::write(&path, segment.as_bytes()).map_err(|e| Error::file_write(&path, e))?;
        }

        self.written.push(path);
        Ok(())
    }
}

/// A resource held by a [`CollectSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    /// Output index assigned by the extractor
    pub index: u32,
    /// Format of the resource
    pub format: Format,
    /// The carved segment
    pub segment: Segment,
}

/// Keeps every accepted segment in memory
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Accepted segments, in the order they were received
    pub items: Vec<Collected>,
}

impl CollectSink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected segments of one format
    pub fn of_format(&self, format: Format) -> impl Iterator<Item = &Collected> {
        self.items.iter().filter(move |c| c.format == format)
    }
}

impl Sink for CollectSink {
    fn accept(&mut self, index: u32, format: Format, segment: &Segment) -> Result<()> {
        self.items.push(Collected {
            index,
            format,
            segment: segment.clone(),
        });
        Ok(())
    }
}
