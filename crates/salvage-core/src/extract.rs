//! Running the carvers over an input and handing results to a sink.
//!
//! [`Extractor`] is configured once with [`ExtractOptions`] and can then be run
//! against any number of buffers. Each selected format is carved in turn and
//! its segments are numbered from `base_index`, independently of the other
//! format.

use crate::carver::{carver_for, CarverConfig, Format, FormatFilter, OversizePolicy};
use crate::error::{Error, Result};
use crate::sink::Sink;
use std::path::Path;
use tracing::{debug, info};

/// Options for an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Which formats to carve
    pub filter: FormatFilter,
    /// Index assigned to the first segment of each format
    pub base_index: u32,
    /// Settings passed to every carver
    pub carver: CarverConfig,
    /// Handling of WAVE headers that declare more bytes than remain
    pub oversize: OversizePolicy,
}

impl ExtractOptions {
    /// Creates a new options value with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the format filter
    pub fn filter(mut self, filter: FormatFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the base index
    pub fn base_index(mut self, index: u32) -> Self {
        self.base_index = index;
        self
    }

    /// Sets the carver configuration
    pub fn carver(mut self, config: CarverConfig) -> Self {
        self.carver = config;
        self
    }

    /// Sets the WAVE oversize policy
    pub fn oversize(mut self, policy: OversizePolicy) -> Self {
        self.oversize = policy;
        self
    }
}

/// Per-format totals of an extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatStats {
    /// Number of segments handed to the sink
    pub count: usize,
    /// Sum of their lengths
    pub bytes: usize,
}

/// Summary of an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// PNG totals
    pub png: FormatStats,
    /// WAVE totals
    pub wave: FormatStats,
}

impl ExtractReport {
    /// Totals for one format
    pub fn stats(&self, format: Format) -> FormatStats {
        match format {
            Format::Png => self.png,
            Format::Wave => self.wave,
        }
    }

    fn stats_mut(&mut self, format: Format) -> &mut FormatStats {
        match format {
            Format::Png => &mut self.png,
            Format::Wave => &mut self.wave,
        }
    }

    /// Number of segments across all formats
    pub fn total(&self) -> usize {
        self.png.count + self.wave.count
    }
}

/// Drives the carvers selected by [`ExtractOptions`]
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Creates an extractor with the given options
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options in use
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Carve `data` and pass every segment to `sink`.
    ///
    /// Stops at the first sink error.
    pub fn run(&self, data: &[u8], sink: &mut dyn Sink) -> Result<ExtractReport> {
        let mut report = ExtractReport::default();

        for format in self.options.filter.formats() {
            let carver = carver_for(format, self.options.carver.clone(), self.options.oversize);
            let segments = carver.scan(data)?;
            debug!("Carved {} {} segment(s)", segments.len(), format);

            for (i, segment) in segments.iter().enumerate() {
                let index = u32::try_from(i)
                    .ok()
                    .and_then(|i| self.options.base_index.checked_add(i))
                    .ok_or_else(|| Error::internal("output index overflow"))?;

                sink.accept(index, format, segment)?;

                let stats = report.stats_mut(format);
                stats.count += 1;
                stats.bytes += segment.len();
            }
        }

        info!(
            "Summary: {} PNG ({} bytes), {} WAVE ({} bytes)",
            report.png.count, report.png.bytes, report.wave.count, report.wave.bytes
        );
        Ok(report)
    }
}

/// Read a file and extract from it
///
/// This is a convenience function combining [`std::fs::read`] and
/// [`Extractor::run`].
pub fn extract_file(
    path: impl AsRef<Path>,
    options: ExtractOptions,
    sink: &mut dyn Sink,
) -> Result<ExtractReport> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Extractor::new(options).run(&data, sink)
}
