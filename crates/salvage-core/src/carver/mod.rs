//! Signature-based carving of embedded resources.
//!
//! This module finds PNG images and RIFF/WAVE audio that are concatenated with
//! or buried inside an arbitrary host binary and copies each one out as a
//! [`Segment`].
//!
//! ## Algorithm Overview
//!
//! Each carver makes one linear pass over the input:
//!
//! 1. Test the format's header [`Signature`] at the current offset
//! 2. Determine the resource's extent (terminal marker for PNG, declared size
//!    for WAVE)
//! 3. Copy the bytes out and jump the cursor past the consumed region
//!
//! Results from a single pass never overlap and are ordered by start offset.
//!
//! ## Extensibility
//!
//! The [`Carver`] trait allows additional carving strategies:
//!
//! ```no_run
//! use salvage_core::carver::{Carver, Format, Segment};
//! use salvage_core::Result;
//!
//! struct NothingCarver;
//!
//! impl Carver for NothingCarver {
//!     fn format(&self) -> Format {
//!         Format::Png
//!     }
//!
//!     fn scan(&self, data: &[u8]) -> Result<Vec<Segment>> {
//!         Ok(vec![])
//!     }
//! }
//! ```

mod pattern;
mod png;
mod wave;

use crate::error::{Error, Result};
use bytes::Bytes;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

pub use pattern::{matches_at, PatternByte, Signature};
pub use png::{PngCarver, PngState, Transition, IEND_FOOTER, PNG_SIGNATURE};
pub use wave::{OversizePolicy, WaveCarver, WAVE_HEADER};

/// A resource carved out of the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The copied bytes of the resource
    pub data: Bytes,
    /// Byte range in the original input where this was found
    pub range: Range<usize>,
}

impl Segment {
    /// Copies `range` out of `data`.
    ///
    /// Fails with [`Error::OutOfRange`] if the range is empty or extends past
    /// the end of the buffer.
    pub fn copy_from(data: &[u8], range: Range<usize>) -> Result<Self> {
        if range.start >= range.end {
            return Err(Error::out_of_range(range, data.len()));
        }
        let Some(bytes) = data.get(range.clone()) else {
            return Err(Error::out_of_range(range, data.len()));
        };

        Ok(Self {
            data: Bytes::copy_from_slice(bytes),
            range,
        })
    }

    /// Returns the data as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Offset of the first byte in the input
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Number of bytes in the segment
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a segment built through [`Segment::copy_from`]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Embedded resource formats understood by the carvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// PNG image
    Png,
    /// RIFF/WAVE audio
    Wave,
}

impl Format {
    /// All supported formats, in the order they are extracted
    pub const ALL: [Format; 2] = [Format::Png, Format::Wave];

    /// File extension for extracted resources
    pub fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Wave => "wav",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Png => f.write_str("PNG"),
            Format::Wave => f.write_str("WAVE"),
        }
    }
}

/// Selects which formats to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatFilter {
    /// PNG images only
    Png,
    /// WAVE audio only
    Wave,
    /// Both PNG and WAVE
    #[default]
    All,
}

impl FormatFilter {
    /// Returns true if `format` passes the filter
    pub fn includes(self, format: Format) -> bool {
        match self {
            FormatFilter::Png => format == Format::Png,
            FormatFilter::Wave => format == Format::Wave,
            FormatFilter::All => true,
        }
    }

    /// Formats selected by this filter, in extraction order
    pub fn formats(self) -> impl Iterator<Item = Format> {
        Format::ALL.into_iter().filter(move |f| self.includes(*f))
    }
}

impl FromStr for FormatFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(FormatFilter::Png),
            "wav" | "wave" => Ok(FormatFilter::Wave),
            "all" => Ok(FormatFilter::All),
            _ => Err(Error::unknown_format(s)),
        }
    }
}

/// Configuration shared by the carvers
#[derive(Debug, Clone, Default)]
pub struct CarverConfig {
    /// Maximum number of segments to return per pass (0 = unlimited)
    pub max_results: usize,
}

impl CarverConfig {
    /// Creates a new carver config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of results to return
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Returns true once `found` segments satisfy the configured limit
    pub(crate) fn limit_reached(&self, found: usize) -> bool {
        self.max_results > 0 && found >= self.max_results
    }
}

/// Trait for format-specific carving strategies
///
/// Implementations must only read the buffer, so a single input can be
/// handed to several carvers in any order.
pub trait Carver: Send + Sync {
    /// The format this carver extracts
    fn format(&self) -> Format;

    /// Scan the provided data and copy out every complete resource
    fn scan(&self, data: &[u8]) -> Result<Vec<Segment>>;
}

/// Builds the default carver for `format`
pub fn carver_for(
    format: Format,
    config: CarverConfig,
    oversize: OversizePolicy,
) -> Box<dyn Carver> {
    match format {
        Format::Png => Box::new(PngCarver::with_config(config)),
        Format::Wave => Box::new(WaveCarver::with_config(config).oversize(oversize)),
    }
}
