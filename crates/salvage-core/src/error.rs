//! Error types for the salvage-core library.
//!
//! This module provides error handling using the `thiserror` crate. Variants
//! fall into three groups: configuration problems detected before scanning,
//! malformed resources found while carving, and failures writing output.

use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for salvage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all salvage operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an extracted resource
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Output location is missing or is not a directory
    #[error("directory does not exist: '{path}'")]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// Unrecognized format selector
    #[error("unknown format '{value}': expected one of png, wav, wave, all")]
    UnknownFormat {
        /// The string that failed to parse
        value: String,
    },

    /// A resource extent reaches past the end of the input buffer
    #[error("segment {}..{} is out of range for a buffer of {len} bytes", .range.start, .range.end)]
    OutOfRange {
        /// Requested byte range
        range: Range<usize>,
        /// Length of the buffer being carved
        len: usize,
    },

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new missing directory error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Creates a new unknown format error
    pub fn unknown_format(value: impl Into<String>) -> Self {
        Self::UnknownFormat {
            value: value.into(),
        }
    }

    /// Creates a new out-of-range error
    pub fn out_of_range(range: Range<usize>, len: usize) -> Self {
        Self::OutOfRange { range, len }
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a per-segment error that a carver can skip
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Returns true if this error was raised before any scanning took place
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::NotADirectory { .. } | Self::UnknownFormat { .. }
        )
    }
}
