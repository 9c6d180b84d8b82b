//! # salvage-core
//!
//! A library for carving embedded PNG images and RIFF/WAVE audio out of
//! arbitrary binary files.
//!
//! This crate provides the core functionality for:
//! - Locating format signatures inside an opaque byte buffer
//! - Determining the exact extent of each embedded resource
//! - Handing the carved bytes to a [`Sink`] with sequential indices
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`carver`]: Signature matching and the per-format carvers
//! - [`sink`]: Destinations for carved resources
//! - [`extract`]: Running the carvers over an input
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use salvage_core::{extract_file, DirectorySink, ExtractOptions, FormatFilter};
//!
//! let mut sink = DirectorySink::new("./out")?;
//! let options = ExtractOptions::new().filter(FormatFilter::Png);
//! let report = extract_file("./game.dat", options, &mut sink)?;
//! println!("extracted {} images", report.png.count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`Carver`]: Add carving strategies for other formats
//! - [`Sink`]: Customize where carved resources go

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod carver;
pub mod error;
pub mod extract;
pub mod sink;

// Re-export primary types for convenience
pub use carver::{
    Carver, CarverConfig, Format, FormatFilter, OversizePolicy, PngCarver, Segment, WaveCarver,
};
pub use error::{Error, Result};
pub use extract::{extract_file, ExtractOptions, ExtractReport, Extractor, FormatStats};
pub use sink::{CollectSink, DirectorySink, Sink};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
