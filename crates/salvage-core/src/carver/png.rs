//! PNG carving.
//!
//! A PNG resource runs from its 8-byte signature up to and including the first
//! zero-length `IEND` chunk that follows it. The carver is a two-state machine
//! driven by [`PngCarver::step`]; chunk contents are not inspected.

use super::pattern::{fixed, PatternByte, Signature};
use super::{Carver, CarverConfig, Format, Segment};
use crate::error::Result;
use std::ops::Range;
use tracing::{debug, trace};

const PNG_PATTERN: [PatternByte; 8] = fixed([0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

//                                    length 0            I     E     N     D   ------- crc -------
const IEND_PATTERN: [PatternByte; 12] = fixed([
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
]);

/// The PNG file signature
pub const PNG_SIGNATURE: Signature = Signature::new("PNG signature", &PNG_PATTERN);

/// A complete zero-length `IEND` chunk, CRC included
pub const IEND_FOOTER: Signature = Signature::new("IEND footer", &IEND_PATTERN);

/// Scanning state of the PNG carver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngState {
    /// Looking for a PNG signature
    #[default]
    Searching,
    /// Inside a PNG that started at `start`, looking for its footer
    InSegment {
        /// Offset of the signature that opened this segment
        start: usize,
    },
}

/// Outcome of a single [`PngCarver::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State to continue in
    pub next: PngState,
    /// How far to move the cursor
    pub advance: usize,
    /// A completed segment, if the footer was found
    pub emitted: Option<Range<usize>>,
}

/// Carver for embedded PNG images
#[derive(Debug, Clone, Default)]
pub struct PngCarver {
    config: CarverConfig,
}

impl PngCarver {
    /// Creates a new PNG carver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new PNG carver with custom configuration
    pub fn with_config(config: CarverConfig) -> Self {
        Self { config }
    }

    /// Computes the transition from `state` at `offset`
    pub fn step(state: PngState, data: &[u8], offset: usize) -> Transition {
        match state {
            PngState::Searching if PNG_SIGNATURE.matches_at(data, offset) => Transition {
                next: PngState::InSegment { start: offset },
                advance: PNG_SIGNATURE.len(),
                emitted: None,
            },
            PngState::InSegment { start } if IEND_FOOTER.matches_at(data, offset) => Transition {
                next: PngState::Searching,
                advance: IEND_FOOTER.len(),
                emitted: Some(start..offset + IEND_FOOTER.len()),
            },
            _ => Transition {
                next: state,
                advance: 1,
                emitted: None,
            },
        }
    }
}

impl Carver for PngCarver {
    fn format(&self) -> Format {
        Format::Png
    }

    fn scan(&self, data: &[u8]) -> Result<Vec<Segment>> {
        let mut results = Vec::new();
        let mut state = PngState::Searching;
        let mut position = 0;

        debug!("Starting PNG scan of {} bytes", data.len());

        while position < data.len() {
            let transition = Self::step(state, data, position);

            if let (PngState::Searching, PngState::InSegment { start }) = (state, transition.next) {
                debug!("Found {} at position {}", PNG_SIGNATURE.name(), start);
            }

            state = transition.next;

            if let Some(range) = transition.emitted {
                trace!("Found {} at position {}", IEND_FOOTER.name(), position);
                debug!(
                    "Found PNG at {}..{} ({} bytes)",
                    range.start,
                    range.end,
                    range.len()
                );
                results.push(Segment::copy_from(data, range)?);

                if self.config.limit_reached(results.len()) {
                    break;
                }
            }

            position += transition.advance;
        }

        if let PngState::InSegment { start } = state {
            debug!("Dropping unterminated PNG starting at position {}", start);
        }

        debug!("PNG scan complete: found {} images", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fake_png, FOOTER_BYTES, SIGNATURE_BYTES};
    use pretty_assertions::assert_eq;

    fn scan(data: &[u8]) -> Vec<Segment> {
        PngCarver::new().scan(data).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(scan(&[]).is_empty());
    }

    #[test]
    fn test_no_signature() {
        assert!(scan(b"just some bytes without any image in them").is_empty());
        assert!(scan(&FOOTER_BYTES).is_empty());
    }

    #[test]
    fn test_step_transitions() {
        let png = fake_png(4, 0x11);

        let t = PngCarver::step(PngState::Searching, &png, 0);
        assert_eq!(t.next, PngState::InSegment { start: 0 });
        assert_eq!(t.advance, 8);
        assert_eq!(t.emitted, None);

        let t = PngCarver::step(t.next, &png, 8);
        assert_eq!(t.next, PngState::InSegment { start: 0 });
        assert_eq!(t.advance, 1);

        let t = PngCarver::step(PngState::InSegment { start: 0 }, &png, 12);
        assert_eq!(t.next, PngState::Searching);
        assert_eq!(t.advance, 12);
        assert_eq!(t.emitted, Some(0..24));
    }

    #[test]
    fn test_searching_ignores_footer() {
        let t = PngCarver::step(PngState::Searching, &FOOTER_BYTES, 0);
        assert_eq!(t.next, PngState::Searching);
        assert_eq!(t.emitted, None);
    }

    #[test]
    fn test_known_offsets() {
        let mut data = vec![0xEEu8; 1000];
        data[10..18].copy_from_slice(&SIGNATURE_BYTES);
        data[510..522].copy_from_slice(&FOOTER_BYTES);

        let results = scan(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 10..522);
        assert_eq!(results[0].len(), 512);
        assert_eq!(results[0].as_bytes(), &data[10..522]);
    }

    #[test]
    fn test_back_to_back() {
        let images = [fake_png(30, 0x01), fake_png(0, 0x02), fake_png(100, 0x03)];
        let data = images.concat();

        let results = scan(&data);
        assert_eq!(results.len(), images.len());
        for (segment, image) in results.iter().zip(&images) {
            assert_eq!(segment.as_bytes(), image.as_slice());
        }
    }

    #[test]
    fn test_unterminated_is_dropped() {
        let mut data = b"header".to_vec();
        data.extend(fake_png(20, 0x05));
        data.extend_from_slice(&SIGNATURE_BYTES);
        data.extend_from_slice(&[0x33; 64]);

        let results = scan(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 6..46);
    }

    #[test]
    fn test_footer_must_be_complete() {
        let mut data = SIGNATURE_BYTES.to_vec();
        data.extend_from_slice(&FOOTER_BYTES[..11]);
        assert!(scan(&data).is_empty());
    }

    #[test]
    fn test_nested_signature_not_reopened() {
        // The inner signature is part of the outer image
        let mut data = SIGNATURE_BYTES.to_vec();
        data.extend(fake_png(5, 0x09));
        data.extend_from_slice(&FOOTER_BYTES);

        let results = scan(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 0..33);
    }

    #[test]
    fn test_max_results() {
        let data = [fake_png(1, 0), fake_png(2, 0), fake_png(3, 0)].concat();
        let carver = PngCarver::with_config(CarverConfig::new().max_results(2));
        assert_eq!(carver.scan(&data).unwrap().len(), 2);
    }

    #[test]
    fn test_rescan_is_identical() {
        let data = [b"junk".to_vec(), fake_png(17, 0x42), b"tail".to_vec()].concat();
        let first = scan(&data);
        let second = scan(&data);
        assert_eq!(first, second);

        let mut host = vec![0u8; 4];
        host.extend_from_slice(first[0].as_bytes());
        host.extend_from_slice(&[0u8; 9]);
        let again = scan(&host);
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].as_bytes(), first[0].as_bytes());
        assert_eq!(again[0].range, first[0].range);
    }
}
