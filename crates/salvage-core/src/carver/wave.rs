//! RIFF/WAVE carving.
//!
//! A WAVE resource starts with the 12-byte header `RIFF <size> WAVE`. Its
//! extent is the little-endian `size` field plus the 4 bytes of the `RIFF`
//! tag. Headers whose declared extent runs past the end of the input are
//! handled according to an [`OversizePolicy`].

use super::pattern::{PatternByte, Signature};
use super::{Carver, CarverConfig, Format, Segment};
use crate::error::Result;
use tracing::{debug, trace, warn};

use super::pattern::PatternByte::{Fixed, Wildcard};

const WAVE_PATTERN: [PatternByte; 12] = [
    Fixed(b'R'),
    Fixed(b'I'),
    Fixed(b'F'),
    Fixed(b'F'),
    Wildcard,
    Wildcard,
    Wildcard,
    Wildcard,
    Fixed(b'W'),
    Fixed(b'A'),
    Fixed(b'V'),
    Fixed(b'E'),
];

/// The `RIFF <size> WAVE` header
pub const WAVE_HEADER: Signature = Signature::new("RIFF/WAVE header", &WAVE_PATTERN);

/// Offset of the size field within the header
const SIZE_FIELD: usize = 4;

/// Length of the `RIFF` tag, which the size field does not count
const RIFF_TAG_LEN: usize = 4;

/// What to do with a header whose declared size runs past the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizePolicy {
    /// Drop the header and keep scanning at the next offset
    #[default]
    Reject,
    /// Emit everything up to the end of the input and stop
    Clamp,
}

/// Carver for embedded RIFF/WAVE audio
#[derive(Debug, Clone, Default)]
pub struct WaveCarver {
    config: CarverConfig,
    oversize: OversizePolicy,
}

impl WaveCarver {
    /// Creates a new WAVE carver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new WAVE carver with custom configuration
    pub fn with_config(config: CarverConfig) -> Self {
        Self {
            config,
            oversize: OversizePolicy::default(),
        }
    }

    /// Sets the policy for oversized declarations
    pub fn oversize(mut self, policy: OversizePolicy) -> Self {
        self.oversize = policy;
        self
    }

    /// Total resource length declared by the header at `offset`.
    ///
    /// The caller must have matched [`WAVE_HEADER`] at `offset`.
    pub fn declared_length(data: &[u8], offset: usize) -> Option<usize> {
        let field = data.get(offset + SIZE_FIELD..offset + SIZE_FIELD + 4)?;
        let declared = u32::from_le_bytes(field.try_into().ok()?);
        usize::try_from(declared).ok()?.checked_add(RIFF_TAG_LEN)
    }
}

impl Carver for WaveCarver {
    fn format(&self) -> Format {
        Format::Wave
    }

    fn scan(&self, data: &[u8]) -> Result<Vec<Segment>> {
        let mut results = Vec::new();
        let mut position = 0;

        debug!("Starting WAVE scan of {} bytes", data.len());

        while position < data.len() {
            let Some(found) = WAVE_HEADER.find_from(data, position) else {
                break;
            };
            position = found;

            // A length that does not fit in usize is oversized by definition
            let length = Self::declared_length(data, position).unwrap_or(usize::MAX);
            debug!(
                "Found {} at position {}, size = {:#x} ({}) bytes",
                WAVE_HEADER.name(),
                position,
                length,
                length
            );

            let end = position.saturating_add(length);
            let segment = match Segment::copy_from(data, position..end) {
                Ok(segment) => segment,
                Err(e) if e.is_recoverable() => match self.oversize {
                    OversizePolicy::Reject => {
                        warn!("Skipping WAVE header at position {}: {}", position, e);
                        position += 1;
                        continue;
                    }
                    OversizePolicy::Clamp => {
                        warn!(
                            "Clamping WAVE at position {} to end of input: {}",
                            position, e
                        );
                        results.push(Segment::copy_from(data, position..data.len())?);
                        break;
                    }
                },
                Err(e) => return Err(e),
            };

            trace!("Advancing past WAVE by {} bytes", length);
            results.push(segment);

            if self.config.limit_reached(results.len()) {
                break;
            }

            position = end;
        }

        debug!("WAVE scan complete: found {} streams", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fake_wave;
    use pretty_assertions::assert_eq;

    fn scan(data: &[u8]) -> Vec<Segment> {
        WaveCarver::new().scan(data).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(scan(&[]).is_empty());
    }

    #[test]
    fn test_no_header() {
        assert!(scan(b"RIFF....AVI plus some other bytes").is_empty());
        assert!(scan(b"RIFF\x24\x00\x00\x00WAV").is_empty());
    }

    #[test]
    fn test_declared_size_plus_tag() {
        let mut data = b"RIFF\x24\x00\x00\x00WAVE".to_vec();
        data.resize(40, 0x01);
        data.extend_from_slice(b"trailing bytes");

        let results = scan(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 0..40);
        assert_eq!(results[0].len(), 36 + 4);
    }

    #[test]
    fn test_declared_length() {
        let data = b"RIFF\x01\x02\x03\x04WAVE";
        assert_eq!(WaveCarver::declared_length(data, 0), Some(0x0403_0201 + 4));
        assert_eq!(WaveCarver::declared_length(data, 6), None);
    }

    #[test]
    fn test_back_to_back() {
        let streams = [fake_wave(20, 0x10), fake_wave(0, 0x20), fake_wave(300, 0x30)];
        let mut data = b"prefix".to_vec();
        for stream in &streams {
            data.extend_from_slice(stream);
        }

        let results = scan(&data);
        assert_eq!(results.len(), streams.len());
        for (segment, stream) in results.iter().zip(&streams) {
            assert_eq!(segment.as_bytes(), stream.as_slice());
        }
        assert_eq!(results[0].start(), 6);
    }

    #[test]
    fn test_header_inside_stream_is_skipped() {
        let inner = fake_wave(4, 0x00);
        let mut outer = b"RIFF\x00\x00\x00\x00WAVE".to_vec();
        outer.extend_from_slice(&inner);
        let declared = (outer.len() - 4) as u32;
        outer[4..8].copy_from_slice(&declared.to_le_bytes());

        let results = scan(&outer);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 0..outer.len());
    }

    #[test]
    fn test_oversize_rejected() {
        let mut data = b"RIFF\xff\xff\x00\x00WAVE".to_vec();
        data.extend_from_slice(&[0u8; 32]);
        data.extend(fake_wave(8, 0x44));

        let results = scan(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].start(), 44);
    }

    #[test]
    fn test_oversize_clamped() {
        let mut data = b"junk".to_vec();
        data.extend_from_slice(b"RIFF\xff\xff\xff\xffWAVE");
        data.extend(fake_wave(8, 0x44));

        let carver = WaveCarver::new().oversize(OversizePolicy::Clamp);
        let results = carver.scan(&data).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 4..data.len());
    }

    #[test]
    fn test_max_results() {
        let data = [fake_wave(1, 0), fake_wave(2, 0), fake_wave(3, 0)].concat();
        let carver = WaveCarver::with_config(CarverConfig::new().max_results(1));
        let results = carver.scan(&data).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].range, 0..13);
    }

    #[test]
    fn test_rescan_is_identical() {
        let data = [b"..".to_vec(), fake_wave(50, 0x7f), b"..".to_vec()].concat();
        assert_eq!(scan(&data), scan(&data));
    }
}
