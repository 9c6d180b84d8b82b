//! Byte signature matching.
//!
//! Every carver locates resources by testing a fixed-length [`Signature`] at
//! successive offsets of the input. A signature is a sequence of
//! [`PatternByte`]s, each either a literal byte or a wildcard that accepts any
//! value (used for size fields embedded in a header).
//!
//! Matching never reads out of bounds: a pattern that would run past the end
//! of the buffer simply does not match.

/// A single element of a byte signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternByte {
    /// Matches exactly this byte
    Fixed(u8),
    /// Matches any byte
    Wildcard,
}

impl PatternByte {
    /// Returns true if `byte` satisfies this element
    #[inline]
    pub fn accepts(self, byte: u8) -> bool {
        match self {
            PatternByte::Fixed(expected) => expected == byte,
            PatternByte::Wildcard => true,
        }
    }
}

/// A named, fixed-length byte signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    name: &'static str,
    pattern: &'static [PatternByte],
}

impl Signature {
    /// Creates a signature from a static pattern
    pub const fn new(name: &'static str, pattern: &'static [PatternByte]) -> Self {
        Self { name, pattern }
    }

    /// Human-readable name, used in log messages
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The pattern elements
    pub fn pattern(&self) -> &'static [PatternByte] {
        self.pattern
    }

    /// Number of bytes the signature spans
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Returns true for an empty pattern
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Tests whether the signature matches `data` at `offset`
    pub fn matches_at(&self, data: &[u8], offset: usize) -> bool {
        matches_at(data, offset, self.pattern)
    }

    /// Returns the first offset at or after `from` where the signature matches
    pub fn find_from(&self, data: &[u8], from: usize) -> Option<usize> {
        (from..data.len()).find(|&offset| self.matches_at(data, offset))
    }
}

/// Tests whether `pattern` matches `data` starting at `offset`.
///
/// Returns false when the pattern would extend past the end of `data`.
pub fn matches_at(data: &[u8], offset: usize, pattern: &[PatternByte]) -> bool {
    let Some(end) = offset.checked_add(pattern.len()) else {
        return false;
    };
    let Some(window) = data.get(offset..end) else {
        return false;
    };

    pattern
        .iter()
        .zip(window)
        .all(|(element, &byte)| element.accepts(byte))
}

/// Builds a pattern of fixed bytes at compile time
pub(crate) const fn fixed<const N: usize>(bytes: [u8; N]) -> [PatternByte; N] {
    let mut out = [PatternByte::Wildcard; N];
    let mut i = 0;
    while i < N {
        out[i] = PatternByte::Fixed(bytes[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PatternByte::{Fixed, Wildcard};

    const ABC: [PatternByte; 3] = fixed(*b"ABC");
    const A_C: [PatternByte; 3] = [Fixed(b'A'), Wildcard, Fixed(b'C')];

    #[test]
    fn test_fixed_match() {
        let data = b"xxABCyy";
        assert!(matches_at(data, 2, &ABC));
        assert!(!matches_at(data, 1, &ABC));
        assert!(!matches_at(data, 3, &ABC));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(matches_at(b"AzC", 0, &A_C));
        assert!(matches_at(b"A\xffC", 0, &A_C));
        assert!(!matches_at(b"AzD", 0, &A_C));
    }

    #[test]
    fn test_out_of_range_is_no_match() {
        let data = b"xxAB";
        assert!(!matches_at(data, 2, &ABC));
        assert!(!matches_at(data, 10, &ABC));
        assert!(!matches_at(data, usize::MAX, &ABC));
        assert!(!matches_at(&[], 0, &ABC));
    }

    #[test]
    fn test_empty_pattern_matches_in_range() {
        assert!(matches_at(b"abc", 0, &[]));
        assert!(matches_at(b"abc", 3, &[]));
    }

    #[test]
    fn test_signature_find_from() {
        const SIG: Signature = Signature::new("abc", &ABC);
        let data = b"ABC..ABC";
        assert_eq!(SIG.len(), 3);
        assert_eq!(SIG.find_from(data, 0), Some(0));
        assert_eq!(SIG.find_from(data, 1), Some(5));
        assert_eq!(SIG.find_from(data, 6), None);
        assert_eq!(SIG.find_from(data, 100), None);
    }
}
