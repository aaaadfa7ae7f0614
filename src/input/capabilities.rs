//! Capability bitmask parsing
//!
//! The kernel exposes each capability type of an input device as a bitmask
//! printed in hex, split into 64-bit chunks with the most significant chunk
//! first, e.g. `"7fff000000000000 0 100040000000 0 0"`. Every set bit is one
//! capability code (a key or button number for the "key" type).

use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Numeric identifier of a single input capability
pub type CapabilityCode = u64;

/// Bits per bitmask chunk
const CHUNK_BITS: u64 = u64::BITS as u64;

/// Longest valid chunk, in hex digits
const MAX_CHUNK_DIGITS: usize = 16;

/// A chunk of the bitmask that is not a 64-bit hex number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityParseError {
    #[error("invalid capability chunk {chunk:?}: not a hexadecimal number")]
    NotHex { chunk: String },

    #[error("invalid capability chunk {chunk:?}: more than 64 bits")]
    TooWide { chunk: String },

    #[error("capability bitmask has too many chunks ({count})")]
    TooManyChunks { count: usize },

    #[error("invalid capability chunk {chunk:?}")]
    Malformed {
        chunk: String,
        #[source]
        source: ParseIntError,
    },
}

/// Codes of every capability bit set in a bitmask
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    codes: Vec<CapabilityCode>,
}

impl CapabilitySet {
    #[cfg(test)]
    pub fn codes(&self) -> &[CapabilityCode] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = CapabilityCode> + '_ {
        self.codes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, code: CapabilityCode) -> bool {
        self.codes.contains(&code)
    }
}

impl FromIterator<CapabilityCode> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = CapabilityCode>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

impl FromStr for CapabilitySet {
    type Err = CapabilityParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_capabilities(raw)
    }
}

/// Parse the contents of a capabilities file into the list of set bits
///
/// The last chunk holds bits 0-63, the one before it bits 64-127 and so on.
/// Any malformed chunk fails the whole bitmask; an empty string is malformed.
pub fn parse_capabilities(raw: &str) -> Result<CapabilitySet, CapabilityParseError> {
    let chunks: Vec<&str> = raw.split(' ').collect();
    let mut codes = Vec::new();

    for (index, chunk) in chunks.iter().enumerate() {
        let offset = chunk_offset(chunks.len(), index)?;
        let value = parse_chunk(chunk)?;
        if value == 0 {
            continue;
        }

        for bit in 0..CHUNK_BITS {
            if value & (1u64 << bit) != 0 {
                codes.push(offset + bit);
            }
        }
    }

    Ok(CapabilitySet { codes })
}

/// First code covered by chunk `index` of `count`, counting from the left
fn chunk_offset(count: usize, index: usize) -> Result<CapabilityCode, CapabilityParseError> {
    CapabilityCode::try_from(count - index - 1)
        .ok()
        .and_then(|position| position.checked_mul(CHUNK_BITS))
        // the highest bit of the chunk must fit as well
        .filter(|offset| offset.checked_add(CHUNK_BITS - 1).is_some())
        .ok_or(CapabilityParseError::TooManyChunks { count })
}

fn parse_chunk(chunk: &str) -> Result<u64, CapabilityParseError> {
    let digits = chunk.replace('\n', "");

    // from_str_radix accepts a leading '+', the kernel never prints one
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CapabilityParseError::NotHex {
            chunk: chunk.to_string(),
        });
    }
    if digits.trim_start_matches('0').len() > MAX_CHUNK_DIGITS {
        return Err(CapabilityParseError::TooWide {
            chunk: chunk.to_string(),
        });
    }

    u64::from_str_radix(&digits, 16).map_err(|source| CapabilityParseError::Malformed {
        chunk: chunk.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(set: &CapabilitySet) -> Vec<CapabilityCode> {
        let mut codes = set.codes().to_vec();
        codes.sort_unstable();
        codes
    }

    #[test]
    fn test_zero_is_empty() {
        let caps = parse_capabilities("0").unwrap();
        assert!(caps.is_empty());
    }

    #[test]
    fn test_trailing_newline_is_ignored() {
        let caps = parse_capabilities("3\n").unwrap();
        assert_eq!(sorted(&caps), vec![0, 1]);
    }

    #[test]
    fn test_keyboard_ev_bits() {
        // "AT Translated Set 2 keyboard" ev bitmask: SYN, KEY, MSC, LED, REP
        let caps = parse_capabilities("120013").unwrap();
        assert_eq!(sorted(&caps), vec![0x00, 0x01, 0x04, 0x11, 0x14]);
    }

    #[test]
    fn test_lid_switch_ev_bits() {
        let caps = parse_capabilities("21").unwrap();
        assert_eq!(sorted(&caps), vec![0x00, 0x05]);
    }

    #[test]
    fn test_pc_speaker_ev_bits() {
        let caps = parse_capabilities("40001").unwrap();
        assert_eq!(sorted(&caps), vec![0x00, 0x12]);
    }

    #[test]
    fn test_mouse_key_bits() {
        let caps = parse_capabilities("30000 0 0 0 0").unwrap();
        assert_eq!(sorted(&caps), vec![0x110, 0x111]); // BTN_LEFT, BTN_RIGHT
    }

    #[test]
    fn test_xbox_controller_key_bits() {
        let caps = parse_capabilities("7fff000000000000 0 100040000000 0 0").unwrap();

        let mut expected: Vec<CapabilityCode> = vec![0x9E, 0xAC]; // KEY_BACK, KEY_HOMEPAGE
        expected.extend(0x130..=0x13E); // BTN_SOUTH..BTN_THUMBR
        assert_eq!(sorted(&caps), expected);
    }

    #[test]
    fn test_leftmost_chunk_is_most_significant() {
        let caps = parse_capabilities("1 0").unwrap();
        assert_eq!(caps.codes(), &[64]);
    }

    #[test]
    fn test_codes_ascend_within_chunk() {
        let caps = parse_capabilities("8000000000000001 5").unwrap();
        assert_eq!(caps.codes(), &[64, 127, 0, 2]);
    }

    #[test]
    fn test_count_matches_popcount() {
        let chunks = ["ffffffffffffffff", "0", "123456789abcdef0", "f0f0"];
        let raw = chunks.join(" ");
        let expected: u32 = chunks
            .iter()
            .map(|c| u64::from_str_radix(c, 16).unwrap().count_ones())
            .sum();

        let caps = parse_capabilities(&raw).unwrap();
        assert_eq!(caps.len(), expected as usize);
        assert!(caps.iter().all(|code| code < 64 * chunks.len() as u64));
    }

    #[test]
    fn test_offsets_beyond_32_bits() {
        // 2^26 chunks to the right put the leftmost one at bit 2^32
        assert_eq!(chunk_offset((1 << 26) + 1, 0), Ok(1 << 32));
        assert_eq!(chunk_offset((1 << 26) + 1, 1 << 26), Ok(0));
    }

    #[test]
    fn test_chunk_offset_overflow_is_error() {
        let count = usize::MAX;
        assert_eq!(
            chunk_offset(count, 0),
            Err(CapabilityParseError::TooManyChunks { count })
        );
    }

    #[test]
    fn test_zero_chunks_contribute_nothing() {
        let raw = format!("1{}", " 0".repeat(4096));
        let caps = parse_capabilities(&raw).unwrap();
        assert_eq!(caps.codes(), &[4096 * 64]);
    }

    #[test]
    fn test_leading_zeros_allowed() {
        let caps = parse_capabilities("0000000000000000000000001").unwrap();
        assert_eq!(caps.codes(), &[0]);
    }

    #[test]
    fn test_non_hex_chunk_is_error() {
        let err = parse_capabilities("7fff 0 xyz 0").unwrap_err();
        assert_eq!(
            err,
            CapabilityParseError::NotHex {
                chunk: "xyz".to_string()
            }
        );
    }

    #[test]
    fn test_sign_is_rejected() {
        assert!(parse_capabilities("+1").is_err());
    }

    #[test]
    fn test_chunk_wider_than_64_bits_is_error() {
        let err = parse_capabilities("10000000000000000").unwrap_err();
        assert!(matches!(err, CapabilityParseError::TooWide { .. }));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(parse_capabilities("").is_err());
    }

    #[test]
    fn test_double_space_is_error() {
        assert!(parse_capabilities("1  0").is_err());
    }

    #[test]
    fn test_from_str() {
        let caps: CapabilitySet = "30000 0 0 0 0".parse().unwrap();
        assert!(caps.contains(0x110));
        assert!(!caps.contains(0x112));
    }
}
