//! # Hex Encoding/Decoding Utilities
//!
//! Telegrams are usually handed around as hex strings, either copied from a
//! serial sniffer or stored in test fixtures. These helpers convert between
//! that text form and raw bytes.
//!
//! ```rust
//! use mbus_telegram::util::hex::{decode_hex, format_hex_compact};
//!
//! let data = decode_hex("68 31 31 68").unwrap();
//! assert_eq!(data, [0x68, 0x31, 0x31, 0x68]);
//! assert_eq!(format_hex_compact(&data), "68 31 31 68");
//! ```

use crate::error::MBusError;

/// Encode bytes to uppercase hex string
pub fn encode_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters.
/// Whitespace is stripped.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, MBusError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() || cleaned.len() % 2 != 0 {
        return Err(MBusError::InvalidHexString);
    }

    hex::decode(&cleaned).map_err(|_| MBusError::InvalidHexString)
}

/// Formats data as "68 31 31 68" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Helper for creating test data from hex strings.
///
/// Panics on invalid hex (intended for test code only).
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    decode_hex(hex).expect("Invalid hex in test data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_case() {
        assert_eq!(encode_hex_upper(&[0xAB, 0xCD, 0xEF]), "ABCDEF");
    }

    #[test]
    fn test_decode_with_whitespace() {
        let expected = vec![0x68, 0x31, 0x31, 0x68];
        assert_eq!(decode_hex("68 31 31 68").unwrap(), expected);
        assert_eq!(decode_hex("6831\n3168\n").unwrap(), expected);
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_hex_compact(&[0x68, 0x0B, 0xE5]), "68 0B E5");
        assert_eq!(format_hex_compact(&[]), "");
    }

    #[test]
    fn test_errors() {
        assert_eq!(decode_hex(""), Err(MBusError::InvalidHexString));
        assert_eq!(decode_hex("1"), Err(MBusError::InvalidHexString));
        assert_eq!(decode_hex("GG"), Err(MBusError::InvalidHexString));
    }
}
