//! # M-Bus Error Handling
//!
//! This module defines the MBusError enum, which represents the different error
//! types that can occur in the mbus-telegram crate.
//!
//! Only frame-integrity failures and bad request arguments are errors. A data
//! record stream that ends early, an unknown VIF, or a malformed BCD value are
//! absorbed by the decoder and never reach the caller as `Err`.

use thiserror::Error;

/// Represents the different error types that can occur in the M-Bus crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MBusError {
    /// The buffer is shorter than the frame type requires.
    #[error("Frame too short: {actual} bytes, need at least {required}")]
    FrameTooShort { required: usize, actual: usize },

    /// A start byte is not the expected envelope marker.
    #[error("Invalid start byte at offset {offset}: 0x{value:02X}")]
    InvalidStartByte { offset: usize, value: u8 },

    /// The two length bytes of a long frame differ.
    #[error("Length bytes differ: 0x{0:02X} != 0x{1:02X}")]
    LengthFieldMismatch(u8, u8),

    /// The buffer length does not match the length field.
    #[error("Frame length mismatch: length field {length_field} implies {expected} bytes, got {actual}")]
    FrameLengthMismatch {
        length_field: u8,
        expected: usize,
        actual: usize,
    },

    /// The checksum byte does not match the data region.
    #[error("Invalid checksum: expected {expected}, calculated {calculated}")]
    InvalidChecksum { expected: u8, calculated: u8 },

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string")]
    InvalidHexString,

    /// Secondary address with more digits than fit into four bytes.
    #[error("Invalid secondary address: {0}")]
    InvalidSecondaryAddress(String),

    /// Manufacturer code that is not three ASCII letters.
    #[error("Invalid manufacturer")]
    InvalidManufacturer,
}

impl MBusError {
    /// Check if this error reports a corrupted or incomplete telegram.
    ///
    /// Such telegrams should be discarded and requested again.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::InvalidStartByte { .. }
                | Self::LengthFieldMismatch(..)
                | Self::FrameLengthMismatch { .. }
                | Self::InvalidChecksum { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MBusError::InvalidChecksum {
            expected: 0x10,
            calculated: 0x20,
        };
        assert_eq!(err.to_string(), "Invalid checksum: expected 16, calculated 32");

        let err = MBusError::InvalidStartByte {
            offset: 3,
            value: 0x10,
        };
        assert_eq!(err.to_string(), "Invalid start byte at offset 3: 0x10");

        let err = MBusError::LengthFieldMismatch(0x31, 0x30);
        assert_eq!(err.to_string(), "Length bytes differ: 0x31 != 0x30");
    }

    #[test]
    fn test_is_frame_error() {
        assert!(MBusError::FrameTooShort {
            required: 19,
            actual: 5
        }
        .is_frame_error());
        assert!(MBusError::LengthFieldMismatch(1, 2).is_frame_error());
        assert!(!MBusError::InvalidHexString.is_frame_error());
        assert!(!MBusError::InvalidSecondaryAddress("123456789".into()).is_frame_error());
    }
}
