//! # Utility Modules
//!
//! Helpers shared by the library, the command line tool and the tests.

pub mod hex;

pub use hex::{decode_hex, encode_hex_upper, format_hex_compact, hex_to_bytes};
