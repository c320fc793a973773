//! # mbus-telegram - A Rust Crate for Decoding M-Bus (Meter-Bus) Telegrams
//!
//! The mbus-telegram crate decodes the response telegrams of wired M-Bus
//! (EN 13757-3) utility meters, such as heat, water, gas and electricity
//! meters, into structured readings.
//!
//! ## Features
//!
//! - Validate the long-frame envelope, length fields and checksum
//! - Decode the fixed header: identification number, manufacturer, version, medium
//! - Decode the variable data records with their physical quantity, unit and scale
//! - Decode integers, BCD values and the compound date/time types F, G and I
//! - Build the select and REQ_UD2 request frames for secondary addressing
//!
//! ## Usage
//!
//! ```rust
//! use mbus_telegram::{parse_frames, util::hex_to_bytes};
//!
//! let telegram = hex_to_bytes(
//!     "6815156808017245585703B40534049E0027B60C13214365874D16",
//! );
//! let decoded = parse_frames(&telegram).unwrap();
//!
//! let header = decoded.slave_information().unwrap();
//! assert_eq!(header.id(), 3575845);
//! assert_eq!(header.manufacturer(), "AMT");
//!
//! let volume = &decoded.records()[0];
//! assert_eq!(volume.to_string(), "PARAMETER_VOLUME = 87654321 [mm^3]");
//!
//! // a single corrupted byte invalidates the checksum
//! let mut corrupted = telegram.clone();
//! corrupted[20] ^= 0x01;
//! assert!(parse_frames(&corrupted).is_err());
//! ```
//!
//! Decoding never fails once the envelope is valid. Codes the decoder does
//! not know map to placeholder parameters, and a record stream that ends in
//! the middle of a record yields the records decoded so far.

pub mod constants;
pub mod error;
pub mod logging;
pub mod mbus;
pub mod payload;
pub mod telegram;
pub mod util;

pub use crate::error::MBusError;
pub use crate::logging::{init_logger, init_logger_with_level};

// Core M-Bus types
pub use mbus::{
    calculate_checksum, check_frame, pack_read_data_frame, pack_select_frame, MBusFrame,
    MBusFrameType,
};
pub use payload::{
    parse_data_records, parse_header, parse_vif, MBusRecord, MBusRecordValue, Medium, Parameter,
    SlaveInformation, TimePoint, VifInfo,
};
pub use telegram::{parse_frames, MBusTelegram};
