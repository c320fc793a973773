//! Decoding of a complete response telegram.

use crate::constants::MBUS_HEADER_END_OFFSET;
use crate::error::MBusError;
use crate::logging::log_frame_hex;
use crate::mbus::frame::validate_long_frame;
use crate::payload::data::parse_data_records;
use crate::payload::header::{parse_header, SlaveInformation};
use crate::payload::record::MBusRecord;
use log::debug;
use serde::Serialize;

/// Everything decoded from one telegram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MBusTelegram {
    address: u8,
    control_information: u8,
    slave_information: Option<SlaveInformation>,
    records: Vec<MBusRecord>,
}

impl MBusTelegram {
    /// Primary address field of the frame.
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn control_information(&self) -> u8 {
        self.control_information
    }

    /// Fixed header; `None` when the identification number was not BCD.
    pub fn slave_information(&self) -> Option<&SlaveInformation> {
        self.slave_information.as_ref()
    }

    /// Data records in wire order.
    pub fn records(&self) -> &[MBusRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MBusRecord> {
        self.records
    }
}

/// Validates and decodes one long-frame response telegram.
///
/// Any envelope, length or checksum problem is returned as an error and
/// nothing is decoded. Past validation, decoding cannot fail: unknown codes
/// produce placeholder parameters and a truncated record stream ends the
/// record list early.
pub fn parse_frames(input: &[u8]) -> Result<MBusTelegram, MBusError> {
    log_frame_hex("telegram", input);

    let frame = validate_long_frame(input).map_err(|e| {
        debug!("rejecting telegram: {e}");
        e
    })?;

    let slave_information = parse_header(input);
    // checksum and stop byte stay in the record stream
    let records = parse_data_records(&input[MBUS_HEADER_END_OFFSET..]);

    Ok(MBusTelegram {
        address: frame.address,
        control_information: frame.control_information,
        slave_information,
        records,
    })
}
