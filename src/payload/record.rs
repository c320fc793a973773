//! Data record types.
//!
//! Holds the DIF length/coding lookup, the parsed DIB and VIB, and the
//! decoded [`MBusRecord`] with its value, unit and scale. A record renders
//! as `PARAMETER_NAME = value [unit]`.

use crate::constants::{MBUS_DATA_RECORD_DIF_BCD_THRESHOLD, MBUS_DATA_RECORD_DIF_MASK_DATA};
use crate::payload::data_encoding::TimePoint;
use crate::payload::vif::{Parameter, VifInfo};
use serde::Serialize;
use std::fmt;

/// Representation announced by the data field (low nibble) of a DIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataCoding {
    NoData,
    Integer,
    Real,
    SelectionForReadout,
    Bcd,
    VariableLength,
    Special,
}

impl DataCoding {
    /// Data fields 0x8 and above are read as BCD digit strings.
    pub fn reads_as_bcd(dif: u8) -> bool {
        (dif & MBUS_DATA_RECORD_DIF_MASK_DATA) >= MBUS_DATA_RECORD_DIF_BCD_THRESHOLD
    }
}

/// Looks up the value length and representation from a DIF.
///
/// Codes without a fixed length (0x0, 0x8, 0xD) report 0 bytes.
pub fn mbus_dif_lookup(dif: u8) -> (usize, DataCoding) {
    match dif & MBUS_DATA_RECORD_DIF_MASK_DATA {
        0x1 => (1, DataCoding::Integer),
        0x2 => (2, DataCoding::Integer),
        0x3 => (3, DataCoding::Integer),
        0x4 => (4, DataCoding::Integer),
        0x5 => (4, DataCoding::Real),
        0x6 => (5, DataCoding::Integer),
        0x7 => (6, DataCoding::Integer),
        0x8 => (0, DataCoding::SelectionForReadout),
        0x9 => (1, DataCoding::Bcd),
        0xA => (2, DataCoding::Bcd),
        0xB => (3, DataCoding::Bcd),
        0xC => (4, DataCoding::Bcd),
        0xD => (0, DataCoding::VariableLength),
        0xE => (6, DataCoding::Bcd),
        0xF => (6, DataCoding::Special),
        _ => (0, DataCoding::NoData),
    }
}

/// Looks up the data length from a DIF field in the data record.
pub fn mbus_dif_datalength_lookup(dif: u8) -> usize {
    mbus_dif_lookup(dif).0
}

/// Represents the M-Bus data information block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MBusDataInformationBlock {
    pub dif: u8,
    pub dife: Vec<u8>,
}

/// Represents the M-Bus value information block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MBusValueInformationBlock {
    pub vif: u8,
    pub vife: Option<u8>,
}

/// Represents the M-Bus data record header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MBusDataRecordHeader {
    pub dib: MBusDataInformationBlock,
    pub vib: MBusValueInformationBlock,
}

/// Represents the value of an M-Bus data record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MBusRecordValue {
    /// Two's-complement integer.
    Integer(i64),
    /// BCD digit string read as a decimal number.
    Bcd(i64),
    /// Packed date or date/time.
    TimePoint(TimePoint),
    /// A time point whose bytes could not be decoded.
    Empty,
}

impl MBusRecordValue {
    /// Numeric value, if the record carries one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MBusRecordValue::Integer(v) | MBusRecordValue::Bcd(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for MBusRecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MBusRecordValue::Integer(v) | MBusRecordValue::Bcd(v) => write!(f, "{v}"),
            MBusRecordValue::TimePoint(tp) => write!(f, "{tp}"),
            MBusRecordValue::Empty => Ok(()),
        }
    }
}

/// Represents an M-Bus data record.
///
/// Records are produced by the decoder only and cannot be modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MBusRecord {
    parameter: Parameter,
    value: MBusRecordValue,
    conversion: String,
    unit: &'static str,
    drh: MBusDataRecordHeader,
}

impl MBusRecord {
    pub(crate) fn new(drh: MBusDataRecordHeader, info: VifInfo, value: MBusRecordValue) -> Self {
        Self {
            parameter: info.parameter,
            value,
            conversion: info.conversion,
            unit: info.unit,
            drh,
        }
    }

    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    /// Value rendered as text; empty for an undecodable time point.
    pub fn value(&self) -> String {
        self.value.to_string()
    }

    pub fn raw_value(&self) -> &MBusRecordValue {
        &self.value
    }

    /// Scale prefix, e.g. `"k"` or `"1e-3 "`.
    pub fn conversion(&self) -> &str {
        &self.conversion
    }

    pub fn unit(&self) -> &str {
        self.unit
    }

    pub fn header(&self) -> &MBusDataRecordHeader {
        &self.drh
    }
}

impl fmt::Display for MBusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} [{}{}]",
            self.parameter, self.value, self.conversion, self.unit
        )
    }
}
