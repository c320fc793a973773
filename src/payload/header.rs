//! Fixed header of a variable data response (CI 0x72).
//!
//! The ten bytes after the CI field identify the meter: BCD identification
//! number, manufacturer, version, medium, access number and status.

use crate::constants::{
    MBUS_HEADER_ACCESS_NUMBER_OFFSET, MBUS_HEADER_ID_OFFSET, MBUS_HEADER_MANUFACTURER_OFFSET,
    MBUS_HEADER_MEDIUM_OFFSET, MBUS_HEADER_STATUS_OFFSET, MBUS_HEADER_VERSION_OFFSET,
};
use crate::payload::data_encoding::mbus_decode_manufacturer;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

/// Medium (device type) byte of the fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Medium {
    Other,
    Oil,
    Electricity,
    Gas,
    HeatOutlet,
    Steam,
    HotWater,
    Water,
    HeatCostAllocator,
    CompressedAir,
    CoolingOutlet,
    CoolingInlet,
    HeatInlet,
    HeatCooling,
    BusSystem,
    UnknownMedium,
    ColdWater,
    DualWater,
    Pressure,
    AdConverter,
    /// Any code without an assigned medium; keeps the raw byte.
    Reserved(u8),
}

impl From<u8> for Medium {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Medium::Other,
            0x01 => Medium::Oil,
            0x02 => Medium::Electricity,
            0x03 => Medium::Gas,
            0x04 => Medium::HeatOutlet,
            0x05 => Medium::Steam,
            0x06 => Medium::HotWater,
            0x07 => Medium::Water,
            0x08 => Medium::HeatCostAllocator,
            0x09 => Medium::CompressedAir,
            0x0A => Medium::CoolingOutlet,
            0x0B => Medium::CoolingInlet,
            0x0C => Medium::HeatInlet,
            0x0D => Medium::HeatCooling,
            0x0E => Medium::BusSystem,
            0x0F => Medium::UnknownMedium,
            0x16 => Medium::ColdWater,
            0x17 => Medium::DualWater,
            0x18 => Medium::Pressure,
            0x19 => Medium::AdConverter,
            other => Medium::Reserved(other),
        }
    }
}

impl Medium {
    pub fn description(&self) -> &'static str {
        match self {
            Medium::Other => "Other",
            Medium::Oil => "Oil",
            Medium::Electricity => "Electricity",
            Medium::Gas => "Gas",
            Medium::HeatOutlet => "Heat (Volume measured at return temperature: outlet)",
            Medium::Steam => "Steam",
            Medium::HotWater => "Hot Water",
            Medium::Water => "Water",
            Medium::HeatCostAllocator => "Heat Cost Allocator.",
            Medium::CompressedAir => "Compressed Air",
            Medium::CoolingOutlet => {
                "Cooling load meter (Volume measured at return temperature: outlet)"
            }
            Medium::CoolingInlet => "Cooling load meter (Volume measured at flow temperature: inlet)",
            Medium::HeatInlet => "Heat (Volume measured at flow temperature: inlet)",
            Medium::HeatCooling => "Heat / Cooling load meter",
            Medium::BusSystem => "Bus / System",
            Medium::UnknownMedium => "Unknown Medium",
            Medium::ColdWater => "Cold Water",
            Medium::DualWater => "Dual Water",
            Medium::Pressure => "Pressure",
            Medium::AdConverter => "A/D Converter",
            Medium::Reserved(_) => "Reserved",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Device identity taken from the fixed header of one telegram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlaveInformation {
    id: u64,
    manufacturer: String,
    version: char,
    medium: Medium,
    access_number: u8,
    status: u8,
    signature: u8,
}

impl SlaveInformation {
    /// Identification number, read from its BCD digits.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Version byte taken as a character code.
    pub fn version(&self) -> char {
        self.version
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn access_number(&self) -> u8 {
        self.access_number
    }

    pub fn status(&self) -> u8 {
        self.status
    }

    /// Signature; carries the status byte.
    pub fn signature(&self) -> u8 {
        self.signature
    }
}

/// Decodes the fixed header from a complete long-frame telegram.
///
/// Returns `None` when the telegram is too short to hold the header or when
/// the identification number contains non-decimal digits.
pub fn parse_header(telegram: &[u8]) -> Option<SlaveInformation> {
    if telegram.len() <= MBUS_HEADER_STATUS_OFFSET {
        debug!("telegram of {} bytes has no fixed header", telegram.len());
        return None;
    }

    let id_bytes = &telegram[MBUS_HEADER_ID_OFFSET..MBUS_HEADER_ID_OFFSET + 4];
    let digits: String = id_bytes.iter().rev().map(|b| format!("{b:02X}")).collect();
    let id = match digits.parse::<u64>() {
        Ok(id) => id,
        Err(_) => {
            warn!("identification number {digits} is not BCD, skipping header");
            return None;
        }
    };

    let status = telegram[MBUS_HEADER_STATUS_OFFSET];

    Some(SlaveInformation {
        id,
        manufacturer: mbus_decode_manufacturer(
            telegram[MBUS_HEADER_MANUFACTURER_OFFSET],
            telegram[MBUS_HEADER_MANUFACTURER_OFFSET + 1],
        ),
        version: char::from(telegram[MBUS_HEADER_VERSION_OFFSET]),
        medium: Medium::from(telegram[MBUS_HEADER_MEDIUM_OFFSET]),
        access_number: telegram[MBUS_HEADER_ACCESS_NUMBER_OFFSET],
        status,
        signature: status,
    })
}
