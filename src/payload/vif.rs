//! VIF/VIFE lookup
//!
//! Maps a primary Value Information Field and its first extension byte to the
//! measured quantity, a scale prefix and a unit label (EN 13757-3).

use crate::constants::{MBUS_DIB_VIF_EXTENSION_FB, MBUS_DIB_VIF_EXTENSION_FD, MBUS_DIB_VIF_WITHOUT_EXTENSION};
use serde::Serialize;
use std::fmt;

/// Physical quantity or descriptor a data record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Parameter {
    Undefined,
    Energy,
    Mass,
    Power,
    Volume,
    VolumeFlow,
    MassFlow,
    TempFlow,
    TempReturn,
    Pressure,
    OnTime,
    OperatingTime,
    AveragingDuration,
    ActualityDuration,
    DateTime,
    Date,
    TempDiff,
    TempExternal,
    Units,
    Reserved,
    CustomVif,
    Fabrication,
    BusAddr,
    ManufacturerSpecific,
    FirmwareVersion,
    SoftwareVersion,
    AccessNumber,
    Medium,
    Manufacturer,
    Identification,
    ModelVersion,
    HardwareVersion,
    Password,
    ErrorFlag,
    CustomerLocation,
    Customer,
    DigitalOutput,
    DigitalInput,
    Voltage,
    Current,
    Unrecognized,
}

impl Parameter {
    /// Identifier used when records are rendered as text.
    ///
    /// Four identifiers differ from the older decoder output:
    /// `PARAMETER_FIRMWARE_VERSION` (was `PARAMETER_FINDWARE_VERSION`),
    /// `PARAMETER_MANUFACTURER_SPECIFIC` (was `PARAMETER_MANUFACTURED_SPEC`),
    /// and `PARAMETER_VOLTAGE` and `PARAMETER_CURRENT` (were `PARAMETER_V` and
    /// `PARAMETER_A`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Undefined => "PARAMETER_UNDEFINED",
            Parameter::Energy => "PARAMETER_ENERGY",
            Parameter::Mass => "PARAMETER_MASS",
            Parameter::Power => "PARAMETER_POWER",
            Parameter::Volume => "PARAMETER_VOLUME",
            Parameter::VolumeFlow => "PARAMETER_VOLUME_FLOW",
            Parameter::MassFlow => "PARAMETER_MASS_FLOW",
            Parameter::TempFlow => "PARAMETER_TEMP_FLOW",
            Parameter::TempReturn => "PARAMETER_TEMP_RETURN",
            Parameter::Pressure => "PARAMETER_PRESSURE",
            Parameter::OnTime => "PARAMETER_ON_TIME",
            Parameter::OperatingTime => "PARAMETER_OPERATING_TIME",
            Parameter::AveragingDuration => "PARAMETER_AVERAGING_DURATION",
            Parameter::ActualityDuration => "PARAMETER_ACTUALITY_DURATION",
            Parameter::DateTime => "PARAMETER_DATETIME",
            Parameter::Date => "PARAMETER_DATE",
            Parameter::TempDiff => "PARAMETER_TEMP_DIFF",
            Parameter::TempExternal => "PARAMETER_TEMP_EXTERNAL",
            Parameter::Units => "PARAMETER_UNITS",
            Parameter::Reserved => "PARAMETER_RESERVED",
            Parameter::CustomVif => "PARAMETER_CUSTOM_VIF",
            Parameter::Fabrication => "PARAMETER_FABRICATION",
            Parameter::BusAddr => "PARAMETER_BUS_ADDR",
            Parameter::ManufacturerSpecific => "PARAMETER_MANUFACTURER_SPECIFIC",
            Parameter::FirmwareVersion => "PARAMETER_FIRMWARE_VERSION",
            Parameter::SoftwareVersion => "PARAMETER_SOFTWARE_VERSION",
            Parameter::AccessNumber => "PARAMETER_ACCESS_NUMBER",
            Parameter::Medium => "PARAMETER_MEDIUM",
            Parameter::Manufacturer => "PARAMETER_MANUFACTURER",
            Parameter::Identification => "PARAMETER_IS_IDENTIFICATION",
            Parameter::ModelVersion => "PARAMETER_MODEL_VERSION",
            Parameter::HardwareVersion => "PARAMETER_HARDWARE_VERSION",
            Parameter::Password => "PARAMETER_PASSWORD",
            Parameter::ErrorFlag => "PARAMETER_ERROR_FLAG",
            Parameter::CustomerLocation => "PARAMETER_CUSTOMER_LOCATION",
            Parameter::Customer => "PARAMETER_CUSTOMER",
            Parameter::DigitalOutput => "PARAMETER_DIGITAL_OUTPUT",
            Parameter::DigitalInput => "PARAMETER_DIGITAL_INPUT",
            Parameter::Voltage => "PARAMETER_VOLTAGE",
            Parameter::Current => "PARAMETER_CURRENT",
            Parameter::Unrecognized => "PARAMETER_UNRECOGNIZED",
        }
    }

    /// True for the time point kinds whose value is a packed date/time.
    pub fn is_time_point(&self) -> bool {
        matches!(self, Parameter::Date | Parameter::DateTime)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a VIF lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VifInfo {
    pub parameter: Parameter,
    /// Scale prefix such as `"k"`, `"m"` or `"1e-4 "`; empty when unscaled.
    pub conversion: String,
    pub unit: &'static str,
}

impl VifInfo {
    fn new(parameter: Parameter, conversion: impl Into<String>, unit: &'static str) -> Self {
        Self {
            parameter,
            conversion: conversion.into(),
            unit,
        }
    }

    fn bare(parameter: Parameter) -> Self {
        Self::new(parameter, String::new(), "")
    }
}

/// Renders a decimal exponent as a unit prefix.
///
/// Exponents without a named prefix (including 0) fall back to `"1e<exp> "`.
pub fn mbus_unit_prefix(exp: i32) -> String {
    match exp {
        -3 => "m".to_string(),
        -6 => "my".to_string(),
        1 => "10 ".to_string(),
        2 => "100 ".to_string(),
        3 => "k".to_string(),
        4 => "10 k".to_string(),
        5 => "100 k".to_string(),
        6 => "M".to_string(),
        9 => "T".to_string(),
        _ => format!("1e{exp} "),
    }
}

/// Looks up a primary VIF together with its first extension byte.
///
/// `vife` is only consulted for the extension table markers 0xFD and 0xFB;
/// pass 0 when the VIF has no extension.
pub fn parse_vif(vif: u8, vife: u8) -> VifInfo {
    if vif == MBUS_DIB_VIF_EXTENSION_FD || vif == MBUS_DIB_VIF_EXTENSION_FB {
        return VifInfo::bare(lookup_vife(vife));
    }

    let nnn = i32::from(vif & 0x07);
    let nn = i32::from(vif & 0x03);

    match vif & MBUS_DIB_VIF_WITHOUT_EXTENSION {
        // E000 0nnn Energy 10^nnn Wh
        0x00..=0x07 => VifInfo::new(Parameter::Energy, mbus_unit_prefix(nnn), "W"),
        // E000 1nnn Energy 10^nnn J
        0x08..=0x0F => VifInfo::new(Parameter::Energy, mbus_unit_prefix(nnn), "J"),
        // E001 0nnn Volume 10^(nnn-6) m3
        0x10..=0x17 => VifInfo::new(Parameter::Volume, mbus_unit_prefix(nnn - 6), "m^3"),
        // E001 1nnn Mass 10^(nnn-3) kg
        0x18..=0x1F => VifInfo::new(Parameter::Mass, mbus_unit_prefix(nnn - 3), "kg"),
        // E010 00nn On Time, E010 01nn Operating Time,
        // E111 00nn Averaging Duration, E111 01nn Actuality Duration
        0x20..=0x27 | 0x70..=0x77 => {
            let parameter = match vif & 0x7C {
                0x20 => Parameter::OnTime,
                0x24 => Parameter::OperatingTime,
                0x70 => Parameter::AveragingDuration,
                _ => Parameter::ActualityDuration,
            };
            VifInfo::new(parameter, mbus_unit_prefix(0), "")
        }
        // E010 1nnn Power 10^(nnn-3) W
        0x28..=0x2F => VifInfo::new(Parameter::Power, mbus_unit_prefix(nnn - 3), "W"),
        // E011 0nnn Power 10^nnn J/h
        0x30..=0x37 => VifInfo::new(Parameter::Power, mbus_unit_prefix(nnn), "J/h"),
        // E011 1nnn Volume Flow 10^(nnn-6) m3/h
        0x38..=0x3F => VifInfo::new(Parameter::VolumeFlow, mbus_unit_prefix(nnn - 6), "m3/h"),
        // E100 0nnn Volume Flow ext. 10^(nnn-7) m3/min
        0x40..=0x47 => VifInfo::new(Parameter::VolumeFlow, mbus_unit_prefix(nnn - 7), "m3/min"),
        // E100 1nnn Volume Flow ext. 10^(nnn-9) m3/s
        0x48..=0x4F => VifInfo::new(Parameter::VolumeFlow, mbus_unit_prefix(nnn - 9), "m3/s"),
        // E101 0nnn Mass flow 10^(nnn-3) kg/h
        0x50..=0x57 => VifInfo::new(Parameter::MassFlow, mbus_unit_prefix(nnn - 3), "kg/h"),
        // E101 10nn Flow Temperature
        0x58..=0x5B => VifInfo::new(Parameter::TempFlow, "dec", "C"),
        // E101 11nn Return Temperature
        0x5C..=0x5F => VifInfo::new(Parameter::TempReturn, "dec", "C"),
        // E110 00nn Temperature Difference 10^(nn-3) K
        0x60..=0x63 => VifInfo::new(Parameter::TempDiff, mbus_unit_prefix(nn - 3), "K"),
        // E110 01nn External Temperature 10^(nn-3) °C
        0x64..=0x67 => VifInfo::new(Parameter::TempExternal, mbus_unit_prefix(nn - 3), "C"),
        // E110 10nn Pressure 10^(nn-3) bar
        0x68..=0x6B => VifInfo::new(Parameter::Pressure, mbus_unit_prefix(nn - 3), "1mbar"),
        // E110 110n Time Point, n = 1 adds the time
        0x6C | 0x6D => {
            if vif & 0x01 != 0 {
                VifInfo::bare(Parameter::DateTime)
            } else {
                VifInfo::bare(Parameter::Date)
            }
        }
        // E110 1110 Units for H.C.A.
        0x6E => VifInfo::bare(Parameter::Units),
        0x6F => VifInfo::bare(Parameter::Reserved),
        0x78 => VifInfo::bare(Parameter::Fabrication),
        0x7A => VifInfo::bare(Parameter::BusAddr),
        0x7C => VifInfo::bare(Parameter::CustomVif),
        0x7F => VifInfo::bare(Parameter::ManufacturerSpecific),
        _ => VifInfo::bare(Parameter::Undefined),
    }
}

/// Extension table shared by the 0xFD and 0xFB markers.
fn lookup_vife(vife: u8) -> Parameter {
    match vife {
        0x08 | 0x88 => Parameter::AccessNumber,
        0x09 | 0x89 => Parameter::Medium,
        0x0A | 0x8A => Parameter::Manufacturer,
        0x0B | 0x8B => Parameter::Identification,
        0x0C | 0x8C => Parameter::ModelVersion,
        0x0D | 0x8D => Parameter::HardwareVersion,
        0x0E | 0x8E => Parameter::FirmwareVersion,
        // 0x8E is already taken by the firmware version
        0x0F => Parameter::SoftwareVersion,
        0x10 => Parameter::CustomerLocation,
        0x11 => Parameter::Customer,
        0x16 => Parameter::Password,
        0x17 | 0x97 => Parameter::ErrorFlag,
        0x1A => Parameter::DigitalOutput,
        0x1B => Parameter::DigitalInput,
        0x40 => Parameter::Voltage,
        0x50 => Parameter::Current,
        _ => Parameter::Unrecognized,
    }
}
