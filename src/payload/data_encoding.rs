//! # M-Bus Data Encoding and Decoding
//!
//! This module provides functions for decoding the numeric encodings found in
//! M-Bus telegrams: little-endian two's-complement integers, BCD digit strings,
//! the packed manufacturer code and the compound date/time types F, G and I.

use crate::error::MBusError;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Decodes a little-endian two's-complement integer of any width.
///
/// The top bit of the last (most significant) byte is the sign. Empty input
/// decodes to 0. Inputs wider than eight bytes wrap.
pub fn decode_int(input: &[u8]) -> i64 {
    let Some(last) = input.last() else {
        return 0;
    };
    let negative = last & 0x80 != 0;

    let mut value: i64 = 0;
    for &byte in input.iter().rev() {
        let byte = if negative { byte ^ 0xFF } else { byte };
        value = (value << 8).wrapping_add(i64::from(byte));
    }

    if negative {
        value.wrapping_neg().wrapping_sub(1)
    } else {
        value
    }
}

/// Encodes `value` as a little-endian two's-complement integer of `width` bytes.
///
/// Widths above eight bytes are sign-extended.
pub fn encode_int(value: i64, width: usize) -> Vec<u8> {
    let fill = if value < 0 { 0xFF } else { 0x00 };
    let mut bytes = value.to_le_bytes().to_vec();
    bytes.resize(width.max(8), fill);
    bytes.truncate(width);
    bytes
}

/// Decodes a BCD digit string stored least significant byte first.
///
/// Each byte contributes its two nibbles as two digits. A nibble above 9, an
/// empty input or a value that does not fit into `i64` decodes to 0.
pub fn decode_bcd(input: &[u8]) -> i64 {
    let digits: String = input.iter().rev().map(|b| format!("{b:02X}")).collect();
    match digits.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            if !input.is_empty() {
                debug!("malformed BCD value {digits}, using 0");
            }
            0
        }
    }
}

/// Decodes the manufacturer ID from the 2-byte encoded data.
///
/// The two bytes form a signed 16-bit value whose three 5-bit groups are
/// offset by 64 to produce the letters. Groups outside 1..=26 are kept as the
/// corresponding ASCII character.
pub fn mbus_decode_manufacturer(byte1: u8, byte2: u8) -> String {
    let id = decode_int(&[byte1, byte2]);

    [10, 5, 0]
        .iter()
        .map(|shift| char::from((((id >> shift) & 0x1F) + 64) as u8))
        .collect()
}

/// Encodes a 3-letter manufacturer code into its two wire bytes (low byte first).
pub fn mbus_encode_manufacturer(manufacturer: &str) -> Result<[u8; 2], MBusError> {
    let code = manufacturer.as_bytes();
    if code.len() != 3 || !code.iter().all(u8::is_ascii_alphabetic) {
        return Err(MBusError::InvalidManufacturer);
    }

    let id = code
        .iter()
        .fold(0u16, |acc, c| (acc << 5) | u16::from((c.to_ascii_uppercase() - 64) & 0x1F));

    Ok(id.to_le_bytes())
}

/// A decoded M-Bus time point (data types F, G and I).
///
/// Field values are reproduced as found on the wire; they are not checked
/// against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimePoint {
    /// Type G: date only.
    Date { year: u16, month: u8, day: u8 },
    /// Type F (seconds always 0) or type I.
    DateTime {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
}

impl TimePoint {
    /// Calendar date, if the wire fields form a real one.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let (year, month, day) = match *self {
            TimePoint::Date { year, month, day } => (year, month, day),
            TimePoint::DateTime {
                year, month, day, ..
            } => (year, month, day),
        };
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
    }

    /// Calendar date and time, if the wire fields form a real one.
    ///
    /// A date-only time point maps to midnight.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = self.to_naive_date()?;
        match *self {
            TimePoint::Date { .. } => date.and_hms_opt(0, 0, 0),
            TimePoint::DateTime {
                hour,
                minute,
                second,
                ..
            } => date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)),
        }
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePoint::Date { year, month, day } => write!(f, "{year}-{month:02}-{day:02}"),
            TimePoint::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => write!(
                f,
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
            ),
        }
    }
}

/// Century-relative year spread over the day and month bytes.
fn packed_year(day_byte: u8, month_byte: u8) -> u16 {
    2000 + u16::from(((day_byte & 0xE0) >> 5) | ((month_byte & 0xF0) >> 1))
}

/// Decodes an M-Bus time point from 2, 4 or 6 bytes.
///
/// Returns `None` for any other length and when the invalid-time flag is set
/// (bit 7 of the minute byte for types F and I).
pub fn decode_time_point(input: &[u8]) -> Option<TimePoint> {
    match *input {
        // Type I: Compound CP48 (Date and Time)
        [b0, b1, b2, b3, b4, _] => {
            if b1 & 0x80 != 0 {
                return None;
            }
            Some(TimePoint::DateTime {
                year: packed_year(b3, b4),
                month: b4 & 0x0F,
                day: b3 & 0x1F,
                hour: b2 & 0x1F,
                minute: b1 & 0x3F,
                second: b0 & 0x3F,
            })
        }
        // Type F: Compound CP32 (Date and Time)
        [b0, b1, b2, b3] => {
            if b0 & 0x80 != 0 {
                return None;
            }
            Some(TimePoint::DateTime {
                year: packed_year(b2, b3),
                month: b3 & 0x0F,
                day: b2 & 0x1F,
                hour: b1 & 0x1F,
                minute: b0 & 0x3F,
                second: 0,
            })
        }
        // Type G: Compound CP16 (Date)
        [b0, b1] => Some(TimePoint::Date {
            year: packed_year(b0, b1),
            month: b1 & 0x0F,
            day: b0 & 0x1F,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_int_positive() {
        assert_eq!(decode_int(&[0x42]), 0x42);
        assert_eq!(decode_int(&[0x34, 0x12]), 0x1234);
        assert_eq!(decode_int(&[0x01, 0x00, 0x00, 0x00]), 1);
        assert_eq!(decode_int(&[0xFF, 0x7F]), i64::from(i16::MAX));
    }

    #[test]
    fn test_decode_int_negative() {
        assert_eq!(decode_int(&[0xFF]), -1);
        assert_eq!(decode_int(&[0xFE, 0xFF]), -2);
        assert_eq!(decode_int(&[0x00, 0x80]), i64::from(i16::MIN));
        assert_eq!(decode_int(&[0x00, 0x00, 0x80]), -8_388_608);
    }

    #[test]
    fn test_decode_int_empty() {
        assert_eq!(decode_int(&[]), 0);
    }

    #[test]
    fn test_encode_int() {
        assert_eq!(encode_int(-1, 2), vec![0xFF, 0xFF]);
        assert_eq!(encode_int(0x1234, 3), vec![0x34, 0x12, 0x00]);
        assert_eq!(encode_int(-2, 10).len(), 10);
        assert_eq!(decode_int(&encode_int(-2, 6)), -2);
    }

    #[test]
    fn test_decode_bcd() {
        assert_eq!(decode_bcd(&[0x34, 0x12]), 1234);
        assert_eq!(decode_bcd(&[0x78, 0x56, 0x34, 0x12]), 12_345_678);
        assert_eq!(decode_bcd(&[0x00]), 0);
    }

    #[test]
    fn test_decode_bcd_malformed() {
        assert_eq!(decode_bcd(&[0xAB, 0x00]), 0);
        assert_eq!(decode_bcd(&[]), 0);
        // 20 digits do not fit into i64
        assert_eq!(decode_bcd(&[0x99; 10]), 0);
    }

    #[test]
    fn test_decode_manufacturer() {
        // 0x2C2D = KAM
        assert_eq!(mbus_decode_manufacturer(0x2D, 0x2C), "KAM");
        // groups 3, 6, 11
        let id: u16 = (3 << 10) | (6 << 5) | 11;
        let [lo, hi] = id.to_le_bytes();
        assert_eq!(mbus_decode_manufacturer(lo, hi), "CFK");
    }

    #[test]
    fn test_decode_manufacturer_sign_bit() {
        // The sign bit lies outside the three letter groups.
        assert_eq!(
            mbus_decode_manufacturer(0x2D, 0xAC),
            mbus_decode_manufacturer(0x2D, 0x2C)
        );
    }

    #[test]
    fn test_encode_manufacturer() {
        assert_eq!(mbus_encode_manufacturer("KAM").unwrap(), [0x2D, 0x2C]);
        assert_eq!(mbus_encode_manufacturer("kam").unwrap(), [0x2D, 0x2C]);
        assert!(mbus_encode_manufacturer("KA").is_err());
        assert!(mbus_encode_manufacturer("K4M").is_err());
    }

    #[test]
    fn test_decode_date() {
        let tp = decode_time_point(&[0x1F, 0x01]).unwrap();
        assert_eq!(tp.to_string(), "2000-01-31");
    }

    #[test]
    fn test_decode_date_time_type_f() {
        // 2023-06-15 13:45
        let tp = decode_time_point(&[0x2D, 0x0D, 0xEF, 0x26]).unwrap();
        assert_eq!(tp.to_string(), "2023-06-15 13:45:00");
        let dt = tp.to_naive_datetime().unwrap();
        assert_eq!(dt.to_string(), "2023-06-15 13:45:00");
    }

    #[test]
    fn test_decode_date_time_type_i() {
        // 2023-06-15 13:45:30
        let tp = decode_time_point(&[0x1E, 0x2D, 0x0D, 0xEF, 0x26, 0x00]).unwrap();
        assert_eq!(tp.to_string(), "2023-06-15 13:45:30");
    }

    #[test]
    fn test_decode_time_point_invalid_flag() {
        assert_eq!(decode_time_point(&[0xAD, 0x0D, 0xEF, 0x26]), None);
        assert_eq!(decode_time_point(&[0x1E, 0xAD, 0x0D, 0xEF, 0x26, 0x00]), None);
    }

    #[test]
    fn test_decode_time_point_bad_length() {
        assert_eq!(decode_time_point(&[]), None);
        assert_eq!(decode_time_point(&[0x01, 0x02, 0x03]), None);
        assert_eq!(decode_time_point(&[0x01; 8]), None);
    }

    #[test]
    fn test_time_point_not_a_calendar_date() {
        // day 0, month 0 still renders but has no calendar equivalent
        let tp = decode_time_point(&[0x00, 0x00]).unwrap();
        assert_eq!(tp.to_string(), "2000-00-00");
        assert!(tp.to_naive_date().is_none());
    }

    proptest! {
        #[test]
        fn prop_int_round_trip(width in 1usize..=8, raw in any::<i64>()) {
            let bits = (width * 8) as u32;
            let value = if bits == 64 { raw } else { (raw << (64 - bits)) >> (64 - bits) };
            prop_assert_eq!(decode_int(&encode_int(value, width)), value);
        }

        #[test]
        fn prop_bcd_matches_decimal(value in 0u64..1_000_000_000_000) {
            let digits = format!("{value:012}");
            let bytes: Vec<u8> = digits
                .as_bytes()
                .chunks(2)
                .rev()
                .map(|pair| ((pair[0] - b'0') << 4) | (pair[1] - b'0'))
                .collect();
            prop_assert_eq!(decode_bcd(&bytes), value as i64);
        }
    }
}
