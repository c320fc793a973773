//! Variable data record decoding.
//!
//! Walks the records that follow the fixed header. Each record is a DIB
//! (DIF plus DIFE chain), a VIB (VIF plus at most one VIFE) and a value whose
//! length the DIF alone determines. Decoding stops at the first record that
//! does not fit into the remaining bytes; the records before it are kept.

use crate::constants::{
    MBUS_DATA_RECORD_MIN_LENGTH, MBUS_DIB_DIFE_MAX, MBUS_DIB_DIF_EXTENSION_BIT,
    MBUS_DIB_VIF_EXTENSION_BIT,
};
use crate::payload::data_encoding::{decode_bcd, decode_int, decode_time_point};
use crate::payload::record::{
    mbus_dif_datalength_lookup, DataCoding, MBusDataInformationBlock, MBusDataRecordHeader,
    MBusRecord, MBusRecordValue, MBusValueInformationBlock,
};
use crate::payload::vif::{parse_vif, Parameter};
use log::debug;
use nom::{bytes::complete::take, number::complete::be_u8, IResult};

/// Parses a DIF and its extension chain (at most 10 DIFEs).
pub fn parse_dib(input: &[u8]) -> IResult<&[u8], MBusDataInformationBlock> {
    let (mut input, dif) = be_u8(input)?;
    let mut dife = Vec::new();
    let mut extended = dif & MBUS_DIB_DIF_EXTENSION_BIT != 0;

    while extended && dife.len() < MBUS_DIB_DIFE_MAX {
        let (rest, byte) = be_u8(input)?;
        dife.push(byte);
        extended = byte & MBUS_DIB_DIF_EXTENSION_BIT != 0;
        input = rest;
    }

    Ok((input, MBusDataInformationBlock { dif, dife }))
}

/// Parses a VIF and, when its extension bit is set, exactly one VIFE.
pub fn parse_vib(input: &[u8]) -> IResult<&[u8], MBusValueInformationBlock> {
    let (input, vif) = be_u8(input)?;
    if vif & MBUS_DIB_VIF_EXTENSION_BIT == 0 {
        return Ok((input, MBusValueInformationBlock { vif, vife: None }));
    }

    let (input, vife) = be_u8(input)?;
    Ok((
        input,
        MBusValueInformationBlock {
            vif,
            vife: Some(vife),
        },
    ))
}

fn decode_value(parameter: Parameter, dif: u8, data: &[u8]) -> MBusRecordValue {
    if parameter.is_time_point() {
        return match decode_time_point(data) {
            Some(tp) => MBusRecordValue::TimePoint(tp),
            None => MBusRecordValue::Empty,
        };
    }

    if DataCoding::reads_as_bcd(dif) {
        MBusRecordValue::Bcd(decode_bcd(data))
    } else {
        MBusRecordValue::Integer(decode_int(data))
    }
}

/// Parses a single variable data record.
pub fn parse_variable_record(input: &[u8]) -> IResult<&[u8], MBusRecord> {
    let (input, dib) = parse_dib(input)?;
    let (input, vib) = parse_vib(input)?;

    let info = parse_vif(vib.vif, vib.vife.unwrap_or(0));
    let (input, data) = take(mbus_dif_datalength_lookup(dib.dif))(input)?;
    let value = decode_value(info.parameter, dib.dif, data);

    Ok((
        input,
        MBusRecord::new(MBusDataRecordHeader { dib, vib }, info, value),
    ))
}

/// Decodes the record stream following the fixed header.
///
/// Never fails: a truncated stream yields the records decoded so far.
pub fn parse_data_records(input: &[u8]) -> Vec<MBusRecord> {
    let mut records = Vec::new();
    let mut remaining = input;

    while remaining.len() >= MBUS_DATA_RECORD_MIN_LENGTH {
        match parse_variable_record(remaining) {
            Ok((rest, record)) => {
                debug!("record {}: {record}", records.len());
                records.push(record);
                remaining = rest;
            }
            Err(e) => {
                debug!(
                    "record stream truncated after {} records, {} bytes left: {e:?}",
                    records.len(),
                    remaining.len()
                );
                break;
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dib_without_extension() {
        let (rest, dib) = parse_dib(&[0x04, 0x13]).unwrap();
        assert_eq!(dib.dif, 0x04);
        assert!(dib.dife.is_empty());
        assert_eq!(rest, &[0x13]);
    }

    #[test]
    fn test_parse_dib_extension_chain() {
        let (rest, dib) = parse_dib(&[0x84, 0x80, 0x40, 0x13]).unwrap();
        assert_eq!(dib.dife, vec![0x80, 0x40]);
        assert_eq!(rest, &[0x13]);
    }

    #[test]
    fn test_parse_dib_chain_cap() {
        let mut input = vec![0x84];
        input.extend_from_slice(&[0x80; 12]);
        let (rest, dib) = parse_dib(&input).unwrap();
        assert_eq!(dib.dife.len(), MBUS_DIB_DIFE_MAX);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_parse_vib_single_extension() {
        let (rest, vib) = parse_vib(&[0xFD, 0x8E, 0x01]).unwrap();
        assert_eq!(vib.vif, 0xFD);
        assert_eq!(vib.vife, Some(0x8E));
        // the extension bit of the VIFE is not followed
        assert_eq!(rest, &[0x01]);
    }

    #[test]
    fn test_integer_record() {
        // 32-bit integer, energy in kWh
        let (rest, record) = parse_variable_record(&[0x04, 0x03, 0x2A, 0x00, 0x00, 0x00]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(record.parameter(), Parameter::Energy);
        assert_eq!(record.value(), "42");
        assert_eq!(record.conversion(), "k");
        assert_eq!(record.unit(), "W");
    }

    #[test]
    fn test_negative_integer_record() {
        // 16-bit flow temperature of -2
        let (_, record) = parse_variable_record(&[0x02, 0x5A, 0xFE, 0xFF]).unwrap();
        assert_eq!(record.parameter(), Parameter::TempFlow);
        assert_eq!(record.raw_value(), &MBusRecordValue::Integer(-2));
    }

    #[test]
    fn test_bcd_record() {
        // 8 digit BCD volume
        let (_, record) = parse_variable_record(&[0x0C, 0x13, 0x78, 0x56, 0x34, 0x12]).unwrap();
        assert_eq!(record.raw_value(), &MBusRecordValue::Bcd(12_345_678));
        assert_eq!(record.conversion(), "m");
    }

    #[test]
    fn test_date_record() {
        let (_, record) = parse_variable_record(&[0x02, 0x6C, 0x1F, 0x01]).unwrap();
        assert_eq!(record.parameter(), Parameter::Date);
        assert_eq!(record.value(), "2000-01-31");
    }

    #[test]
    fn test_date_record_with_wrong_length() {
        // 3-byte integer field cannot hold a time point
        let (_, record) = parse_variable_record(&[0x03, 0x6D, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(record.raw_value(), &MBusRecordValue::Empty);
        assert_eq!(record.value(), "");
    }

    #[test]
    fn test_zero_length_record_advances() {
        let records = parse_data_records(&[0x00, 0x13, 0x01, 0x13, 0x05, 0x00]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value(), "0");
        assert_eq!(records[1].value(), "5");
    }

    #[test]
    fn test_stream_stops_on_short_value() {
        // second record declares 4 bytes but only 3 remain
        let input = [0x01, 0x13, 0x07, 0x04, 0x13, 0x01, 0x02, 0x03];
        let records = parse_data_records(&input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value(), "7");
    }

    #[test]
    fn test_stream_stops_below_minimum() {
        assert!(parse_data_records(&[0x01, 0x13, 0x07]).is_empty());
        assert!(parse_data_records(&[]).is_empty());
    }

    #[test]
    fn test_stream_stops_when_vib_missing() {
        // DIFE chain runs to the end of the buffer
        assert!(parse_data_records(&[0x84, 0x80, 0x80, 0x80]).is_empty());
    }
}
