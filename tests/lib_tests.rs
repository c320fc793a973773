//! Telegram-level tests through the crate root API.

use mbus_telegram::{
    calculate_checksum, check_frame, pack_read_data_frame, pack_select_frame, parse_frames,
    MBusError, MBusRecordValue, Parameter,
};
use proptest::prelude::*;

/// Wraps `user_data` (C, A, CI and everything after) into a long frame.
fn long_frame(user_data: &[u8]) -> Vec<u8> {
    let length = user_data.len() as u8;
    let mut frame = vec![0x68, length, length, 0x68];
    frame.extend_from_slice(user_data);
    frame.push(calculate_checksum(user_data));
    frame.push(0x16);
    frame
}

fn header(id: [u8; 4]) -> Vec<u8> {
    let mut data = vec![0x08, 0x05, 0x72];
    data.extend_from_slice(&id);
    data.extend_from_slice(&[0x2D, 0x2C, 0x01, 0x07, 0x11, 0x00, 0x00, 0x00]);
    data
}

#[test]
fn test_header_only_telegram() {
    let telegram = parse_frames(&long_frame(&header([0x78, 0x56, 0x34, 0x12]))).unwrap();
    assert_eq!(telegram.address(), 0x05);
    let info = telegram.slave_information().unwrap();
    assert_eq!(info.id(), 12345678);
    assert_eq!(info.manufacturer(), "KAM");
    assert_eq!(info.version(), '\u{1}');
    assert_eq!(info.medium().to_string(), "Water");
    assert!(telegram.records().is_empty());
}

#[test]
fn test_non_bcd_id_still_decodes_records() {
    let mut data = header([0x7A, 0x56, 0x34, 0x12]);
    data.extend_from_slice(&[0x04, 0x13, 0x10, 0x00, 0x00, 0x00]);
    let telegram = parse_frames(&long_frame(&data)).unwrap();
    assert!(telegram.slave_information().is_none());
    assert_eq!(telegram.records().len(), 1);
    assert_eq!(telegram.records()[0].parameter(), Parameter::Volume);
}

#[test]
fn test_checksum_and_stop_join_the_record_stream() {
    // the 2-byte tail plus checksum and stop byte form a 1-byte integer record
    let mut data = header([0x01, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[0x01, 0xFD, 0x08, 0x2A, 0x01, 0x5B]);
    let frame = long_frame(&data);
    let checksum = frame[frame.len() - 2];
    let telegram = parse_frames(&frame).unwrap();
    assert_eq!(telegram.records().len(), 2);
    assert_eq!(telegram.records()[0].parameter(), Parameter::AccessNumber);
    assert_eq!(telegram.records()[0].value(), "42");
    let trailing = &telegram.records()[1];
    assert_eq!(trailing.parameter(), Parameter::TempFlow);
    assert_eq!(
        trailing.raw_value(),
        &MBusRecordValue::Integer(i64::from(checksum as i8))
    );
}

#[test]
fn test_telegram_without_stop_byte_decodes() {
    let mut data = header([0x01, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[0x04, 0x13, 0x10, 0x00, 0x00, 0x00]);
    let mut frame = long_frame(&data);
    *frame.last_mut().unwrap() = 0x00;

    let telegram = parse_frames(&frame).unwrap();
    assert_eq!(telegram.slave_information().unwrap().id(), 1);
    // checksum and the zero byte are too short for another record
    let records = telegram.into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].to_string(), "PARAMETER_VOLUME = 16 [mm^3]");
}

#[test]
fn test_rejects_non_telegrams() {
    assert!(matches!(
        parse_frames(&[]),
        Err(MBusError::FrameTooShort { actual: 0, .. })
    ));
    assert!(matches!(
        parse_frames(&[0xE5]),
        Err(MBusError::FrameTooShort { .. })
    ));
    assert!(check_frame(&[0xE5]).is_ok());
}

#[test]
fn test_request_frames_pass_integrity_check() {
    let select = pack_select_frame("03575845").unwrap();
    assert_eq!(&select[7..11], &[0x45, 0x58, 0x57, 0x03]);
    assert!(check_frame(&select).is_ok());
    assert_eq!(pack_read_data_frame()[3], calculate_checksum(&[0x7B, 0xFD]));
}

#[test]
fn test_json_output() {
    let mut data = header([0x78, 0x56, 0x34, 0x12]);
    data.extend_from_slice(&[0x02, 0x6C, 0xBF, 0x1C]);
    let telegram = parse_frames(&long_frame(&data)).unwrap();
    let json = serde_json::to_value(&telegram).unwrap();
    assert_eq!(json["slave_information"]["manufacturer"], "KAM");
    assert_eq!(json["records"][0]["parameter"], "Date");
    assert_eq!(json["records"][0]["value"]["TimePoint"]["Date"]["year"], 2013);
}

proptest! {
    #[test]
    fn prop_parse_frames_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..300)) {
        let _ = parse_frames(&bytes);
    }

    #[test]
    fn prop_any_user_data_in_valid_envelope_decodes(
        records in proptest::collection::vec(any::<u8>(), 0..200)
    ) {
        let mut data = header([0x78, 0x56, 0x34, 0x12]);
        data.extend_from_slice(&records);
        let frame = long_frame(&data);
        let first = parse_frames(&frame);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first, parse_frames(&frame));
    }
}
