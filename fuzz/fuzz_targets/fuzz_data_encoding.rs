#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_telegram::payload::data_encoding::{
    decode_bcd, decode_int, decode_time_point, encode_int, mbus_decode_manufacturer,
};
use mbus_telegram::payload::vif::parse_vif;

fuzz_target!(|data: &[u8]| {
    for len in 0..=data.len().min(8) {
        let _ = decode_bcd(&data[..len]);
        let value = decode_int(&data[..len]);
        if len > 0 {
            assert_eq!(encode_int(value, len), &data[..len]);
        }
        let _ = decode_time_point(&data[..len]);
    }

    if let [b1, b2, ..] = *data {
        assert_eq!(mbus_decode_manufacturer(b1, b2).chars().count(), 3);
        let _ = parse_vif(b1, b2);
    }
});
