#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_telegram::{calculate_checksum, parse_frames};

fuzz_target!(|data: &[u8]| {
    // Raw input is almost always rejected by the envelope checks
    let _ = parse_frames(data);

    // Wrap the input in a valid envelope so the header and record decoders
    // see arbitrary user data
    if data.len() >= 15 && data.len() <= 255 {
        let length = data.len() as u8;
        let mut frame = vec![0x68, length, length, 0x68];
        frame.extend_from_slice(data);
        frame.push(calculate_checksum(data));
        frame.push(0x16);

        let telegram = parse_frames(&frame).expect("valid envelope must decode");
        for record in telegram.records() {
            let _ = record.to_string();
        }

        // Corrupting the checksum must be detected
        let last = frame.len() - 2;
        frame[last] = frame[last].wrapping_add(1);
        assert!(parse_frames(&frame).is_err());
    }
});
