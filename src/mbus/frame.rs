//! # M-Bus Frame Validation
//!
//! This module checks the envelope of wired M-Bus frames and splits them into
//! their fields. It leverages the `nom` crate for parsing the binary layout.
//!
//! ## Frame layouts
//! - Acknowledge: `E5`
//! - Short: `10 C A CS 16`
//! - Control / Long: `68 L L 68 C A CI <L-3 data bytes> CS 16`
//!
//! The checksum is the sum of all bytes from C up to the last data byte,
//! modulo 256.
//!
//! ## Usage
//!
//! ```ignore
//! // Integrity only (any frame type)
//! check_frame(&bytes)?;
//!
//! // Full long-frame validation, as required before header decoding
//! let frame = validate_long_frame(&bytes)?;
//! ```

use crate::constants::{
    MBUS_FRAME_ACK_START, MBUS_FRAME_DATA_OFFSET, MBUS_FRAME_LONG_OVERHEAD, MBUS_FRAME_LONG_START,
    MBUS_FRAME_MIN_HEADER_LENGTH, MBUS_FRAME_SHORT_START, MBUS_FRAME_STOP,
};
use crate::error::MBusError;
use nom::{
    bytes::complete::take,
    combinator::verify,
    number::complete::be_u8,
    Err as NomErr, IResult,
};
use serde::Serialize;

/// Represents an M-Bus frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MBusFrame {
    pub frame_type: MBusFrameType,
    pub control: u8,
    pub address: u8,
    pub control_information: u8,
    pub data: Vec<u8>,
    pub checksum: u8,
}

/// Represents the different types of M-Bus frames.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum MBusFrameType {
    Ack,
    Short,
    Control,
    Long,
}

/// Sum of `bytes` modulo 256.
pub fn calculate_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

fn stop_byte(input: &[u8]) -> IResult<&[u8], u8> {
    verify(be_u8, |b: &u8| *b == MBUS_FRAME_STOP)(input)
}

fn start_byte(input: &[u8]) -> IResult<&[u8], u8> {
    verify(be_u8, |b: &u8| *b == MBUS_FRAME_LONG_START)(input)
}

/// Uses the `nom` crate to parse an M-Bus frame from a byte slice.
///
/// Only the layout is checked here; see [`verify_frame`] for the checksum.
pub fn parse_frame(input: &[u8]) -> IResult<&[u8], MBusFrame> {
    let (input, (frame_type, length)) = parse_frame_type(input)?;

    match frame_type {
        MBusFrameType::Ack => Ok((
            input,
            MBusFrame {
                frame_type,
                control: 0,
                address: 0,
                control_information: 0,
                data: Vec::new(),
                checksum: 0,
            },
        )),
        MBusFrameType::Short => {
            let (i, control) = be_u8(input)?;
            let (i, address) = be_u8(i)?;
            let (i, checksum) = be_u8(i)?;
            let (i, _) = stop_byte(i)?;
            Ok((
                i,
                MBusFrame {
                    frame_type,
                    control,
                    address,
                    control_information: 0,
                    data: Vec::new(),
                    checksum,
                },
            ))
        }
        MBusFrameType::Control | MBusFrameType::Long => {
            let (i, _) = start_byte(input)?;
            let (i, control) = be_u8(i)?;
            let (i, address) = be_u8(i)?;
            let (i, control_information) = be_u8(i)?;
            let (i, data) = take(usize::from(length).saturating_sub(3))(i)?;
            let (i, checksum) = be_u8(i)?;
            let (i, _) = stop_byte(i)?;
            Ok((
                i,
                MBusFrame {
                    frame_type,
                    control,
                    address,
                    control_information,
                    data: data.to_vec(),
                    checksum,
                },
            ))
        }
    }
}

/// Parses the frame type from the input byte slice.
fn parse_frame_type(input: &[u8]) -> IResult<&[u8], (MBusFrameType, u8)> {
    let (input, start) = be_u8(input)?;
    match start {
        MBUS_FRAME_ACK_START => Ok((input, (MBusFrameType::Ack, 0))),
        MBUS_FRAME_SHORT_START => Ok((input, (MBusFrameType::Short, 0))),
        MBUS_FRAME_LONG_START => {
            let (input, length1) = be_u8(input)?;
            let (input, length2) = be_u8(input)?;
            if length1 != length2 {
                return Err(NomErr::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Tag,
                )));
            }
            let t = if length1 == 3 {
                MBusFrameType::Control
            } else {
                MBusFrameType::Long
            };
            Ok((input, (t, length1)))
        }
        _ => Err(NomErr::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

/// Verifies the checksum of a parsed M-Bus frame.
pub fn verify_frame(frame: &MBusFrame) -> Result<(), MBusError> {
    let calculated = match frame.frame_type {
        MBusFrameType::Ack => return Ok(()),
        MBusFrameType::Short => calculate_checksum(&[frame.control, frame.address]),
        MBusFrameType::Control | MBusFrameType::Long => calculate_checksum(&[
            frame.control,
            frame.address,
            frame.control_information,
        ])
        .wrapping_add(calculate_checksum(&frame.data)),
    };

    if frame.checksum != calculated {
        return Err(MBusError::InvalidChecksum {
            expected: frame.checksum,
            calculated,
        });
    }
    Ok(())
}

/// Checks length and checksum of a raw telegram.
///
/// A lone `E5` is a valid acknowledge. Anything else must be exactly
/// `length field + 6` bytes long and carry the checksum of the bytes between
/// the second length byte and the checksum byte.
pub fn check_frame(input: &[u8]) -> Result<(), MBusError> {
    if let [single] = input {
        return if *single == MBUS_FRAME_ACK_START {
            Ok(())
        } else {
            Err(MBusError::InvalidStartByte {
                offset: 0,
                value: *single,
            })
        };
    }

    if input.len() < 2 {
        return Err(MBusError::FrameTooShort {
            required: 2,
            actual: input.len(),
        });
    }

    let expected_len = usize::from(input[1]) + MBUS_FRAME_LONG_OVERHEAD;
    if input.len() != expected_len {
        return Err(MBusError::FrameLengthMismatch {
            length_field: input[1],
            expected: expected_len,
            actual: input.len(),
        });
    }

    let checksum = input[input.len() - 2];
    let calculated = calculate_checksum(&input[MBUS_FRAME_DATA_OFFSET..input.len() - 2]);
    if checksum != calculated {
        return Err(MBusError::InvalidChecksum {
            expected: checksum,
            calculated,
        });
    }

    Ok(())
}

/// Returns true when [`check_frame`] accepts `input`.
pub fn is_valid_checksum(input: &[u8]) -> bool {
    check_frame(input).is_ok()
}

/// Validates a long frame that carries a fixed data header.
///
/// On top of [`check_frame`] this requires at least 19 bytes, both start
/// bytes and two equal length bytes. The last byte is not inspected.
pub fn validate_long_frame(input: &[u8]) -> Result<MBusFrame, MBusError> {
    if input.len() < MBUS_FRAME_MIN_HEADER_LENGTH {
        return Err(MBusError::FrameTooShort {
            required: MBUS_FRAME_MIN_HEADER_LENGTH,
            actual: input.len(),
        });
    }

    check_frame(input)?;

    for offset in [0, 3] {
        if input[offset] != MBUS_FRAME_LONG_START {
            return Err(MBusError::InvalidStartByte {
                offset,
                value: input[offset],
            });
        }
    }

    if input[1] != input[2] {
        return Err(MBusError::LengthFieldMismatch(input[1], input[2]));
    }

    let checksum_offset = input.len() - 2;
    Ok(MBusFrame {
        frame_type: MBusFrameType::Long,
        control: input[MBUS_FRAME_DATA_OFFSET],
        address: input[MBUS_FRAME_DATA_OFFSET + 1],
        control_information: input[MBUS_FRAME_DATA_OFFSET + 2],
        data: input[MBUS_FRAME_DATA_OFFSET + 3..checksum_offset].to_vec(),
        checksum: input[checksum_offset],
    })
}
