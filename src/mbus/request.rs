//! Outbound request frames.
//!
//! Two fixed templates are needed to read a meter by secondary address: a
//! select frame (SND_UD to the network layer address) and a REQ_UD2 short
//! frame. Both use the same checksum as the received telegrams.

use crate::constants::{
    MBUS_ADDRESS_NETWORK_LAYER, MBUS_CONTROL_INFO_SELECT_SLAVE, MBUS_CONTROL_MASK_REQ_UD2_FCB,
    MBUS_CONTROL_MASK_SND_UD, MBUS_FRAME_DATA_OFFSET, MBUS_FRAME_LONG_START,
    MBUS_FRAME_SHORT_START, MBUS_FRAME_STOP, MBUS_SELECT_WILDCARD,
};
use crate::error::MBusError;
use crate::mbus::frame::calculate_checksum;
use bytes::{BufMut, BytesMut};

/// C, A, CI, four address bytes and four wildcard bytes.
const SELECT_FRAME_LENGTH: u8 = 11;

/// Packs a select frame for the meter with the given secondary address.
///
/// `secondary_address` holds up to eight hex digits and is left-padded with
/// zeros. The address bytes go out least significant first; manufacturer,
/// version and medium are wildcarded.
pub fn pack_select_frame(secondary_address: &str) -> Result<Vec<u8>, MBusError> {
    let address = secondary_address.trim();
    if address.len() > 8 {
        return Err(MBusError::InvalidSecondaryAddress(address.to_string()));
    }

    let padded = format!("{address:0>8}");
    let id = hex::decode(padded).map_err(|_| MBusError::InvalidHexString)?;

    let mut buf = BytesMut::with_capacity(usize::from(SELECT_FRAME_LENGTH) + 6);
    buf.put_u8(MBUS_FRAME_LONG_START);
    buf.put_u8(SELECT_FRAME_LENGTH);
    buf.put_u8(SELECT_FRAME_LENGTH);
    buf.put_u8(MBUS_FRAME_LONG_START);
    buf.put_u8(MBUS_CONTROL_MASK_SND_UD);
    buf.put_u8(MBUS_ADDRESS_NETWORK_LAYER);
    buf.put_u8(MBUS_CONTROL_INFO_SELECT_SLAVE);
    for byte in id.iter().rev() {
        buf.put_u8(*byte);
    }
    buf.put_bytes(MBUS_SELECT_WILDCARD, 4);

    let checksum = calculate_checksum(&buf[MBUS_FRAME_DATA_OFFSET..]);
    buf.put_u8(checksum);
    buf.put_u8(MBUS_FRAME_STOP);

    Ok(buf.to_vec())
}

/// Packs the REQ_UD2 short frame that asks the selected meter for its data.
pub fn pack_read_data_frame() -> Vec<u8> {
    let control = MBUS_CONTROL_MASK_REQ_UD2_FCB;
    let address = MBUS_ADDRESS_NETWORK_LAYER;
    vec![
        MBUS_FRAME_SHORT_START,
        control,
        address,
        calculate_checksum(&[control, address]),
        MBUS_FRAME_STOP,
    ]
}
