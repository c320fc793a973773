//! M-Bus Protocol Constants
//!
//! Wire-level constants for the wired M-Bus long frame and the variable data
//! records it carries, based on the EN 13757 standard.

// ----------------------------------------------------------------------------
// Frame envelope
// ----------------------------------------------------------------------------

/// Single character acknowledge
pub const MBUS_FRAME_ACK_START: u8 = 0xE5;

/// Short frame start byte
pub const MBUS_FRAME_SHORT_START: u8 = 0x10;

/// Long/control frame start byte (appears twice)
pub const MBUS_FRAME_LONG_START: u8 = 0x68;

/// Stop byte closing every short and long frame
pub const MBUS_FRAME_STOP: u8 = 0x16;

/// Bytes of a long frame outside the length-counted region:
/// `68 L L 68` in front, checksum and stop byte behind.
pub const MBUS_FRAME_LONG_OVERHEAD: usize = 6;

/// Offset of the first length-counted byte (the C field).
pub const MBUS_FRAME_DATA_OFFSET: usize = 4;

/// Smallest long frame that carries a complete fixed header.
pub const MBUS_FRAME_MIN_HEADER_LENGTH: usize = 19;

// ----------------------------------------------------------------------------
// Fixed header offsets (relative to the telegram start)
// ----------------------------------------------------------------------------

/// First of the four BCD identification bytes (least significant first)
pub const MBUS_HEADER_ID_OFFSET: usize = 7;

/// Two-byte packed manufacturer code
pub const MBUS_HEADER_MANUFACTURER_OFFSET: usize = 11;

/// Version byte
pub const MBUS_HEADER_VERSION_OFFSET: usize = 13;

/// Medium byte
pub const MBUS_HEADER_MEDIUM_OFFSET: usize = 14;

/// Access number byte
pub const MBUS_HEADER_ACCESS_NUMBER_OFFSET: usize = 15;

/// Status byte
pub const MBUS_HEADER_STATUS_OFFSET: usize = 16;

/// Offset of the first data record
pub const MBUS_HEADER_END_OFFSET: usize = 19;

// ----------------------------------------------------------------------------
// Data/value information blocks
// ----------------------------------------------------------------------------

/// DIF (Data Information Field) mask for data length
pub const MBUS_DATA_RECORD_DIF_MASK_DATA: u8 = 0x0F;

/// DIF data field codes at or above this value are read as BCD
pub const MBUS_DATA_RECORD_DIF_BCD_THRESHOLD: u8 = 0x08;

/// DIF extension bit
pub const MBUS_DIB_DIF_EXTENSION_BIT: u8 = 0x80;

/// Maximum number of DIFE bytes following a DIF
pub const MBUS_DIB_DIFE_MAX: usize = 10;

/// VIF without extension
pub const MBUS_DIB_VIF_WITHOUT_EXTENSION: u8 = 0x7F;

/// VIF extension bit
pub const MBUS_DIB_VIF_EXTENSION_BIT: u8 = 0x80;

/// First extension table marker (VIF 0xFD)
pub const MBUS_DIB_VIF_EXTENSION_FD: u8 = 0xFD;

/// Second extension table marker (VIF 0xFB)
pub const MBUS_DIB_VIF_EXTENSION_FB: u8 = 0xFB;

/// Smallest remaining slice that may still hold a data record
pub const MBUS_DATA_RECORD_MIN_LENGTH: usize = 4;

// ----------------------------------------------------------------------------
// Request frames
// ----------------------------------------------------------------------------

/// Network layer (secondary addressing) broadcast address
pub const MBUS_ADDRESS_NETWORK_LAYER: u8 = 0xFD;

/// SND_UD control byte (includes DIR M2S)
pub const MBUS_CONTROL_MASK_SND_UD: u8 = 0x53;

/// REQ_UD2 control byte with FCB set
pub const MBUS_CONTROL_MASK_REQ_UD2_FCB: u8 = 0x7B;

/// Select slave by secondary address
pub const MBUS_CONTROL_INFO_SELECT_SLAVE: u8 = 0x52;

/// Wildcard filling manufacturer/version/medium in a select frame
pub const MBUS_SELECT_WILDCARD: u8 = 0xFF;
