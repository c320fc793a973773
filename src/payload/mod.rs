//! The payload module contains the components responsible for decoding the
//! user data of an M-Bus long frame: the fixed header and the variable data
//! records that follow it.

pub mod data;
pub mod data_encoding;
pub mod header;
pub mod record;
pub mod vif;

pub use data::parse_data_records;
pub use data_encoding::*;
pub use header::*;
pub use record::*;
pub use vif::*;

/// Represents a data record in the M-Bus protocol.
pub use record::MBusRecord;

/// Represents the value of an M-Bus data record.
pub use record::MBusRecordValue;
