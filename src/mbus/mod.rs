//! The mbus module contains the frame-level parts of the wired M-Bus protocol:
//! envelope validation of received telegrams and the outbound request frames.

pub mod frame;
pub mod request;

pub use frame::*;
pub use request::*;

/// Represents an M-Bus frame.
pub use frame::MBusFrame;

/// Represents the different types of M-Bus frames.
pub use frame::MBusFrameType;
