//! Logging helpers built on the `log` facade with `env_logger` as backend.

use log::{log_enabled, trace, Level, LevelFilter};

/// Initializes the logger with the `env_logger` crate.
///
/// The level is taken from `RUST_LOG`; nothing is printed by default.
pub fn init_logger() {
    init_logger_with_level(LevelFilter::Off);
}

/// Initializes `env_logger` with `level` as the default filter.
///
/// `RUST_LOG` still overrides the default when it is set. Calling this more
/// than once is harmless: later calls leave the first logger in place.
pub fn init_logger_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Logs `data` as an uppercase hex string at trace level.
pub fn log_frame_hex(label: &str, data: &[u8]) {
    if log_enabled!(Level::Trace) {
        trace!("{label} ({} bytes): {}", data.len(), hex::encode_upper(data));
    }
}
