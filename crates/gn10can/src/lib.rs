//! Device addressing and routing for robot CAN buses.
//!
//! gn10can packs a device type, a device id and a command into every 11-bit
//! CAN identifier, and routes received frames to the device that owns them.
//!
//! # Crate Structure
//!
//! - [`frame`]: identifier layout, frame type and payload codec
//! - [`transceiver`]: non-blocking send/receive contract and backends
//! - [`bus`]: routing-key registry, dispatch and the device base contract
//! - [`devices`]: motor, servo and solenoid drivers (behind `devices` feature)

/// Re-export frame types.
pub mod frame {
    pub use gn10can_frame::*;
}

/// Re-export transceiver types.
pub mod transceiver {
    pub use gn10can_transceiver::*;
}

/// Re-export bus types.
pub mod bus {
    pub use gn10can_bus::*;
}

/// Re-export device types (requires `devices` feature).
#[cfg(feature = "devices")]
pub mod devices {
    pub use gn10can_devices::*;
}
