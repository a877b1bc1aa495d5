//! Transceiver contract for gn10can.
//!
//! A transceiver is the hardware-facing edge of a bus: non-blocking `send`
//! and `receive` of raw frames, nothing more. Backends:
//! - [`VirtualWire`]: in-memory shared medium for simulation and tests
//! - [`SocketCanTransceiver`]: Linux SocketCAN (Linux only)

pub mod error;
pub mod traits;
pub mod virtual_wire;

#[cfg(target_os = "linux")]
pub mod socket_can;

pub use error::{Result, TransceiverError};
pub use traits::Transceiver;
pub use virtual_wire::{VirtualConfig, VirtualTransceiver, VirtualWire, DEFAULT_RX_QUEUE_DEPTH};

#[cfg(target_os = "linux")]
pub use socket_can::SocketCanTransceiver;
