//! Addressing and payload layer for gn10can.
//!
//! Every frame on a gn10can bus uses an 11-bit standard identifier split into:
//! - A 4-bit device type (motor driver, servo driver, ...)
//! - A 4-bit device id, distinguishing modules of the same type
//! - A 3-bit command, scoped to the device type
//!
//! The upper 8 bits form the routing key used by the bus to find the owning
//! device. Payloads are at most 8 bytes of little-endian fixed-width values.

pub mod error;
pub mod frame;
pub mod id;
pub mod payload;

pub use error::{IdError, PayloadError, Result};
pub use frame::{Frame, MAX_DLC};
pub use id::{
    pack, pack_command, pack_raw, routing_key, unpack, Command, CommunicationModuleCommand,
    DeviceType, EmergencyStopCommand, IdFields, LedCommand, MotorDriverCommand, RoutingKey,
    SensorHubCommand, ServoDriverCommand, SolenoidDriverCommand, COMMAND_MASK, MAX_DEVICE_ID,
    ROUTING_MASK, STANDARD_ID_MASK,
};
pub use payload::Scalar;
