//! Devices that live on a gn10can bus.
//!
//! Each device is a [`gn10can_bus::Device`] constructed through `new`, which
//! returns a [`gn10can_bus::DeviceHandle`] already attached to the bus.
//! Clients run on the controller and send commands; servers run on the
//! driver board and hold received commands until taken.

pub mod motor_driver_client;
pub mod motor_driver_server;
pub mod motor_driver_types;
pub mod servo_driver_client;
pub mod solenoid_driver_client;
pub mod solenoid_driver_server;

pub use motor_driver_client::MotorDriverClient;
pub use motor_driver_server::MotorDriverServer;
pub use motor_driver_types::{EncoderType, GainType, LimitSwitch, MotorConfig, MOTOR_CONFIG_SIZE};
pub use servo_driver_client::ServoDriverClient;
pub use solenoid_driver_client::{
    bitmap_to_states, states_to_bitmap, SolenoidDriverClient, SOLENOID_COUNT,
};
pub use solenoid_driver_server::SolenoidDriverServer;
