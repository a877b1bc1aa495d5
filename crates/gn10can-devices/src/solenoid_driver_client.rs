use std::rc::Rc;

use gn10can_bus::{Device, DeviceHandle, Endpoint, FrameHandler, Router};
use gn10can_frame::{DeviceType, Frame, SolenoidDriverCommand};

/// Number of solenoid outputs on one driver.
pub const SOLENOID_COUNT: usize = 8;

/// Pack per-output states into a bitmap, output 0 in bit 0.
pub fn states_to_bitmap(states: [bool; SOLENOID_COUNT]) -> u8 {
    states
        .iter()
        .enumerate()
        .fold(0u8, |bits, (i, on)| bits | (u8::from(*on) << i))
}

/// Unpack a bitmap into per-output states.
pub fn bitmap_to_states(bits: u8) -> [bool; SOLENOID_COUNT] {
    std::array::from_fn(|i| bits & (1 << i) != 0)
}

/// Controller side of a solenoid driver.
#[derive(Debug)]
pub struct SolenoidDriverClient {
    endpoint: Endpoint,
}

impl SolenoidDriverClient {
    /// Create a client for solenoid driver `device_id` and attach it to `router`.
    pub fn new(router: Rc<dyn Router>, device_id: u8) -> DeviceHandle<Self> {
        DeviceHandle::new(Self {
            endpoint: Endpoint::new(router, DeviceType::SolenoidDriver, device_id),
        })
    }

    pub fn set_init(&self) -> bool {
        self.endpoint.send_command(SolenoidDriverCommand::Init, &[0])
    }

    /// Drive all outputs from a bitmap.
    pub fn set_target(&self, bits: u8) -> bool {
        self.endpoint
            .send_command(SolenoidDriverCommand::Target, &[bits])
    }

    /// Drive all outputs from per-output states.
    pub fn set_target_states(&self, states: [bool; SOLENOID_COUNT]) -> bool {
        self.set_target(states_to_bitmap(states))
    }
}

impl FrameHandler for SolenoidDriverClient {
    fn on_receive(&mut self, _frame: &Frame) {}
}

impl Device for SolenoidDriverClient {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_conversion() {
        let mut states = [false; SOLENOID_COUNT];
        states[0] = true;
        states[3] = true;
        states[7] = true;
        assert_eq!(states_to_bitmap(states), 0b1000_1001);
        assert_eq!(bitmap_to_states(0b1000_1001), states);
        assert_eq!(bitmap_to_states(0), [false; SOLENOID_COUNT]);
    }
}
