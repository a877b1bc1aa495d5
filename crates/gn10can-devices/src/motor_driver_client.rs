use std::rc::Rc;

use gn10can_bus::{Device, DeviceHandle, Endpoint, FrameHandler, Router};
use gn10can_frame::{payload, DeviceType, Frame, MotorDriverCommand};

use crate::motor_driver_types::{GainType, MotorConfig};

/// Controller side of a motor driver: sends commands, tracks telemetry.
#[derive(Debug)]
pub struct MotorDriverClient {
    endpoint: Endpoint,
    feedback_value: f32,
    limit_switches: u8,
    load_current: f32,
    temperature: i8,
}

impl MotorDriverClient {
    /// Create a client for motor driver `device_id` and attach it to `router`.
    pub fn new(router: Rc<dyn Router>, device_id: u8) -> DeviceHandle<Self> {
        DeviceHandle::new(Self {
            endpoint: Endpoint::new(router, DeviceType::MotorDriver, device_id),
            feedback_value: 0.0,
            limit_switches: 0,
            load_current: 0.0,
            temperature: 0,
        })
    }

    /// Send the start-up configuration.
    pub fn set_init(&self, config: &MotorConfig) -> bool {
        self.endpoint
            .send_command(MotorDriverCommand::Init, &config.to_bytes())
    }

    /// Send a new target (speed or position, depending on the driver mode).
    pub fn set_target(&self, target: f32) -> bool {
        self.endpoint
            .send_command(MotorDriverCommand::Target, &target.to_le_bytes())
    }

    /// Send one controller gain.
    pub fn set_gain(&self, gain: GainType, value: f32) -> bool {
        let mut buf = [0u8; 5];
        buf[0] = gain as u8;
        buf[1..].copy_from_slice(&value.to_le_bytes());
        self.endpoint.send_command(MotorDriverCommand::Gain, &buf)
    }

    /// Last reported feedback value.
    pub fn feedback_value(&self) -> f32 {
        self.feedback_value
    }

    /// Last reported limit switch bitmap.
    pub fn limit_switches(&self) -> u8 {
        self.limit_switches
    }

    /// Last reported load current.
    pub fn load_current(&self) -> f32 {
        self.load_current
    }

    /// Last reported temperature.
    pub fn temperature(&self) -> i8 {
        self.temperature
    }
}

impl FrameHandler for MotorDriverClient {
    fn on_receive(&mut self, frame: &Frame) {
        if !self.accepts(frame) {
            return;
        }

        match frame.id_fields().command_as::<MotorDriverCommand>() {
            Some(MotorDriverCommand::Feedback) => {
                if let Ok(value) = payload::read::<f32>(frame, 0) {
                    self.feedback_value = value;
                }
                if let Ok(switches) = payload::read::<u8>(frame, 4) {
                    self.limit_switches = switches;
                }
            }
            Some(MotorDriverCommand::HardwareStatus) => {
                if let Ok(current) = payload::read::<f32>(frame, 0) {
                    self.load_current = current;
                }
                if let Ok(temperature) = payload::read::<i8>(frame, 4) {
                    self.temperature = temperature;
                }
            }
            _ => {}
        }
    }
}

impl Device for MotorDriverClient {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}
