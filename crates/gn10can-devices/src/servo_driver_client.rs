use std::rc::Rc;

use gn10can_bus::{Device, DeviceHandle, Endpoint, FrameHandler, Router};
use gn10can_frame::{DeviceType, Frame, ServoDriverCommand};

/// Controller side of a servo driver.
#[derive(Debug)]
pub struct ServoDriverClient {
    endpoint: Endpoint,
    current_angle: f32,
}

impl ServoDriverClient {
    /// Create a client for servo driver `device_id` and attach it to `router`.
    pub fn new(router: Rc<dyn Router>, device_id: u8) -> DeviceHandle<Self> {
        DeviceHandle::new(Self {
            endpoint: Endpoint::new(router, DeviceType::ServoDriver, device_id),
            current_angle: 0.0,
        })
    }

    pub fn set_init(&self) -> bool {
        self.endpoint.send_command(ServoDriverCommand::Init, &[])
    }

    /// Command a target angle in degrees.
    pub fn set_angle(&self, degrees: f32) -> bool {
        self.endpoint
            .send_command(ServoDriverCommand::Target, &degrees.to_le_bytes())
    }

    /// Set the PWM frequency in Hz.
    pub fn set_frequency(&self, hz: f32) -> bool {
        self.endpoint
            .send_command(ServoDriverCommand::Frequency, &hz.to_le_bytes())
    }

    /// Last angle reported by the driver, in degrees.
    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }
}

impl FrameHandler for ServoDriverClient {
    fn on_receive(&mut self, frame: &Frame) {
        if !self.accepts(frame) {
            return;
        }
        if frame.id_fields().is_command(ServoDriverCommand::Target) {
            if let Ok(angle) = frame.read::<f32>(0) {
                self.current_angle = angle;
            }
        }
    }
}

impl Device for ServoDriverClient {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}
