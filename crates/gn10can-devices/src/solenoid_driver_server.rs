use std::rc::Rc;

use gn10can_bus::{Device, DeviceHandle, Endpoint, FrameHandler, Router};
use gn10can_frame::{payload, DeviceType, Frame, SolenoidDriverCommand};

use crate::solenoid_driver_client::{bitmap_to_states, SOLENOID_COUNT};

/// Driver side of a solenoid driver.
#[derive(Debug)]
pub struct SolenoidDriverServer {
    endpoint: Endpoint,
    init: Option<u8>,
    target: Option<u8>,
}

impl SolenoidDriverServer {
    /// Create the server for solenoid driver `device_id` and attach it to `router`.
    pub fn new(router: Rc<dyn Router>, device_id: u8) -> DeviceHandle<Self> {
        DeviceHandle::new(Self {
            endpoint: Endpoint::new(router, DeviceType::SolenoidDriver, device_id),
            init: None,
            target: None,
        })
    }

    /// Init value received since the last call.
    pub fn take_init(&mut self) -> Option<u8> {
        self.init.take()
    }

    /// Target bitmap received since the last call.
    pub fn take_target(&mut self) -> Option<u8> {
        self.target.take()
    }

    /// Target received since the last call, as per-output states.
    pub fn take_target_states(&mut self) -> Option<[bool; SOLENOID_COUNT]> {
        self.take_target().map(bitmap_to_states)
    }
}

impl FrameHandler for SolenoidDriverServer {
    fn on_receive(&mut self, frame: &Frame) {
        if !self.accepts(frame) {
            return;
        }
        let Ok(value) = payload::read::<u8>(frame, 0) else {
            return;
        };
        match frame.id_fields().command_as::<SolenoidDriverCommand>() {
            Some(SolenoidDriverCommand::Init) => self.init = Some(value),
            Some(SolenoidDriverCommand::Target) => self.target = Some(value),
            None => {}
        }
    }
}

impl Device for SolenoidDriverServer {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}
