use std::rc::Rc;

use gn10can_bus::{Device, DeviceHandle, Endpoint, FrameHandler, Router};
use gn10can_frame::{payload, DeviceType, Frame, MotorDriverCommand, Scalar};
use tracing::debug;

use crate::motor_driver_types::{GainType, MotorConfig, MOTOR_CONFIG_SIZE};

/// Driver side of a motor driver: receives commands, reports telemetry.
///
/// Received values are held until taken with the `take_*` methods, so each
/// command is observed once.
#[derive(Debug)]
pub struct MotorDriverServer {
    endpoint: Endpoint,
    config: Option<MotorConfig>,
    target: Option<f32>,
    gains: [Option<f32>; GainType::COUNT],
}

impl MotorDriverServer {
    /// Create the server for motor driver `device_id` and attach it to `router`.
    pub fn new(router: Rc<dyn Router>, device_id: u8) -> DeviceHandle<Self> {
        DeviceHandle::new(Self {
            endpoint: Endpoint::new(router, DeviceType::MotorDriver, device_id),
            config: None,
            target: None,
            gains: [None; GainType::COUNT],
        })
    }

    /// Report the measured value and limit switch bitmap.
    pub fn send_feedback(&self, value: f32, limit_switches: u8) -> bool {
        self.send_pair(MotorDriverCommand::Feedback, value, limit_switches)
    }

    /// Report load current and temperature.
    pub fn send_hardware_status(&self, load_current: f32, temperature: i8) -> bool {
        self.send_pair(MotorDriverCommand::HardwareStatus, load_current, temperature)
    }

    /// Configuration received since the last call.
    pub fn take_init(&mut self) -> Option<MotorConfig> {
        self.config.take()
    }

    /// Target received since the last call.
    pub fn take_target(&mut self) -> Option<f32> {
        self.target.take()
    }

    /// Gain received for `gain` since the last call.
    pub fn take_gain(&mut self, gain: GainType) -> Option<f32> {
        self.gains[gain.index()].take()
    }

    fn send_pair<A: Scalar, B: Scalar>(&self, command: MotorDriverCommand, a: A, b: B) -> bool {
        let mut buf = [0u8; 5];
        let packed = payload::pack(&mut buf, 0, a).and_then(|()| payload::pack(&mut buf, 4, b));
        match packed {
            Ok(()) => self.endpoint.send_command(command, &buf),
            Err(err) => {
                debug!(error = %err, "motor driver payload did not fit");
                false
            }
        }
    }
}

impl FrameHandler for MotorDriverServer {
    fn on_receive(&mut self, frame: &Frame) {
        if !self.accepts(frame) {
            return;
        }

        match frame.id_fields().command_as::<MotorDriverCommand>() {
            Some(MotorDriverCommand::Init) => {
                match payload::read::<[u8; MOTOR_CONFIG_SIZE]>(frame, 0)
                    .ok()
                    .and_then(|bytes| MotorConfig::from_bytes(&bytes))
                {
                    Some(config) => self.config = Some(config),
                    None => debug!(dlc = frame.dlc, "malformed motor config ignored"),
                }
            }
            Some(MotorDriverCommand::Target) => {
                if let Ok(target) = payload::read::<f32>(frame, 0) {
                    self.target = Some(target);
                }
            }
            Some(MotorDriverCommand::Gain) => {
                let gain = payload::read::<u8>(frame, 0).ok().and_then(GainType::from_raw);
                if let (Some(gain), Ok(value)) = (gain, payload::read::<f32>(frame, 1)) {
                    self.gains[gain.index()] = Some(value);
                }
            }
            _ => {}
        }
    }
}

impl Device for MotorDriverServer {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use gn10can_transceiver::{Transceiver, VirtualWire};

    use super::*;
    use gn10can_bus::Bus;

    #[test]
    fn gain_frame_updates_only_that_slot() {
        let wire = VirtualWire::new();
        let bus = Rc::new(Bus::new(wire.connect()));
        let mut remote = wire.connect();
        let server = MotorDriverServer::new(bus.clone(), 2);

        let mut frame = Frame::make_command(2, MotorDriverCommand::Gain, &[GainType::Ki as u8]);
        frame.write(1, 0.25f32).unwrap();
        remote.send(&frame);
        bus.poll();

        let mut server = server.borrow_mut();
        assert_eq!(server.take_gain(GainType::Ki), Some(0.25));
        assert_eq!(server.take_gain(GainType::Ki), None);
        assert_eq!(server.take_gain(GainType::Kp), None);
    }

    #[test]
    fn malformed_frames_are_ignored() {
        let wire = VirtualWire::new();
        let bus = Rc::new(Bus::new(wire.connect()));
        let mut remote = wire.connect();
        let server = MotorDriverServer::new(bus.clone(), 0);

        // gain type out of range, short target, short config
        let mut bad_gain = Frame::make_command(0, MotorDriverCommand::Gain, &[7]);
        bad_gain.write(1, 1.0f32).unwrap();
        remote.send(&bad_gain);
        remote.send(&Frame::make_command(0, MotorDriverCommand::Target, &[1, 2]));
        remote.send(&Frame::make_command(0, MotorDriverCommand::Init, &[1, 2, 3]));
        assert_eq!(bus.poll().dispatched, 3);

        let mut server = server.borrow_mut();
        assert!(GainType::ALL.iter().all(|g| server.take_gain(*g).is_none()));
        assert_eq!(server.take_target(), None);
        assert_eq!(server.take_init(), None);
    }

    #[test]
    fn frames_for_other_addresses_are_ignored_when_called_directly() {
        let wire = VirtualWire::new();
        let bus = Rc::new(Bus::new(wire.connect()));
        let server = MotorDriverServer::new(bus.clone(), 1);

        let mut frame = Frame::make_command(2, MotorDriverCommand::Target, &[]);
        frame.write(0, 5.0f32).unwrap();
        server.borrow_mut().on_receive(&frame);
        assert_eq!(server.borrow_mut().take_target(), None);
    }
}
