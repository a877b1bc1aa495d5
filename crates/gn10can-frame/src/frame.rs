use tracing::trace;

use crate::error::Result;
use crate::id::{self, Command, DeviceType, IdFields, RoutingKey};
use crate::payload::{self, Scalar};

/// Size of the classic CAN data field.
pub const MAX_DLC: usize = 8;

/// A classic CAN frame.
///
/// Only the first `dlc` bytes of `data` carry meaning; the rest are kept
/// zeroed by every constructor in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame {
    /// Arbitration identifier. Only the low 11 bits are used for standard addressing.
    pub id: u32,
    /// Data field.
    pub data: [u8; MAX_DLC],
    /// Declared data length (0-8).
    pub dlc: u8,
    /// 29-bit identifier frame.
    pub is_extended: bool,
    /// Remote transmission request.
    pub is_rtr: bool,
    /// Error frame reported by the controller.
    pub is_error: bool,
}

impl Frame {
    /// Create a data frame with a raw identifier.
    ///
    /// Payload bytes past the eighth are dropped.
    pub fn new(id: u32, payload: &[u8]) -> Self {
        let mut frame = Self {
            id,
            ..Self::default()
        };
        frame.set_data(payload);
        frame
    }

    /// Create a data frame addressed to a device.
    pub fn make(device_type: DeviceType, device_id: u8, command: u8, payload: &[u8]) -> Self {
        Self::new(id::pack(device_type, device_id, command), payload)
    }

    /// Create a data frame carrying a typed command.
    pub fn make_command<C: Command>(device_id: u8, command: C, payload: &[u8]) -> Self {
        Self::new(id::pack_command(device_id, command), payload)
    }

    /// Create a remote (RTR) frame requesting `dlc` bytes.
    pub fn remote(id: u32, dlc: u8) -> Self {
        Self {
            id,
            dlc: dlc.min(MAX_DLC as u8),
            is_rtr: true,
            ..Self::default()
        }
    }

    /// Replace the data field, truncating to 8 bytes and zero-filling the rest.
    pub fn set_data(&mut self, payload: &[u8]) {
        let size = payload.len().min(MAX_DLC);
        if payload.len() > MAX_DLC {
            trace!(
                id = self.id,
                len = payload.len(),
                "payload truncated to {MAX_DLC} bytes"
            );
        }
        self.data = [0; MAX_DLC];
        self.data[..size].copy_from_slice(&payload[..size]);
        self.dlc = size as u8;
    }

    /// The meaningful part of the data field.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Declared length, clamped to the data field size.
    pub fn len(&self) -> usize {
        usize::from(self.dlc).min(MAX_DLC)
    }

    /// True when the frame declares no data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded identifier fields.
    pub fn id_fields(&self) -> IdFields {
        id::unpack(self.id)
    }

    /// Routing key of this frame's identifier.
    pub fn routing_key(&self) -> RoutingKey {
        id::routing_key(self.id)
    }

    /// Write `value` at `offset`, growing `dlc` as needed.
    pub fn write<T: Scalar>(&mut self, offset: usize, value: T) -> Result<()> {
        payload::write(self, offset, value)
    }

    /// Read a value at `offset` within the declared length.
    pub fn read<T: Scalar>(&self, offset: usize) -> Result<T> {
        payload::read(self, offset)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.dlc == other.dlc
            && self.is_extended == other.is_extended
            && self.is_rtr == other.is_rtr
            && self.is_error == other.is_error
            && self.data() == other.data()
    }
}

impl Eq for Frame {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::MotorDriverCommand;

    #[test]
    fn make_sets_identifier_and_length() {
        let frame = Frame::make(DeviceType::MotorDriver, 1, 1, &[1, 2, 3]);
        assert_eq!(frame.id, 0x89);
        assert_eq!(frame.dlc, 3);
        assert_eq!(frame.data(), &[1, 2, 3]);
        assert_eq!(&frame.data[3..], &[0; 5]);
    }

    #[test]
    fn make_truncates_long_payload() {
        let payload: Vec<u8> = (1..=12).collect();
        let frame = Frame::make_command(2, MotorDriverCommand::Init, &payload);
        assert_eq!(frame.dlc, 8);
        assert_eq!(frame.data(), &payload[..8]);
    }

    #[test]
    fn set_data_zero_fills_previous_contents() {
        let mut frame = Frame::new(0x10, &[0xFF; 8]);
        frame.set_data(&[0xAA]);
        assert_eq!(frame.dlc, 1);
        assert_eq!(frame.data, [0xAA, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn equality_ignores_bytes_past_dlc() {
        let a = Frame::new(0x80, &[1, 2]);
        let mut b = a;
        b.data[5] = 0x55;
        assert_eq!(a, b);

        b.data[1] = 0x03;
        assert_ne!(a, b);
    }

    #[test]
    fn equality_compares_flags() {
        let a = Frame::new(0x80, &[1]);
        let mut b = a;
        b.is_extended = true;
        assert_ne!(a, b);

        let mut c = a;
        c.dlc = 2;
        assert_ne!(a, c);
    }

    #[test]
    fn remote_frame_has_no_data() {
        let frame = Frame::remote(0x8C, 12);
        assert!(frame.is_rtr);
        assert_eq!(frame.dlc, 8);
        assert_eq!(frame.data(), &[0; 8]);
    }

    #[test]
    fn oversized_dlc_is_clamped_on_access() {
        let mut frame = Frame::new(0x1, &[9; 8]);
        frame.dlc = 15;
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.data().len(), 8);
    }

    #[test]
    fn routing_key_and_fields() {
        let frame = Frame::make_command(1, MotorDriverCommand::Feedback, &[]);
        assert_eq!(frame.routing_key().value(), 0x88);
        let fields = frame.id_fields();
        assert_eq!(fields.device_type(), Some(DeviceType::MotorDriver));
        assert!(fields.is_command(MotorDriverCommand::Feedback));
        assert!(frame.is_empty());
    }
}
