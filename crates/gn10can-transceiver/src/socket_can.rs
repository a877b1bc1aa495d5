//! Linux SocketCAN backend.

use std::io::ErrorKind;

use gn10can_frame::{Frame, MAX_DLC};
use socketcan::{CanFrame, CanSocket, EmbeddedFrame, ExtendedId, Id, Socket, StandardId};
use tracing::{debug, info};

use crate::error::{Result, TransceiverError};
use crate::traits::Transceiver;

/// Raw CAN socket bound to one interface, in non-blocking mode.
pub struct SocketCanTransceiver {
    socket: CanSocket,
    interface: String,
}

impl SocketCanTransceiver {
    /// Open `interface` (for example `can0` or `vcan0`).
    pub fn open(interface: &str) -> Result<Self> {
        let socket = CanSocket::open(interface).map_err(|e| TransceiverError::Open {
            interface: interface.to_string(),
            source: e,
        })?;
        socket.set_nonblocking(true)?;
        info!(interface, "opened CAN interface");
        Ok(Self {
            socket,
            interface: interface.to_string(),
        })
    }

    /// Name of the bound interface.
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl std::fmt::Debug for SocketCanTransceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketCanTransceiver")
            .field("interface", &self.interface)
            .finish()
    }
}

fn to_socket_id(frame: &Frame) -> Option<Id> {
    if frame.is_extended {
        ExtendedId::new(frame.id).map(Id::Extended)
    } else {
        u16::try_from(frame.id)
            .ok()
            .and_then(StandardId::new)
            .map(Id::Standard)
    }
}

fn to_socket_frame(frame: &Frame) -> Option<CanFrame> {
    let id = to_socket_id(frame)?;
    if frame.is_rtr {
        CanFrame::new_remote(id, frame.len())
    } else {
        CanFrame::new(id, frame.data())
    }
}

fn from_socket_frame(frame: &CanFrame) -> Frame {
    let (id, is_extended) = match frame.id() {
        Id::Standard(id) => (u32::from(id.as_raw()), false),
        Id::Extended(id) => (id.as_raw(), true),
    };
    let is_rtr = frame.is_remote_frame();
    let mut out = if is_rtr {
        Frame::remote(id, frame.dlc().min(MAX_DLC) as u8)
    } else {
        Frame::new(id, frame.data())
    };
    out.is_extended = is_extended;
    out.is_error = matches!(frame, CanFrame::Error(_));
    out
}

impl Transceiver for SocketCanTransceiver {
    fn send(&mut self, frame: &Frame) -> bool {
        let Some(raw) = to_socket_frame(frame) else {
            debug!(id = frame.id, "identifier does not fit a CAN frame, not sent");
            return false;
        };
        match self.socket.write_frame(&raw) {
            Ok(()) => true,
            Err(e) => {
                debug!(interface = %self.interface, id = frame.id, error = %e, "CAN write failed");
                false
            }
        }
    }

    fn receive(&mut self) -> Option<Frame> {
        match self.socket.read_frame() {
            Ok(frame) => Some(from_socket_frame(&frame)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                debug!(interface = %self.interface, error = %e, "CAN read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_data_frame_converts_both_ways() {
        let frame = Frame::new(0x89, &[1, 2, 3]);
        let raw = to_socket_frame(&frame).unwrap();
        assert!(!raw.is_extended());
        assert_eq!(from_socket_frame(&raw), frame);
    }

    #[test]
    fn extended_and_remote_flags_survive() {
        let mut frame = Frame::remote(0x1234_5678 & 0x1FFF_FFFF, 4);
        frame.is_extended = true;
        let raw = to_socket_frame(&frame).unwrap();
        let back = from_socket_frame(&raw);
        assert!(back.is_extended);
        assert!(back.is_rtr);
        assert_eq!(back.id, frame.id);
        assert_eq!(back.dlc, 4);
    }

    #[test]
    fn oversized_standard_identifier_is_rejected() {
        let frame = Frame::new(0x800, &[]);
        assert!(to_socket_frame(&frame).is_none());
    }
}
