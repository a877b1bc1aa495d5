//! In-memory CAN medium.
//!
//! A [`VirtualWire`] stands in for the physical bus: every
//! [`VirtualTransceiver`] connected to it receives what the others send, in
//! send order. Used for host-side simulation and tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use gn10can_frame::Frame;
use tracing::{trace, warn};

use crate::traits::Transceiver;

/// Default per-endpoint receive queue depth.
pub const DEFAULT_RX_QUEUE_DEPTH: usize = 64;

/// Configuration for a [`VirtualWire`].
#[derive(Debug, Clone)]
pub struct VirtualConfig {
    /// Frames each endpoint can hold before new arrivals are dropped.
    pub rx_queue_depth: usize,
    /// Deliver sent frames back to the sending endpoint too.
    pub loopback: bool,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            rx_queue_depth: DEFAULT_RX_QUEUE_DEPTH,
            loopback: false,
        }
    }
}

impl VirtualConfig {
    /// Set the per-endpoint receive queue depth.
    pub fn with_rx_queue_depth(mut self, depth: usize) -> Self {
        self.rx_queue_depth = depth;
        self
    }

    /// Enable or disable loopback to the sender.
    pub fn with_loopback(mut self, loopback: bool) -> Self {
        self.loopback = loopback;
        self
    }
}

/// Receive side of one endpoint.
#[derive(Debug, Default)]
struct RxQueue {
    frames: VecDeque<Frame>,
    overruns: u64,
}

#[derive(Debug)]
struct WireState {
    config: VirtualConfig,
    online: bool,
    next_port: usize,
    ports: Vec<(usize, Weak<RefCell<RxQueue>>)>,
    delivered: u64,
}

impl WireState {
    /// Push `frame` into every live endpoint except `skip`. Dead endpoints are
    /// pruned along the way.
    fn deliver(&mut self, frame: &Frame, skip: Option<usize>) {
        let depth = self.config.rx_queue_depth;
        let mut delivered = 0;
        self.ports.retain(|(port, queue)| {
            let Some(queue) = queue.upgrade() else {
                return false;
            };
            if Some(*port) != skip {
                let mut queue = queue.borrow_mut();
                if queue.frames.len() >= depth {
                    queue.overruns += 1;
                    warn!(port, id = frame.id, "virtual rx queue full, frame dropped");
                } else {
                    queue.frames.push_back(*frame);
                    delivered += 1;
                }
            }
            true
        });
        self.delivered += delivered;
    }
}

/// A shared in-memory CAN medium.
///
/// Cloning a `VirtualWire` yields another handle to the same medium.
#[derive(Debug, Clone)]
pub struct VirtualWire {
    state: Rc<RefCell<WireState>>,
}

impl Default for VirtualWire {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualWire {
    /// Create a wire with default configuration.
    pub fn new() -> Self {
        Self::with_config(VirtualConfig::default())
    }

    /// Create a wire with explicit configuration.
    pub fn with_config(config: VirtualConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(WireState {
                config,
                online: true,
                next_port: 0,
                ports: Vec::new(),
                delivered: 0,
            })),
        }
    }

    /// Connect a new endpoint to the wire.
    pub fn connect(&self) -> VirtualTransceiver {
        let rx = Rc::new(RefCell::new(RxQueue::default()));
        let mut state = self.state.borrow_mut();
        let port = state.next_port;
        state.next_port += 1;
        state.ports.push((port, Rc::downgrade(&rx)));
        trace!(port, "endpoint connected to virtual wire");
        VirtualTransceiver {
            wire: Rc::clone(&self.state),
            rx,
            port,
        }
    }

    /// Take the wire on or off line. While offline every `send` fails.
    pub fn set_online(&self, online: bool) {
        self.state.borrow_mut().online = online;
    }

    /// Whether the wire currently accepts frames.
    pub fn is_online(&self) -> bool {
        self.state.borrow().online
    }

    /// Deliver `frame` to every endpoint, as if sent by a node that has no
    /// transceiver of its own. Returns false while the wire is offline.
    pub fn broadcast(&self, frame: &Frame) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.online {
            return false;
        }
        state.deliver(frame, None);
        true
    }

    /// Number of endpoints still connected.
    pub fn endpoint_count(&self) -> usize {
        self.state
            .borrow()
            .ports
            .iter()
            .filter(|(_, queue)| queue.strong_count() > 0)
            .count()
    }

    /// Total frames placed into endpoint queues so far.
    pub fn delivered(&self) -> u64 {
        self.state.borrow().delivered
    }
}

/// One endpoint of a [`VirtualWire`].
#[derive(Debug)]
pub struct VirtualTransceiver {
    wire: Rc<RefCell<WireState>>,
    rx: Rc<RefCell<RxQueue>>,
    port: usize,
}

impl VirtualTransceiver {
    /// Port number of this endpoint on its wire.
    pub fn port(&self) -> usize {
        self.port
    }

    /// Push `frame` straight into this endpoint's receive queue.
    ///
    /// Returns false if the queue is full.
    pub fn inject(&self, frame: Frame) -> bool {
        let depth = self.wire.borrow().config.rx_queue_depth;
        let mut rx = self.rx.borrow_mut();
        if rx.frames.len() >= depth {
            rx.overruns += 1;
            warn!(port = self.port, id = frame.id, "virtual rx queue full, frame dropped");
            return false;
        }
        rx.frames.push_back(frame);
        true
    }

    /// Frames waiting to be received.
    pub fn pending(&self) -> usize {
        self.rx.borrow().frames.len()
    }

    /// Frames dropped because the receive queue was full.
    pub fn overruns(&self) -> u64 {
        self.rx.borrow().overruns
    }
}

impl Transceiver for VirtualTransceiver {
    fn send(&mut self, frame: &Frame) -> bool {
        let mut wire = self.wire.borrow_mut();
        if !wire.online {
            trace!(port = self.port, id = frame.id, "virtual wire offline, send refused");
            return false;
        }
        let skip = if wire.config.loopback {
            None
        } else {
            Some(self.port)
        };
        wire.deliver(frame, skip);
        true
    }

    fn receive(&mut self) -> Option<Frame> {
        self.rx.borrow_mut().frames.pop_front()
    }
}
