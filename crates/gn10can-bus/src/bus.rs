use std::cell::RefCell;

use gn10can_frame::{Frame, RoutingKey};
use gn10can_transceiver::Transceiver;
use tracing::{debug, trace, warn};

use crate::config::BusConfig;
use crate::error::Result;
use crate::registry::Registry;
use crate::router::{HandlerRef, Router};

/// Counters from one [`Bus::poll`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Frames taken from the transceiver.
    pub received: usize,
    /// Frames handed to a registered device.
    pub dispatched: usize,
    /// Frames with no live registration for their routing key.
    pub unrouted: usize,
}

/// One logical CAN bus: a transceiver plus the device registry.
///
/// The bus never owns its devices. Share it as `Rc<Bus<T>>`; devices keep an
/// `Rc<dyn Router>` to it.
pub struct Bus<T> {
    transceiver: RefCell<T>,
    registry: RefCell<Registry>,
}

impl<T: Transceiver> Bus<T> {
    /// Create a bus with default config.
    pub fn new(transceiver: T) -> Self {
        Self::with_config(transceiver, BusConfig::default())
    }

    /// Create a bus with explicit config.
    pub fn with_config(transceiver: T, config: BusConfig) -> Self {
        Self {
            transceiver: RefCell::new(transceiver),
            registry: RefCell::new(Registry::with_config(config)),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> BusConfig {
        *self.registry.borrow().config()
    }

    /// Register `handler` under `key`.
    ///
    /// Fails with `BusError::RegistryFull` when the registry is at capacity and
    /// with `BusError::DuplicateRoutingKey` when another live handler owns the
    /// key under the reject policy.
    pub fn attach(&self, key: RoutingKey, handler: &HandlerRef) -> Result<()> {
        self.registry.borrow_mut().insert(key, handler)
    }

    /// Remove the registration under `key` if it belongs to `handler`.
    pub fn detach(&self, key: RoutingKey, handler: &HandlerRef) -> bool {
        self.registry.borrow_mut().remove_handler(key, handler)
    }

    /// Remove whatever is registered under `key`.
    pub fn detach_key(&self, key: RoutingKey) -> bool {
        self.registry.borrow_mut().remove(key)
    }

    /// True if a live device is registered under `key`.
    pub fn is_attached(&self, key: RoutingKey) -> bool {
        self.registry.borrow().contains_key(key)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    /// True if no device is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Routing keys with a live registration, in ascending order.
    pub fn routing_keys(&self) -> Vec<RoutingKey> {
        self.registry.borrow().keys()
    }

    /// Transmit `frame`. No retry; the transceiver's result is returned as is.
    pub fn send_frame(&self, frame: &Frame) -> bool {
        let sent = self.transceiver.borrow_mut().send(frame);
        if !sent {
            debug!(id = frame.id, "transceiver refused frame");
        }
        sent
    }

    /// Drain the transceiver, then dispatch every drained frame to its device.
    ///
    /// Only frames queued when the pass starts are dispatched. Frames sent by
    /// handlers during the pass, including ones a loopback transceiver hands
    /// straight back, wait for the next `poll`.
    ///
    /// Neither the transceiver nor the registry is borrowed while a handler
    /// runs, so handlers may send, attach or detach. A handler that is already
    /// borrowed (for example by a nested `poll` from inside its own
    /// `on_receive`) is skipped.
    pub fn poll(&self) -> PollSummary {
        let frames = self.drain();
        let mut summary = PollSummary {
            received: frames.len(),
            ..PollSummary::default()
        };

        for frame in &frames {
            if self.dispatch(frame) {
                summary.dispatched += 1;
            } else {
                summary.unrouted += 1;
            }
        }

        summary
    }

    fn drain(&self) -> Vec<Frame> {
        let mut transceiver = self.transceiver.borrow_mut();
        std::iter::from_fn(|| transceiver.receive()).collect()
    }

    /// Hand `frame` to the live device under its routing key.
    fn dispatch(&self, frame: &Frame) -> bool {
        let key = frame.routing_key();
        let handler = self.registry.borrow_mut().resolve(key);
        let Some(handler) = handler else {
            trace!(id = frame.id, %key, "no device for frame, dropped");
            return false;
        };

        let Ok(mut device) = handler.try_borrow_mut() else {
            warn!(id = frame.id, %key, "device busy, frame dropped");
            return false;
        };
        trace!(id = frame.id, %key, dlc = frame.dlc, "dispatching frame");
        device.on_receive(frame);
        true
    }

    /// Run `f` with exclusive access to the transceiver.
    ///
    /// Must not be called from inside a transceiver operation.
    pub fn with_transceiver<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut transceiver = self.transceiver.borrow_mut();
        f(&mut *transceiver)
    }
}

impl<T: Transceiver> Router for Bus<T> {
    fn send_frame(&self, frame: &Frame) -> bool {
        Bus::send_frame(self, frame)
    }

    fn attach(&self, key: RoutingKey, handler: &HandlerRef) -> Result<()> {
        Bus::attach(self, key, handler)
    }

    fn detach(&self, key: RoutingKey, handler: &HandlerRef) -> bool {
        Bus::detach(self, key, handler)
    }

    fn is_registered(&self, key: RoutingKey, handler: &HandlerRef) -> bool {
        self.registry.borrow().contains_handler(key, handler)
    }
}

impl<T> std::fmt::Debug for Bus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered = self.registry.try_borrow().map(|r| r.len()).ok();
        f.debug_struct("Bus")
            .field("registered", &registered)
            .finish_non_exhaustive()
    }
}
