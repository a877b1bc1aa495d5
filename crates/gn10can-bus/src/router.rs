use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gn10can_frame::{Frame, RoutingKey};

use crate::error::Result;

/// Receives frames dispatched by a bus.
pub trait FrameHandler {
    /// Called once for every received frame whose routing key matches the
    /// key this handler is registered under.
    fn on_receive(&mut self, frame: &Frame);
}

/// Shared handle to a registered handler.
pub type HandlerRef = Rc<RefCell<dyn FrameHandler>>;

/// Non-owning reference kept by the registry.
pub type WeakHandlerRef = Weak<RefCell<dyn FrameHandler>>;

/// The part of a bus that devices talk to.
///
/// Devices hold an `Rc<dyn Router>` so they do not depend on the concrete
/// transceiver type of the bus they live on.
pub trait Router {
    /// Transmit `frame`, returning the transceiver's verdict unchanged.
    fn send_frame(&self, frame: &Frame) -> bool;

    /// Register `handler` under `key`.
    fn attach(&self, key: RoutingKey, handler: &HandlerRef) -> Result<()>;

    /// Remove the registration under `key` if it belongs to `handler`.
    ///
    /// Returns true if an entry was removed.
    fn detach(&self, key: RoutingKey, handler: &HandlerRef) -> bool;

    /// True if `handler` is the live registration under `key`.
    fn is_registered(&self, key: RoutingKey, handler: &HandlerRef) -> bool;
}
