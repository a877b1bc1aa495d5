//! Base contract for logical devices on a bus.
//!
//! A device owns an [`Endpoint`] (its bus handle and address) and implements
//! [`FrameHandler`] to receive frames. [`DeviceHandle`] ties registration to
//! scope: it attaches on creation and detaches when dropped.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use gn10can_frame::{Command, DeviceType, Frame, RoutingKey, MAX_DEVICE_ID};
use tracing::debug;

use crate::error::BusError;
use crate::router::{FrameHandler, HandlerRef, Router};

/// A device's connection to the bus: router handle plus fixed address.
#[derive(Clone)]
pub struct Endpoint {
    router: Rc<dyn Router>,
    device_type: DeviceType,
    device_id: u8,
}

impl Endpoint {
    /// Create an endpoint. `device_id` is masked to 4 bits.
    pub fn new(router: Rc<dyn Router>, device_type: DeviceType, device_id: u8) -> Self {
        Self {
            router,
            device_type,
            device_id: device_id & MAX_DEVICE_ID,
        }
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn device_id(&self) -> u8 {
        self.device_id
    }

    /// Routing key every frame for this device carries.
    pub fn routing_key(&self) -> RoutingKey {
        RoutingKey::new(self.device_type, self.device_id)
    }

    /// The bus this endpoint sends through.
    pub fn router(&self) -> &Rc<dyn Router> {
        &self.router
    }

    /// Send `command` with `payload` from this device's address.
    ///
    /// Payloads longer than 8 bytes are truncated. Returns the bus's
    /// `send_frame` result verbatim.
    pub fn send(&self, command: u8, payload: &[u8]) -> bool {
        let frame = Frame::make(self.device_type, self.device_id, command, payload);
        self.router.send_frame(&frame)
    }

    /// Send a typed command.
    ///
    /// Returns false without sending if `C` belongs to another device type.
    pub fn send_command<C: Command>(&self, command: C, payload: &[u8]) -> bool {
        if C::DEVICE_TYPE != self.device_type {
            debug!(
                command = command.name(),
                command_type = %C::DEVICE_TYPE,
                device_type = %self.device_type,
                "command does not belong to this device type, not sent"
            );
            return false;
        }
        self.send(command.raw(), payload)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("device_type", &self.device_type)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}

/// A logical device bound to one address on one bus.
pub trait Device: FrameHandler {
    fn endpoint(&self) -> &Endpoint;

    fn routing_key(&self) -> RoutingKey {
        self.endpoint().routing_key()
    }

    /// True if `frame` is addressed to this device.
    fn accepts(&self, frame: &Frame) -> bool {
        frame.routing_key() == self.routing_key()
    }
}

/// Owns a device and keeps it registered on its bus while alive.
///
/// Creation attempts to attach; a failed attach leaves the device usable for
/// sending but it never receives. Dropping the handle detaches the device, and
/// only removes the registration if it still belongs to this device.
pub struct DeviceHandle<D: Device + 'static> {
    device: Rc<RefCell<D>>,
    key: RoutingKey,
    router: Rc<dyn Router>,
    attach_error: Option<BusError>,
}

impl<D: Device + 'static> DeviceHandle<D> {
    /// Take ownership of `device` and register it on its endpoint's bus.
    pub fn new(device: D) -> Self {
        let key = device.routing_key();
        let router = Rc::clone(device.endpoint().router());
        let device = Rc::new(RefCell::new(device));
        let handler: HandlerRef = device.clone();

        let attach_error = match router.attach(key, &handler) {
            Ok(()) => None,
            Err(err) => {
                debug!(%key, error = %err, "device created without registration");
                Some(err)
            }
        };

        Self {
            device,
            key,
            router,
            attach_error,
        }
    }

    /// True while this device is the live registration for its routing key.
    pub fn is_attached(&self) -> bool {
        self.router.is_registered(self.key, &self.handler())
    }

    /// Why the attach at creation failed, if it did.
    pub fn attach_error(&self) -> Option<&BusError> {
        self.attach_error.as_ref()
    }

    /// Retry registration, for example after another device left the bus.
    pub fn reattach(&mut self) -> crate::error::Result<()> {
        let result = self.router.attach(self.key, &self.handler());
        self.attach_error = result.clone().err();
        result
    }

    /// Remove the registration early. Dropping the handle does the same.
    pub fn detach(&self) -> bool {
        self.router.detach(self.key, &self.handler())
    }

    pub fn routing_key(&self) -> RoutingKey {
        self.key
    }

    /// Borrow the device.
    ///
    /// # Panics
    ///
    /// Panics if the device is currently mutably borrowed, which only happens
    /// from inside its own `on_receive`.
    pub fn borrow(&self) -> Ref<'_, D> {
        self.device.borrow()
    }

    /// Mutably borrow the device.
    ///
    /// # Panics
    ///
    /// Panics if the device is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, D> {
        self.device.borrow_mut()
    }

    fn handler(&self) -> HandlerRef {
        self.device.clone()
    }
}

impl<D: Device + 'static> Drop for DeviceHandle<D> {
    fn drop(&mut self) {
        if self.router.detach(self.key, &self.handler()) {
            debug!(key = %self.key, "device handle dropped, detached");
        }
    }
}

impl<D: Device + fmt::Debug + 'static> fmt::Debug for DeviceHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("key", &self.key)
            .field("device", &self.device)
            .finish()
    }
}
