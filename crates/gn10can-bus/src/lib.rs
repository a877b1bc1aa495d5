//! Routing-key dispatch for gn10can.
//!
//! A [`Bus`] pairs one transceiver with a bounded registry that maps routing
//! keys to devices. `poll` drains the transceiver and hands each frame to the
//! device registered under its routing key in a single lookup; frames nobody
//! claims are dropped.
//!
//! The registry holds non-owning references only. Devices keep themselves
//! registered through a [`DeviceHandle`], which detaches on drop.

pub mod bus;
pub mod config;
pub mod device;
pub mod error;
pub mod registry;
pub mod router;

pub use bus::{Bus, PollSummary};
pub use config::{BusConfig, DuplicatePolicy, DEFAULT_CAPACITY};
pub use device::{Device, DeviceHandle, Endpoint};
pub use error::{BusError, Result};
pub use registry::Registry;
pub use router::{FrameHandler, HandlerRef, Router, WeakHandlerRef};
