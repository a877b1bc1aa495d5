use gn10can_frame::RoutingKey;

/// Errors that can occur while registering devices on a bus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// The registry already holds the maximum number of devices.
    #[error("device registry full (capacity {capacity})")]
    RegistryFull { capacity: usize },

    /// Another live device is already registered under this routing key.
    #[error("routing key {0} already registered")]
    DuplicateRoutingKey(RoutingKey),
}

pub type Result<T> = std::result::Result<T, BusError>;
