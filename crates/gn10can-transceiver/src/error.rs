/// Errors that can occur while setting up a transceiver.
///
/// Once a transceiver is running, `send` and `receive` report failure through
/// their return values instead.
#[derive(Debug, thiserror::Error)]
pub enum TransceiverError {
    /// Failed to open the named CAN interface.
    #[error("failed to open CAN interface {interface}: {source}")]
    Open {
        interface: String,
        source: std::io::Error,
    },

    /// An I/O error occurred while configuring the interface.
    #[error("transceiver I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransceiverError>;
