/// Errors from identifier decoding and name parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The 4-bit device type field has no known device type.
    #[error("unknown device type value {0}")]
    UnknownDeviceType(u8),

    /// A device type name did not match any known type.
    #[error("unknown device type name {0:?}")]
    UnknownDeviceName(String),
}

/// Errors from packing values into, or reading them out of, the data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The value would not fit inside the buffer.
    #[error("{size}-byte value at offset {offset} exceeds {max}-byte buffer")]
    OutOfBounds {
        offset: usize,
        size: usize,
        max: usize,
    },

    /// The value lies past the frame's declared length.
    #[error("{size}-byte value at offset {offset} exceeds declared length {dlc}")]
    BeyondDlc { offset: usize, size: usize, dlc: u8 },
}

pub type Result<T> = std::result::Result<T, PayloadError>;
