use std::fmt;

use gn10can_frame::IdError;
use gn10can_transceiver::TransceiverError;

pub const SUCCESS: i32 = 0;
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub const FAILURE: i32 = 1;
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn id_error(context: &str, err: IdError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub fn transceiver_error(context: &str, err: TransceiverError) -> CliError {
    CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
}
