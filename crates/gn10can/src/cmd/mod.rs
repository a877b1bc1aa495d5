use clap::{Args, Subcommand};

use gn10can_frame::{DeviceType, MAX_DEVICE_ID, MAX_DLC};

use crate::exit::{id_error, CliError, CliResult, DATA_INVALID, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod monitor;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an identifier from device type, id and command.
    Encode(EncodeArgs),
    /// Split an identifier into device type, id and command.
    Decode(DecodeArgs),
    /// Send a single frame on a SocketCAN interface.
    Send(SendArgs),
    /// Print decoded frames received on a SocketCAN interface.
    Monitor(MonitorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Device type name (e.g. motor-driver).
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub device_type: String,
    /// Device id, 0-15.
    #[arg(long, short = 'i', value_name = "ID")]
    pub id: u8,
    /// Command number or name (e.g. 1 or target).
    #[arg(long, short = 'c', value_name = "COMMAND")]
    pub command: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Identifier, hex (0x89) or decimal (137).
    pub identifier: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// SocketCAN interface (e.g. can0, vcan0).
    pub interface: String,
    /// Device type name.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub device_type: String,
    /// Device id, 0-15.
    #[arg(long, short = 'i', value_name = "ID")]
    pub id: u8,
    /// Command number or name.
    #[arg(long, short = 'c', value_name = "COMMAND")]
    pub command: String,
    /// Payload as hex, up to 8 bytes (e.g. 66e6f642).
    #[arg(long, short = 'd', value_name = "HEX")]
    pub data: Option<String>,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// SocketCAN interface (e.g. can0, vcan0).
    pub interface: String,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Only print frames for this device type.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub device_type: Option<String>,
    /// Only print frames for this device id.
    #[arg(long, short = 'i', value_name = "ID")]
    pub id: Option<u8>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_device_type(input: &str) -> CliResult<DeviceType> {
    if let Ok(raw) = input.parse::<u8>() {
        return DeviceType::try_from(raw).map_err(|err| id_error("invalid --type", err));
    }
    input
        .parse::<DeviceType>()
        .map_err(|err| id_error("invalid --type", err))
}

pub(crate) fn parse_device_id(id: u8) -> CliResult<u8> {
    if id > MAX_DEVICE_ID {
        return Err(CliError::new(
            USAGE,
            format!("device id {id} out of range 0-{MAX_DEVICE_ID}"),
        ));
    }
    Ok(id)
}

/// Accept a command number (0-7) or a command name known to `device_type`.
pub(crate) fn parse_command(device_type: DeviceType, input: &str) -> CliResult<u8> {
    if let Ok(raw) = input.parse::<u8>() {
        if raw > 7 {
            return Err(CliError::new(
                USAGE,
                format!("command {raw} out of range 0-7"),
            ));
        }
        return Ok(raw);
    }
    let wanted = input.to_ascii_lowercase().replace('_', "-");
    (0..=7u8)
        .find(|raw| device_type.command_name(*raw) == Some(wanted.as_str()))
        .ok_or_else(|| {
            CliError::new(
                USAGE,
                format!("unknown command {input:?} for {device_type}"),
            )
        })
}

pub(crate) fn parse_identifier(input: &str) -> CliResult<u32> {
    let trimmed = input.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("invalid identifier: {input}")))
}

pub(crate) fn parse_payload(input: Option<&str>) -> CliResult<Vec<u8>> {
    let Some(input) = input else {
        return Ok(Vec::new());
    };
    let hex: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if hex.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "payload hex must have an even number of digits",
        ));
    }
    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CliError::new(USAGE, format!("invalid payload hex: {input}")))?;
    if bytes.len() > MAX_DLC {
        return Err(CliError::new(
            DATA_INVALID,
            format!("payload is {} bytes, at most {MAX_DLC} fit", bytes.len()),
        ));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_by_name_or_number() {
        assert_eq!(
            parse_device_type("motor-driver").unwrap(),
            DeviceType::MotorDriver
        );
        assert_eq!(
            parse_device_type("SOLENOID_DRIVER").unwrap(),
            DeviceType::SolenoidDriver
        );
        assert_eq!(parse_device_type("2").unwrap(), DeviceType::ServoDriver);
        assert_eq!(parse_device_type("9").unwrap_err().code, USAGE);
        assert_eq!(parse_device_type("toaster").unwrap_err().code, USAGE);
    }

    #[test]
    fn command_by_name_or_number() {
        assert_eq!(parse_command(DeviceType::MotorDriver, "target").unwrap(), 1);
        assert_eq!(
            parse_command(DeviceType::MotorDriver, "hardware-status").unwrap(),
            5
        );
        assert_eq!(parse_command(DeviceType::Led, "6").unwrap(), 6);
        assert!(parse_command(DeviceType::Led, "8").is_err());
        assert!(parse_command(DeviceType::Led, "target").is_err());
    }

    #[test]
    fn identifier_hex_and_decimal() {
        assert_eq!(parse_identifier("0x89").unwrap(), 0x89);
        assert_eq!(parse_identifier("0X7ff").unwrap(), 0x7FF);
        assert_eq!(parse_identifier("137").unwrap(), 137);
        assert_eq!(parse_identifier("zz").unwrap_err().code, USAGE);
    }

    #[test]
    fn payload_hex() {
        assert_eq!(parse_payload(None).unwrap(), Vec::<u8>::new());
        assert_eq!(
            parse_payload(Some("66:e6:f6:42")).unwrap(),
            vec![0x66, 0xE6, 0xF6, 0x42]
        );
        assert_eq!(parse_payload(Some("abc")).unwrap_err().code, USAGE);
        assert_eq!(parse_payload(Some("xx")).unwrap_err().code, USAGE);
        assert_eq!(
            parse_payload(Some("000102030405060708")).unwrap_err().code,
            DATA_INVALID
        );
    }

    #[test]
    fn device_id_range() {
        assert_eq!(parse_device_id(15).unwrap(), 15);
        assert_eq!(parse_device_id(16).unwrap_err().code, USAGE);
    }
}
