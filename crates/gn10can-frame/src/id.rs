//! Identifier layout.
//!
//! Every standard (11-bit) identifier carries a device address and a command:
//!
//! ```text
//! bit 10    7 | bit 6    3 | bit 2    0
//! DeviceType  | DeviceId   | Command
//!   (4 bits)  |  (4 bits)  |  (3 bits)
//! ```
//!
//! The routing key is the identifier with the command bits cleared. All frames
//! that share a routing key belong to the same device.

use std::fmt;

use crate::error::IdError;

/// Width of the device type field.
pub const BIT_WIDTH_DEVICE_TYPE: u32 = 4;
/// Width of the device id field.
pub const BIT_WIDTH_DEVICE_ID: u32 = 4;
/// Width of the command field.
pub const BIT_WIDTH_COMMAND: u32 = 3;

/// Bits 0-2 of the identifier.
pub const COMMAND_MASK: u32 = 0x007;
/// Bits 3-10 of the identifier (device type + device id).
pub const ROUTING_MASK: u32 = 0x7F8;
/// All bits of a standard identifier.
pub const STANDARD_ID_MASK: u32 = 0x7FF;

const DEVICE_ID_SHIFT: u32 = BIT_WIDTH_COMMAND;
const DEVICE_TYPE_SHIFT: u32 = BIT_WIDTH_COMMAND + BIT_WIDTH_DEVICE_ID;
const DEVICE_TYPE_MASK: u8 = (1 << BIT_WIDTH_DEVICE_TYPE) - 1;
const DEVICE_ID_MASK: u8 = (1 << BIT_WIDTH_DEVICE_ID) - 1;
const COMMAND_VALUE_MASK: u8 = (1 << BIT_WIDTH_COMMAND) - 1;

/// Highest device id that fits the identifier layout.
pub const MAX_DEVICE_ID: u8 = DEVICE_ID_MASK;

/// Kind of module attached to the bus.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceType {
    EmergencyStop = 0,
    MotorDriver = 1,
    ServoDriver = 2,
    SolenoidDriver = 3,
    CommunicationModule = 4,
    SensorHub = 5,
    Led = 6,
}

impl DeviceType {
    /// Every known device type, in wire order.
    pub const ALL: [DeviceType; 7] = [
        DeviceType::EmergencyStop,
        DeviceType::MotorDriver,
        DeviceType::ServoDriver,
        DeviceType::SolenoidDriver,
        DeviceType::CommunicationModule,
        DeviceType::SensorHub,
        DeviceType::Led,
    ];

    /// Raw 4-bit value.
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            DeviceType::EmergencyStop => "emergency-stop",
            DeviceType::MotorDriver => "motor-driver",
            DeviceType::ServoDriver => "servo-driver",
            DeviceType::SolenoidDriver => "solenoid-driver",
            DeviceType::CommunicationModule => "communication-module",
            DeviceType::SensorHub => "sensor-hub",
            DeviceType::Led => "led",
        }
    }

    /// Name of `command` within this device type's command set, if known.
    pub fn command_name(self, command: u8) -> Option<&'static str> {
        match self {
            DeviceType::EmergencyStop => EmergencyStopCommand::from_raw(command).map(Command::name),
            DeviceType::MotorDriver => MotorDriverCommand::from_raw(command).map(Command::name),
            DeviceType::ServoDriver => ServoDriverCommand::from_raw(command).map(Command::name),
            DeviceType::SolenoidDriver => {
                SolenoidDriverCommand::from_raw(command).map(Command::name)
            }
            DeviceType::CommunicationModule => {
                CommunicationModuleCommand::from_raw(command).map(Command::name)
            }
            DeviceType::SensorHub => SensorHubCommand::from_raw(command).map(Command::name),
            DeviceType::Led => LedCommand::from_raw(command).map(Command::name),
        }
    }
}

impl TryFrom<u8> for DeviceType {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DeviceType::ALL
            .iter()
            .copied()
            .find(|ty| ty.raw() == value)
            .ok_or(IdError::UnknownDeviceType(value))
    }
}

impl std::str::FromStr for DeviceType {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase().replace('_', "-");
        DeviceType::ALL
            .iter()
            .copied()
            .find(|ty| ty.name() == lower)
            .ok_or_else(|| IdError::UnknownDeviceName(s.to_string()))
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command set scoped to one device type.
///
/// The 3-bit command value only has meaning together with the device type
/// that owns the set.
pub trait Command: Copy + fmt::Debug {
    /// Device type this command set belongs to.
    const DEVICE_TYPE: DeviceType;

    /// Raw 3-bit value.
    fn raw(self) -> u8;

    /// Checked conversion from a raw command value.
    fn from_raw(raw: u8) -> Option<Self>;

    /// Human-readable name.
    fn name(self) -> &'static str;
}

macro_rules! command_set {
    (
        $(#[$meta:meta])*
        $name:ident for $device:ident {
            $($variant:ident = $value:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value),+
        }

        impl Command for $name {
            const DEVICE_TYPE: DeviceType = DeviceType::$device;

            fn raw(self) -> u8 {
                self as u8
            }

            fn from_raw(raw: u8) -> Option<Self> {
                match raw {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

command_set! {
    /// Emergency stop switch commands.
    EmergencyStopCommand for EmergencyStop {
        Init = 0 => "init",
        Status = 1 => "status",
        EmergencyStop = 2 => "emergency-stop",
    }
}

command_set! {
    /// Motor driver commands.
    MotorDriverCommand for MotorDriver {
        Init = 0 => "init",
        Target = 1 => "target",
        Gain = 3 => "gain",
        Feedback = 4 => "feedback",
        HardwareStatus = 5 => "hardware-status",
    }
}

command_set! {
    /// Servo driver commands.
    ServoDriverCommand for ServoDriver {
        Init = 0 => "init",
        Target = 1 => "target",
        Frequency = 2 => "frequency",
    }
}

command_set! {
    /// Solenoid driver commands.
    SolenoidDriverCommand for SolenoidDriver {
        Init = 0 => "init",
        Target = 1 => "target",
    }
}

command_set! {
    /// Communication module commands.
    CommunicationModuleCommand for CommunicationModule {
        Init = 0 => "init",
        Heartbeat = 1 => "heartbeat",
        ControllerData = 2 => "controller-data",
    }
}

command_set! {
    /// Sensor hub commands.
    SensorHubCommand for SensorHub {
        Init = 0 => "init",
        ToF = 1 => "tof",
    }
}

command_set! {
    /// LED module commands.
    LedCommand for Led {
        Init = 0 => "init",
    }
}

/// Pack a raw (type, id, command) triple into an identifier.
///
/// Each field is masked to its bit width first, so out-of-range values wrap
/// instead of spilling into the neighbouring field.
pub fn pack_raw(device_type: u8, device_id: u8, command: u8) -> u32 {
    let ty = u32::from(device_type & DEVICE_TYPE_MASK);
    let id = u32::from(device_id & DEVICE_ID_MASK);
    let cmd = u32::from(command & COMMAND_VALUE_MASK);

    (ty << DEVICE_TYPE_SHIFT) | (id << DEVICE_ID_SHIFT) | cmd
}

/// Pack a device address and command into an identifier.
pub fn pack(device_type: DeviceType, device_id: u8, command: u8) -> u32 {
    pack_raw(device_type.raw(), device_id, command)
}

/// Pack a typed command for `device_id`.
pub fn pack_command<C: Command>(device_id: u8, command: C) -> u32 {
    pack(C::DEVICE_TYPE, device_id, command.raw())
}

/// Split an identifier into its fields.
///
/// Bits above the 11-bit standard range are ignored.
pub fn unpack(identifier: u32) -> IdFields {
    IdFields {
        raw_device_type: ((identifier >> DEVICE_TYPE_SHIFT) as u8) & DEVICE_TYPE_MASK,
        device_id: ((identifier >> DEVICE_ID_SHIFT) as u8) & DEVICE_ID_MASK,
        command: (identifier as u8) & COMMAND_VALUE_MASK,
    }
}

/// Routing key of an identifier: the identifier with the command bits cleared.
pub fn routing_key(identifier: u32) -> RoutingKey {
    RoutingKey(identifier & !COMMAND_MASK)
}

/// Fields decoded from an identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdFields {
    /// 4-bit device type as found on the wire.
    pub raw_device_type: u8,
    /// 4-bit device id.
    pub device_id: u8,
    /// 3-bit command value, scoped to the device type.
    pub command: u8,
}

impl IdFields {
    /// Decoded device type, or `None` when the 4-bit value has no known type.
    pub fn device_type(&self) -> Option<DeviceType> {
        DeviceType::try_from(self.raw_device_type).ok()
    }

    /// True if the command field equals `command`.
    pub fn is_command<C: Command>(&self, command: C) -> bool {
        self.command == command.raw()
    }

    /// Typed command, when the device type matches `C` and the value is known.
    pub fn command_as<C: Command>(&self) -> Option<C> {
        if self.raw_device_type != C::DEVICE_TYPE.raw() {
            return None;
        }
        C::from_raw(self.command)
    }

    /// Routing key for these fields.
    pub fn routing_key(&self) -> RoutingKey {
        routing_key(pack_raw(self.raw_device_type, self.device_id, self.command))
    }

    /// Re-pack into an identifier.
    pub fn pack(&self) -> u32 {
        pack_raw(self.raw_device_type, self.device_id, self.command)
    }
}

/// Device-identifying part of an identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutingKey(u32);

impl RoutingKey {
    /// Routing key for a device address.
    pub fn new(device_type: DeviceType, device_id: u8) -> Self {
        routing_key(pack(device_type, device_id, 0))
    }

    /// Routing key of an identifier.
    pub fn from_identifier(identifier: u32) -> Self {
        routing_key(identifier)
    }

    /// Raw key value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Identifier addressing `command` on this key.
    pub fn with_command(self, command: u8) -> u32 {
        self.0 | u32::from(command & COMMAND_VALUE_MASK)
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip_all_valid_triples() {
        for ty in DeviceType::ALL {
            for id in 0..=MAX_DEVICE_ID {
                for cmd in 0..8u8 {
                    let fields = unpack(pack(ty, id, cmd));
                    assert_eq!(fields.device_type(), Some(ty));
                    assert_eq!(fields.device_id, id);
                    assert_eq!(fields.command, cmd);
                }
            }
        }
    }

    #[test]
    fn routing_key_ignores_command_bits() {
        for ty in DeviceType::ALL {
            for id in 0..=MAX_DEVICE_ID {
                let base = pack(ty, id, 0);
                for cmd in 0..8u32 {
                    assert_eq!(routing_key(base), routing_key(base | cmd));
                }
            }
        }
    }

    #[test]
    fn motor_driver_one_layout() {
        let key = RoutingKey::new(DeviceType::MotorDriver, 1);
        assert_eq!(key.value(), 0x88);
        assert_eq!(pack_command(1, MotorDriverCommand::Target), 0x89);
        assert_eq!(key.with_command(MotorDriverCommand::Target.raw()), 0x89);
        assert_eq!(key.to_string(), "0x088");
    }

    #[test]
    fn device_types_do_not_share_keys() {
        assert_eq!(RoutingKey::new(DeviceType::MotorDriver, 0).value(), 0x80);
        assert_eq!(RoutingKey::new(DeviceType::ServoDriver, 0).value(), 0x100);
    }

    #[test]
    fn out_of_range_fields_are_masked() {
        // id 0x13 wraps to 0x3, command 0x9 wraps to 0x1, type bits untouched
        let id = pack(DeviceType::MotorDriver, 0x13, 0x9);
        assert_eq!(id, pack(DeviceType::MotorDriver, 0x3, 0x1));
        assert_eq!(pack_raw(0x1F, 0, 0), pack_raw(0xF, 0, 0));
        assert!(id <= STANDARD_ID_MASK);
    }

    #[test]
    fn unknown_device_type_is_a_decode_miss() {
        let id = pack_raw(0xE, 2, 1);
        let fields = unpack(id);
        assert_eq!(fields.raw_device_type, 0xE);
        assert_eq!(fields.device_type(), None);
        assert_eq!(fields.routing_key().value(), id & ROUTING_MASK);
        assert!(fields.command_as::<MotorDriverCommand>().is_none());
    }

    #[test]
    fn typed_command_lookup() {
        let fields = unpack(pack_command(4, MotorDriverCommand::Feedback));
        assert!(fields.is_command(MotorDriverCommand::Feedback));
        assert_eq!(
            fields.command_as::<MotorDriverCommand>(),
            Some(MotorDriverCommand::Feedback)
        );
        assert_eq!(fields.command_as::<ServoDriverCommand>(), None);
        assert_eq!(MotorDriverCommand::from_raw(2), None);
    }

    #[test]
    fn device_type_parsing() {
        assert_eq!(
            "motor-driver".parse::<DeviceType>().unwrap(),
            DeviceType::MotorDriver
        );
        assert_eq!(
            "SENSOR_HUB".parse::<DeviceType>().unwrap(),
            DeviceType::SensorHub
        );
        assert!(matches!(
            "toaster".parse::<DeviceType>(),
            Err(IdError::UnknownDeviceName(_))
        ));
        assert!(matches!(
            DeviceType::try_from(9),
            Err(IdError::UnknownDeviceType(9))
        ));
    }

    #[test]
    fn command_names_resolve_per_type() {
        assert_eq!(DeviceType::MotorDriver.command_name(5), Some("hardware-status"));
        assert_eq!(DeviceType::ServoDriver.command_name(5), None);
        assert_eq!(DeviceType::SensorHub.command_name(1), Some("tof"));
    }
}
