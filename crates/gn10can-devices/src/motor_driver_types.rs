use serde::{Deserialize, Serialize};

/// Size of the encoded [`MotorConfig`].
pub const MOTOR_CONFIG_SIZE: usize = 8;

/// Encoder fitted to the motor.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncoderType {
    #[default]
    None = 0,
    IncrementalSpeed = 1,
    Absolute = 2,
    IncrementalTotal = 3,
}

impl EncoderType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(EncoderType::None),
            1 => Some(EncoderType::IncrementalSpeed),
            2 => Some(EncoderType::Absolute),
            3 => Some(EncoderType::IncrementalTotal),
            _ => None,
        }
    }
}

/// Controller gain addressed by a Gain command.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainType {
    Kp = 0,
    Ki = 1,
    Kd = 2,
    Ff = 3,
}

impl GainType {
    /// Number of gain slots.
    pub const COUNT: usize = 4;

    pub const ALL: [GainType; Self::COUNT] =
        [GainType::Kp, GainType::Ki, GainType::Kd, GainType::Ff];

    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Stop flag and switch id for one direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LimitSwitch {
    /// Stop the motor when the switch triggers.
    pub stop: bool,
    /// Switch input, 0-7.
    pub switch_id: u8,
}

impl LimitSwitch {
    fn to_nibble(self) -> u8 {
        (u8::from(self.stop) << 3) | (self.switch_id & 0x07)
    }

    fn from_nibble(nibble: u8) -> Self {
        Self {
            stop: nibble & 0x08 != 0,
            switch_id: nibble & 0x07,
        }
    }
}

/// Motor driver start-up configuration, carried by the Init command.
///
/// Wire layout, one byte each:
///
/// ```text
/// 0 max duty ratio     (0-255 = 0-100%)
/// 1 max accel rate     (duty change per ms, 0-255)
/// 2 feedback cycle     (ms, 0 = feedback off)
/// 3 encoder type
/// 4 limit switches     [StopFwd:1|FwdId:3|StopRev:1|RevId:3]
/// 5 user option
/// 6-7 reserved (zero)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    pub max_duty_ratio: u8,
    pub max_accel_rate: u8,
    pub feedback_cycle_ms: u8,
    pub encoder_type: EncoderType,
    pub forward_limit: LimitSwitch,
    pub reverse_limit: LimitSwitch,
    pub user_option: u8,
}

impl MotorConfig {
    /// Set the duty limit from a ratio; values outside 0.0-1.0 saturate.
    pub fn with_max_duty_ratio(mut self, ratio: f32) -> Self {
        self.max_duty_ratio = ratio_to_u8(ratio);
        self
    }

    /// Set the acceleration limit from a ratio (0.0 slowest, 1.0 immediate).
    pub fn with_accel_ratio(mut self, ratio: f32) -> Self {
        self.max_accel_rate = ratio_to_u8(ratio);
        self
    }

    pub fn with_feedback_cycle_ms(mut self, ms: u8) -> Self {
        self.feedback_cycle_ms = ms;
        self
    }

    pub fn with_encoder_type(mut self, encoder_type: EncoderType) -> Self {
        self.encoder_type = encoder_type;
        self
    }

    /// Configure the forward limit switch. `switch_id` is masked to 3 bits.
    pub fn with_forward_limit(mut self, stop: bool, switch_id: u8) -> Self {
        self.forward_limit = LimitSwitch {
            stop,
            switch_id: switch_id & 0x07,
        };
        self
    }

    /// Configure the reverse limit switch. `switch_id` is masked to 3 bits.
    pub fn with_reverse_limit(mut self, stop: bool, switch_id: u8) -> Self {
        self.reverse_limit = LimitSwitch {
            stop,
            switch_id: switch_id & 0x07,
        };
        self
    }

    pub fn with_user_option(mut self, option: u8) -> Self {
        self.user_option = option;
        self
    }

    pub fn max_duty_ratio(&self) -> f32 {
        f32::from(self.max_duty_ratio) / 255.0
    }

    pub fn accel_ratio(&self) -> f32 {
        f32::from(self.max_accel_rate) / 255.0
    }

    /// Packed limit switch byte.
    pub fn limit_switch_config(&self) -> u8 {
        (self.forward_limit.to_nibble() << 4) | self.reverse_limit.to_nibble()
    }

    pub fn to_bytes(&self) -> [u8; MOTOR_CONFIG_SIZE] {
        [
            self.max_duty_ratio,
            self.max_accel_rate,
            self.feedback_cycle_ms,
            self.encoder_type as u8,
            self.limit_switch_config(),
            self.user_option,
            0,
            0,
        ]
    }

    /// Decode the wire layout. Returns `None` for an unknown encoder type.
    pub fn from_bytes(bytes: &[u8; MOTOR_CONFIG_SIZE]) -> Option<Self> {
        Some(Self {
            max_duty_ratio: bytes[0],
            max_accel_rate: bytes[1],
            feedback_cycle_ms: bytes[2],
            encoder_type: EncoderType::from_raw(bytes[3])?,
            forward_limit: LimitSwitch::from_nibble(bytes[4] >> 4),
            reverse_limit: LimitSwitch::from_nibble(bytes[4] & 0x0F),
            user_option: bytes[5],
        })
    }
}

fn ratio_to_u8(ratio: f32) -> u8 {
    if ratio.is_nan() || ratio <= 0.0 {
        0
    } else if ratio >= 1.0 {
        u8::MAX
    } else {
        (ratio * 255.0) as u8
    }
}
