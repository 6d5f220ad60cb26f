//! Fixed remote command templates
//!
//! Only typed, range-checked values are ever interpolated into command text.

use std::fmt;

use crate::error::{BridgeError, Result};

/// Diagnostic command whose output is returned verbatim
pub const SENSORS_COMMAND: &str = "sensors";

/// PWM control files, one per fan channel
pub const PWM_CHANNELS: [&str; 2] = [
    "/sys/class/hwmon/hwmon0/pwm1",
    "/sys/class/hwmon/hwmon0/pwm2",
];

/// Message returned to clients for out-of-range speeds
pub const SPEED_RANGE_MESSAGE: &str = "Speed must be between 0 and 255";

/// PWM duty value in `[0, 255]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FanSpeed(u8);

impl FanSpeed {
    pub const MIN: FanSpeed = FanSpeed(u8::MIN);
    pub const MAX: FanSpeed = FanSpeed(u8::MAX);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for FanSpeed {
    fn from(value: u8) -> Self {
        FanSpeed(value)
    }
}

impl TryFrom<i64> for FanSpeed {
    type Error = BridgeError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map(FanSpeed)
            .map_err(|_| BridgeError::validation(SPEED_RANGE_MESSAGE))
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reads the current duty of the first channel
pub fn read_fan_speed_command() -> String {
    format!("cat {}", PWM_CHANNELS[0])
}

/// Writes `speed` to every channel in one command
pub fn set_fan_speed_command(speed: FanSpeed) -> String {
    PWM_CHANNELS
        .iter()
        .map(|path| format!("echo {} > {}", speed, path))
        .collect::<Vec<_>>()
        .join(" && ")
}

/// Parse the output of [`read_fan_speed_command`]
pub fn parse_fan_speed(output: &str) -> Result<FanSpeed> {
    let trimmed = output.trim();
    trimmed
        .parse::<u8>()
        .map(FanSpeed)
        .map_err(|e| BridgeError::InvalidOutput(format!("pwm value {:?}: {}", trimmed, e)))
}
