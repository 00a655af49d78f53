//! Per-sensor protocol parameters.
//!
//! Both supported sensors speak the same command set; they differ in address,
//! word count and the uplink port their payload is sent on.

use crate::types::{FRAME_LEN, MAX_WORDS, WORD_LEN};

/// 16-bit register addresses (big-endian on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSet {
    pub start_measurement: u16,
    /// Argument written after `start_measurement`, followed by its CRC8.
    pub start_argument: u16,
    pub stop_measurement: u16,
    pub reset: u16,
    pub data_ready: u16,
    pub read_measurement: u16,
}

pub const SENSIRION_COMMANDS: CommandSet = CommandSet {
    start_measurement: 0x0010,
    start_argument: 0x0300,
    stop_measurement: 0x0104,
    reset: 0xD304,
    data_ready: 0x0202,
    read_measurement: 0x0300,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorProfile {
    /// Short label used in log lines.
    pub name: &'static str,
    /// Which measurement layout the decoded words follow.
    pub kind: SensorKind,
    /// 7-bit I2C address.
    pub address: u8,
    pub commands: CommandSet,
    /// Number of 6-byte words decoded from each frame.
    pub words: usize,
    /// Uplink port the packed reading is sent on.
    pub port: u8,
}

impl SensorProfile {
    /// Size of the packed telemetry payload.
    pub const fn payload_len(&self) -> usize {
        self.words * 4
    }

    /// A profile must fit its words into one frame.
    pub const fn is_valid(&self) -> bool {
        self.words > 0 && self.words <= MAX_WORDS && self.words * WORD_LEN <= FRAME_LEN
    }
}

/// Sensirion SPS30 particulate matter sensor.
pub const PARTICULATE: SensorProfile = SensorProfile {
    name: "sps30",
    kind: SensorKind::Particulate,
    address: 0x69,
    commands: SENSIRION_COMMANDS,
    words: 10,
    port: 8,
};

/// Sensirion SCD30 CO2, temperature and humidity sensor.
pub const CO2: SensorProfile = SensorProfile {
    name: "scd30",
    kind: SensorKind::Co2,
    address: 0x61,
    commands: SENSIRION_COMMANDS,
    words: 3,
    port: 9,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    Particulate,
    Co2,
}

impl SensorKind {
    pub const fn profile(self) -> SensorProfile {
        match self {
            SensorKind::Particulate => PARTICULATE,
            SensorKind::Co2 => CO2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sizes() {
        assert_eq!(SensorKind::Particulate.profile().payload_len(), 40);
        assert_eq!(SensorKind::Co2.profile().payload_len(), 12);
    }

    #[test]
    fn kind_selects_matching_profile() {
        for kind in [SensorKind::Particulate, SensorKind::Co2] {
            assert_eq!(kind.profile().kind, kind);
        }
    }

    #[test]
    fn ports() {
        assert_eq!(PARTICULATE.port, 8);
        assert_eq!(CO2.port, 9);
    }

    #[test]
    fn builtin_profiles_are_valid() {
        assert!(PARTICULATE.is_valid());
        assert!(CO2.is_valid());
        assert!(!SensorProfile { words: 11, ..CO2 }.is_valid());
        assert!(!SensorProfile { words: 0, ..CO2 }.is_valid());
    }
}
