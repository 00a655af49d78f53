//! Timing parameters for the acquisition and uplink loops.

/// Invalid timing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be greater than 0")]
    Zero(&'static str),
    #[error("profile {0} does not fit in one frame")]
    InvalidProfile(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Pause after each published reading.
    pub sampling_interval_ms: u32,
    /// Spacing between data-ready polls.
    pub ready_poll_ms: u32,
    /// Pause after a reset before measuring again.
    pub fault_cooldown_ms: u32,
    /// Pause between bus scans while the sensor is absent.
    pub probe_backoff_ms: u32,
    /// Consecutive corrupted data-ready responses tolerated before faulting.
    pub max_ready_crc_failures: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            sampling_interval_ms: 10_000,
            ready_poll_ms: 100,
            fault_cooldown_ms: 3_000,
            probe_backoff_ms: 5_000,
            max_ready_crc_failures: 10,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_interval_ms == 0 {
            return Err(ConfigError::Zero("sampling_interval_ms"));
        }
        if self.ready_poll_ms == 0 {
            return Err(ConfigError::Zero("ready_poll_ms"));
        }
        if self.probe_backoff_ms == 0 {
            return Err(ConfigError::Zero("probe_backoff_ms"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UplinkConfig {
    /// Wait after each send so the radio can finish its duty cycle.
    pub settle_ms: u32,
    /// Wait between transmission rounds.
    pub cycle_ms: u32,
}

impl Default for UplinkConfig {
    fn default() -> Self {
        UplinkConfig {
            settle_ms: 5_000,
            cycle_ms: 60_000,
        }
    }
}

impl UplinkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_ms == 0 {
            return Err(ConfigError::Zero("cycle_ms"));
        }
        Ok(())
    }
}
