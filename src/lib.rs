//! Acquisition pipeline for Sensirion SPS30 / SCD30 air quality sensors.
//!
//! Each sensor gets a [`SensorDriver`] that owns its I2C bus, polls the
//! device, validates every CRC8-guarded word and publishes complete readings
//! into a [`ReadingCell`]. An [`Uplink`] reads those cells from another thread
//! of control and hands fixed-size little-endian payloads to a LoRaWAN
//! [`Transport`].
//!
//! ```ignore
//! static PM: ReadingCell = ReadingCell::new(PARTICULATE.port);
//! static STOP: StopSignal = StopSignal::new();
//!
//! let driver = SensorDriver::connect(i2c, delay, PARTICULATE, DriverConfig::default(), &PM, &STOP)?;
//! // on its own thread or task:
//! let i2c = run_until_stopped(driver, &STOP);
//! ```
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod acquisition;
mod cell;
mod config;
mod crc;
mod driver;
mod error;
mod packer;
mod profile;
mod types;
mod uplink;

#[cfg(test)]
mod testutil;

pub use acquisition::{run_until_stopped, StopSignal};
pub use cell::ReadingCell;
pub use config::{ConfigError, DriverConfig, UplinkConfig};
pub use crc::{check_word, crc8};
pub use driver::{decode, DriverState, DriverStats, SensorDriver};
pub use error::{Error, FaultKind};
pub use packer::{pack, unpack, TelemetryPayload};
pub use profile::{CommandSet, SensorKind, SensorProfile, CO2, PARTICULATE, SENSIRION_COMMANDS};
pub use types::{
    Co2Data, ParticulateData, RawFrame, Reading, FRAME_LEN, MAX_PAYLOAD_LEN, MAX_WORDS, WORD_LEN,
};
pub use uplink::{Transport, Uplink, UplinkError, UplinkStats};
