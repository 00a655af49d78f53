//! Periodic transmission of the latest readings.
//!
//! The radio itself sits behind [`Transport`]; this module only decides what
//! is sent, on which port, and how long to wait in between.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

use crate::acquisition::StopSignal;
use crate::cell::ReadingCell;
use crate::config::{ConfigError, UplinkConfig};

/// Byte-oriented send primitive of the LoRaWAN stack.
pub trait Transport {
    type Error: Debug;

    /// Sends `payload` on logical `port`.
    fn send(&mut self, port: u8, payload: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UplinkError<E> {
    #[error("transport failed on port {port}: {error:?}")]
    Transport { port: u8, error: E },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UplinkStats {
    pub sent: u32,
    pub failed: u32,
    /// Channels that had no reading yet.
    pub skipped: u32,
}

pub struct Uplink<'a, T, D, const N: usize> {
    transport: T,
    delay: D,
    config: UplinkConfig,
    cells: [&'a ReadingCell; N],
    stats: UplinkStats,
}

impl<'a, T, D, const N: usize> Uplink<'a, T, D, N>
where
    T: Transport,
    D: DelayNs,
{
    pub fn new(
        transport: T,
        delay: D,
        config: UplinkConfig,
        cells: [&'a ReadingCell; N],
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Uplink {
            transport,
            delay,
            config,
            cells,
            stats: UplinkStats::default(),
        })
    }

    pub fn stats(&self) -> UplinkStats {
        self.stats
    }

    /// Sends the latest reading of `cell`.
    ///
    /// Returns `Ok(false)` if the sensor has not produced a reading yet.
    pub fn transmit(&mut self, cell: &ReadingCell) -> Result<bool, UplinkError<T::Error>> {
        let Some(payload) = cell.get_reading() else {
            return Ok(false);
        };
        self.transport
            .send(payload.port(), payload.as_bytes())
            .map_err(|error| UplinkError::Transport {
                port: payload.port(),
                error,
            })?;
        Ok(true)
    }

    /// Sends every channel once, waiting `settle_ms` after each send.
    ///
    /// Transport failures are logged and left for the next round.
    pub fn transmit_round(&mut self) {
        let cells = self.cells;
        for cell in cells {
            match self.transmit(cell) {
                Ok(false) => {
                    self.stats.skipped += 1;
                    debug!("uplink: no reading for port {} yet", cell.port());
                    continue;
                }
                Ok(true) => {
                    self.stats.sent += 1;
                    debug!("uplink: sent port {}", cell.port());
                }
                Err(UplinkError::Transport { port, .. }) => {
                    self.stats.failed += 1;
                    warn!("uplink: send on port {} failed", port);
                }
            }
            self.delay.delay_ms(self.config.settle_ms);
        }
    }

    /// Transmits a round every `cycle_ms` until `stop` is requested.
    pub fn run(&mut self, stop: &StopSignal) {
        while !stop.is_requested() {
            self.transmit_round();
            self.delay.delay_ms(self.config.cycle_ms);
        }
    }

    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}
