//! Cooperative cancellation for the acquisition and uplink loops.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::driver::SensorDriver;

/// Exit flag owned by the orchestration layer.
///
/// Loops observe it only between iterations, never in the middle of an I2C
/// transaction.
#[derive(Debug, Default)]
pub struct StopSignal(AtomicBool);

impl StopSignal {
    pub const fn new() -> Self {
        StopSignal(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Runs `driver` until `stop` is requested, then stops the sensor and
/// hands back the bus.
///
/// Meant to be the body of one thread or task per sensor.
pub fn run_until_stopped<I2C, D>(mut driver: SensorDriver<'_, I2C, D>, stop: &StopSignal) -> I2C
where
    I2C: I2c,
    D: DelayNs,
{
    driver.run(stop);
    driver.stop()
}
