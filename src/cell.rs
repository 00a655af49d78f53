use core::cell::RefCell;

use critical_section::Mutex;

use crate::packer::{pack, TelemetryPayload};
use crate::types::Reading;

/// Latest complete reading of one sensor.
///
/// Written only by that sensor's acquisition loop, read by anyone. The lock is
/// held for a clone or a replace, never across an I2C transaction.
pub struct ReadingCell {
    port: u8,
    inner: Mutex<RefCell<Option<Reading>>>,
}

impl ReadingCell {
    pub const fn new(port: u8) -> Self {
        ReadingCell {
            port,
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn port(&self) -> u8 {
        self.port
    }

    pub(crate) fn publish(&self, reading: Reading) {
        critical_section::with(|cs| {
            *self.inner.borrow_ref_mut(cs) = Some(reading);
        });
    }

    /// Copy of the latest reading; `None` before the first successful cycle.
    pub fn snapshot(&self) -> Option<Reading> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).clone())
    }

    /// Latest reading packed for this cell's port.
    pub fn get_reading(&self) -> Option<TelemetryPayload> {
        self.snapshot().map(|reading| pack(&reading, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_published() {
        let cell = ReadingCell::new(9);
        assert!(cell.get_reading().is_none());

        cell.publish(Reading::from_values(&[1.0, 2.0, 3.0]).unwrap());
        let payload = cell.get_reading().unwrap();
        assert_eq!(payload.port(), 9);
        assert_eq!(payload.as_bytes().len(), 12);
    }

    #[test]
    fn repeated_reads_are_identical() {
        let cell = ReadingCell::new(9);
        cell.publish(Reading::from_values(&[412.5, 23.25, 45.5]).unwrap());
        assert_eq!(cell.get_reading(), cell.get_reading());
    }

    #[test]
    fn publish_replaces_whole_reading() {
        let cell = ReadingCell::new(9);
        cell.publish(Reading::from_values(&[1.0, 2.0, 3.0]).unwrap());
        cell.publish(Reading::from_values(&[4.0, 5.0, 6.0]).unwrap());
        assert_eq!(cell.snapshot().unwrap().values(), &[4.0f32, 5.0, 6.0]);
    }
}
