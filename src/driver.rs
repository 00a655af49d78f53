use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use sensirion_i2c::i2c::write_command_u16;

use crate::acquisition::StopSignal;
use crate::cell::ReadingCell;
use crate::config::{ConfigError, DriverConfig};
use crate::crc::{check_word, crc8};
use crate::error::Error;
use crate::packer::TelemetryPayload;
use crate::profile::{SensorKind, SensorProfile};
use crate::types::{Co2Data, ParticulateData, RawFrame, Reading, FRAME_LEN, MAX_WORDS, WORD_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Not yet found on the bus or not yet started.
    Idle,
    /// Started; the next cycle begins with a data-ready poll.
    Measuring,
    /// Inside a cycle.
    Polling,
    /// Reset and cooled down; measurement must be restarted.
    Faulted,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Readings published.
    pub cycles: u32,
    pub faults: u32,
    pub resets: u32,
}

/// Decodes the first `words` words of a read-measurement response.
///
/// Every byte pair is checked against its CRC8 before anything is returned,
/// so a corrupted frame never yields a partial reading.
pub fn decode<E>(frame: &[u8], words: usize) -> Result<Reading, Error<E>> {
    let needed = words * WORD_LEN;
    if words > MAX_WORDS || frame.len() < needed {
        return Err(Error::MalformedFrame {
            expected: needed,
            actual: frame.len(),
        });
    }

    let mut values = [0f32; MAX_WORDS];
    for (value, word) in values.iter_mut().zip(frame[..needed].chunks_exact(WORD_LEN)) {
        let [b0, b1] = check_word::<E>(&word[..3])?.to_be_bytes();
        let [b2, b3] = check_word::<E>(&word[3..])?.to_be_bytes();
        *value = f32::from_be_bytes([b0, b1, b2, b3]);
    }
    Reading::from_values(&values[..words]).ok_or(Error::MalformedFrame {
        expected: needed,
        actual: frame.len(),
    })
}

/// Polling driver for one Sensirion sensor.
///
/// Owns its bus handle exclusively and publishes every validated reading
/// into `cell`, which other threads of control read without touching the bus.
pub struct SensorDriver<'a, I2C, D> {
    i2c: I2C,
    delay: D,
    profile: SensorProfile,
    config: DriverConfig,
    cell: &'a ReadingCell,
    state: DriverState,
    stats: DriverStats,
}

impl<'a, I2C, D, E> SensorDriver<'a, I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Creates a driver without touching the bus.
    pub fn new(
        i2c: I2C,
        delay: D,
        profile: SensorProfile,
        config: DriverConfig,
        cell: &'a ReadingCell,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if !profile.is_valid() {
            return Err(ConfigError::InvalidProfile(profile.name));
        }
        Ok(SensorDriver {
            i2c,
            delay,
            profile,
            config,
            cell,
            state: DriverState::Idle,
            stats: DriverStats::default(),
        })
    }

    /// Creates a driver, waits for the sensor to appear on the bus and starts
    /// measuring.
    ///
    /// A sensor that never answers is retried until `stop` is requested, in
    /// which case the driver is returned still `Idle`. A failed start is
    /// recovered like any other fault.
    pub fn connect(
        i2c: I2C,
        delay: D,
        profile: SensorProfile,
        config: DriverConfig,
        cell: &'a ReadingCell,
        stop: &StopSignal,
    ) -> Result<Self, ConfigError> {
        let mut driver = Self::new(i2c, delay, profile, config, cell)?;
        if let Err(e) = driver.bring_up(stop) {
            if e.is_recoverable() {
                driver.recover(e);
            }
        }
        Ok(driver)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    /// Latest published reading, packed for this sensor's port.
    pub fn get_reading(&self) -> Option<TelemetryPayload> {
        self.cell.get_reading()
    }

    /// Scans for the sensor, backing off between attempts until it
    /// acknowledges its address.
    pub fn probe(&mut self, stop: &StopSignal) -> Result<(), Error<E>> {
        loop {
            if stop.is_requested() {
                return Err(Error::Stopped);
            }
            if self.i2c.write(self.profile.address, &[]).is_ok() {
                info!("{}: found at {:#x}", self.profile.name, self.profile.address);
                return Ok(());
            }
            warn!(
                "{}: not connected, retrying in {} ms",
                self.profile.name,
                self.config.probe_backoff_ms
            );
            self.delay.delay_ms(self.config.probe_backoff_ms);
        }
    }

    pub fn start_measurement(&mut self) -> Result<(), Error<E>> {
        let [c0, c1] = self.profile.commands.start_measurement.to_be_bytes();
        let [a0, a1] = self.profile.commands.start_argument.to_be_bytes();
        self.i2c
            .write(self.profile.address, &[c0, c1, a0, a1, crc8(&[a0, a1])])?;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), Error<E>> {
        write_command_u16(&mut self.i2c, self.profile.address, self.profile.commands.reset)?;
        Ok(())
    }

    /// Reads the data-ready flag. A corrupted response is an error.
    pub fn is_ready(&mut self) -> Result<bool, Error<E>> {
        write_command_u16(
            &mut self.i2c,
            self.profile.address,
            self.profile.commands.data_ready,
        )?;
        let mut buf = [0u8; 3];
        self.i2c.read(self.profile.address, &mut buf)?;
        Ok(check_word::<E>(&buf)? != 0)
    }

    pub fn read_frame(&mut self) -> Result<RawFrame, Error<E>> {
        write_command_u16(
            &mut self.i2c,
            self.profile.address,
            self.profile.commands.read_measurement,
        )?;
        let mut frame = [0u8; FRAME_LEN];
        self.i2c.read(self.profile.address, &mut frame)?;
        Ok(frame)
    }

    /// Polls until data is ready, then reads and decodes one frame.
    ///
    /// Corrupted data-ready responses count as "not ready" until more than
    /// `max_ready_crc_failures` arrive in a row.
    pub fn measure(&mut self, stop: &StopSignal) -> Result<Reading, Error<E>> {
        let mut crc_failures = 0;
        loop {
            if stop.is_requested() {
                return Err(Error::Stopped);
            }
            match self.is_ready() {
                Ok(true) => break,
                Ok(false) => crc_failures = 0,
                Err(e @ Error::Crc { .. }) => {
                    crc_failures += 1;
                    if crc_failures > self.config.max_ready_crc_failures {
                        return Err(e);
                    }
                    debug!("{}: corrupted data-ready response", self.profile.name);
                }
                Err(e) => return Err(e),
            }
            self.delay.delay_ms(self.config.ready_poll_ms);
        }

        let frame = self.read_frame()?;
        decode(&frame, self.profile.words)
    }

    /// One operating cycle: measure, publish, then wait out the sampling
    /// interval. The published reading is untouched unless the whole frame
    /// validated.
    pub fn cycle(&mut self, stop: &StopSignal) -> Result<(), Error<E>> {
        self.state = DriverState::Polling;
        let reading = self.measure(stop)?;
        self.log_reading(&reading);
        self.cell.publish(reading);
        self.stats.cycles += 1;
        self.state = DriverState::Measuring;
        self.delay.delay_ms(self.config.sampling_interval_ms);
        Ok(())
    }

    /// Runs the operating cycle until `stop` is requested.
    ///
    /// Faults never end the loop: each one resets the sensor, cools down and
    /// restarts measurement.
    pub fn run(&mut self, stop: &StopSignal) {
        while !stop.is_requested() {
            let step = match self.state {
                DriverState::Idle => self.bring_up(stop),
                DriverState::Faulted => self.restart(),
                DriverState::Measuring | DriverState::Polling => self.cycle(stop),
                DriverState::Stopped => break,
            };
            match step {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => self.recover(e),
                Err(_) => break,
            }
        }
    }

    /// Stops measuring and releases the bus.
    pub fn stop(mut self) -> I2C {
        let stop_measurement = self.profile.commands.stop_measurement;
        if write_command_u16(&mut self.i2c, self.profile.address, stop_measurement).is_err() {
            warn!("{}: stop command failed", self.profile.name);
        }
        self.state = DriverState::Stopped;
        info!("{}: stopped", self.profile.name);
        self.i2c
    }

    fn bring_up(&mut self, stop: &StopSignal) -> Result<(), Error<E>> {
        self.probe(stop)?;
        self.start_measurement()?;
        self.state = DriverState::Measuring;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), Error<E>> {
        self.start_measurement()?;
        self.state = DriverState::Measuring;
        Ok(())
    }

    fn recover(&mut self, error: Error<E>) {
        self.state = DriverState::Faulted;
        self.stats.faults += 1;
        warn!(
            "{}: {:?} fault, resetting sensor",
            self.profile.name,
            error.kind()
        );
        if self.reset().is_err() {
            warn!("{}: reset command failed", self.profile.name);
        }
        self.stats.resets += 1;
        self.delay.delay_ms(self.config.fault_cooldown_ms);
    }

    fn log_reading(&self, reading: &Reading) {
        match self.profile.kind {
            SensorKind::Co2 => {
                if let Some(data) = Co2Data::from_reading(reading) {
                    debug!(
                        "{}: co2 {} ppm, temperature {} C, humidity {} %",
                        self.profile.name,
                        data.co2,
                        data.temperature,
                        data.humidity
                    );
                }
            }
            SensorKind::Particulate => {
                if let Some(data) = ParticulateData::from_reading(reading) {
                    debug!(
                        "{}: pm2.5 {} ug/m3, pm10 {} ug/m3, typical size {} um",
                        self.profile.name,
                        data.mass_pm2_5,
                        data.mass_pm10_0,
                        data.typical_size
                    );
                }
            }
        }
    }
}
