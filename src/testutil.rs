use embedded_hal::delay::DelayNs;

use crate::acquisition::StopSignal;
use crate::crc::crc8;
use crate::types::FRAME_LEN;

/// Records every delay in milliseconds and raises `stop` once `trigger_ms`
/// has been slept `trigger_count` times.
pub struct RecordingDelay<'a> {
    pub log: Vec<u32>,
    stop: Option<&'a StopSignal>,
    trigger_ms: u32,
    trigger_count: usize,
}

impl<'a> RecordingDelay<'a> {
    pub fn new() -> Self {
        RecordingDelay {
            log: Vec::new(),
            stop: None,
            trigger_ms: 0,
            trigger_count: 0,
        }
    }

    pub fn stopping(stop: &'a StopSignal, trigger_ms: u32, trigger_count: usize) -> Self {
        RecordingDelay {
            log: Vec::new(),
            stop: Some(stop),
            trigger_ms,
            trigger_count,
        }
    }

    pub fn count(&self, ms: u32) -> usize {
        self.log.iter().filter(|&&logged| logged == ms).count()
    }
}

impl DelayNs for RecordingDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(ms);
        if let Some(stop) = self.stop {
            if ms == self.trigger_ms && self.count(ms) >= self.trigger_count {
                stop.request();
            }
        }
    }
}

/// One `[hi, lo, crc]` group.
pub fn word(value: u16) -> [u8; 3] {
    let [hi, lo] = value.to_be_bytes();
    [hi, lo, crc8(&[hi, lo])]
}

/// A full read-measurement response carrying `values`, zero padded.
pub fn frame(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(FRAME_LEN);
    for value in values {
        let bits = value.to_bits();
        out.extend_from_slice(&word((bits >> 16) as u16));
        out.extend_from_slice(&word(bits as u16));
    }
    out.resize(FRAME_LEN, 0);
    out
}
