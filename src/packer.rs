//! Little-endian float32 telemetry payloads.

use crate::types::{Reading, MAX_PAYLOAD_LEN, MAX_WORDS};

/// Packed reading ready for transmission on `port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryPayload {
    port: u8,
    len: usize,
    buf: [u8; MAX_PAYLOAD_LEN],
}

impl TelemetryPayload {
    pub fn port(&self) -> u8 {
        self.port
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Serializes each value as 4 little-endian bytes, in order, with no framing.
pub fn pack(reading: &Reading, port: u8) -> TelemetryPayload {
    let mut buf = [0u8; MAX_PAYLOAD_LEN];
    for (chunk, value) in buf.chunks_exact_mut(4).zip(reading.values()) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    TelemetryPayload {
        port,
        len: reading.len() * 4,
        buf,
    }
}

/// Inverse of [`pack`]; `None` if `bytes` is not a whole number of floats
/// or holds more than [`MAX_WORDS`] of them.
pub fn unpack(bytes: &[u8]) -> Option<Reading> {
    if bytes.len() % 4 != 0 || bytes.len() / 4 > MAX_WORDS {
        return None;
    }
    let mut values = [0f32; MAX_WORDS];
    for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Reading::from_values(&values[..bytes.len() / 4])
}
