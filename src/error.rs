/// Errors raised by a single step of the acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// The I2C transaction itself failed.
    #[error("I2C bus error: {0:?}")]
    I2c(E),
    /// A received data word did not match its trailing CRC8 byte.
    #[error("CRC mismatch: expected {expected:#04x}, received {actual:#04x}")]
    Crc { expected: u8, actual: u8 },
    /// A response was shorter than the protocol requires.
    #[error("malformed frame: expected {expected} bytes, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },
    /// A stop was requested before the operation could complete.
    #[error("stop requested")]
    Stopped,
}

/// Coarse classification the acquisition cycle matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    Bus,
    Crc,
    Malformed,
    Stopped,
}

impl<E> Error<E> {
    pub fn kind(&self) -> FaultKind {
        match self {
            Error::I2c(_) => FaultKind::Bus,
            Error::Crc { .. } => FaultKind::Crc,
            Error::MalformedFrame { .. } => FaultKind::Malformed,
            Error::Stopped => FaultKind::Stopped,
        }
    }

    /// Whether the driver should reset the device and keep going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), FaultKind::Stopped)
    }
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}
