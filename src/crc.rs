use crate::error::Error;

/// Sensirion CRC-8: polynomial 0x31, init 0xFF, no reflection, no final XOR.
pub fn crc8(data: &[u8; 2]) -> u8 {
    let mut crc: u8 = 0xFF;
    for byte in data.iter().copied() {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 == 0 {
                crc <<= 1;
            } else {
                crc = (crc << 1) ^ 0x31u8;
            }
        }
    }
    crc
}

/// Validates one `[hi, lo, crc]` group and returns the big-endian data word.
///
/// Slices shorter than three bytes are reported as a malformed frame; extra
/// trailing bytes are ignored.
pub fn check_word<E>(group: &[u8]) -> Result<u16, Error<E>> {
    let [hi, lo, received, ..] = *group else {
        return Err(Error::MalformedFrame {
            expected: 3,
            actual: group.len(),
        });
    };
    let expected = crc8(&[hi, lo]);
    if expected != received {
        return Err(Error::Crc {
            expected,
            actual: received,
        });
    }
    Ok(u16::from_be_bytes([hi, lo]))
}
