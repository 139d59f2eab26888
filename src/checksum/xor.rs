use super::Checksum;

/// NMEA-0183 checksum: XOR of every character between
/// the start marker and `*`, transmitted as 2 uppercase hex digits.
pub struct NmeaXor;

impl NmeaXor {
    /// Renders checksum as 2 uppercase hex digits
    pub fn render(checksum: u8) -> [u8; 2] {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        [DIGITS[(checksum >> 4) as usize], DIGITS[(checksum & 0x0f) as usize]]
    }

    /// Interprets one hex digit. Lowercase digits are tolerated.
    pub fn hex_digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'A'..=b'F' => Some(c - b'A' + 10),
            b'a'..=b'f' => Some(c - b'a' + 10),
            _ => None,
        }
    }
}

impl Checksum for NmeaXor {
    type Input = [u8];
    type Output = u8;

    fn compute(input: &[u8]) -> u8 {
        input.iter().fold(0, |acc, byte| acc ^ byte)
    }
}
