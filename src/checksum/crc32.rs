use super::Checksum;

/// Reflected form of the 0x04C11DB7 polynomial
const POLYNOMIAL: u32 = 0xedb8_8320;

const fn table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static TABLE: [u32; 256] = table();

/// Bit reflected CRC-32 with zero initial value and no final inversion,
/// as used by the OEM binary receiver protocol (header + payload).
pub struct Crc32;

impl Checksum for Crc32 {
    type Input = [u8];
    type Output = u32;

    fn compute(input: &[u8]) -> u32 {
        input.iter().fold(0, |crc, byte| {
            TABLE[((crc ^ *byte as u32) & 0xff) as usize] ^ (crc >> 8)
        })
    }
}
