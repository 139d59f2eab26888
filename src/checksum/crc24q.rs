use super::Checksum;

const POLYNOMIAL: u32 = 0x0186_4cfb;

const fn table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 16;
        let mut bit = 0;
        while bit < 8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= POLYNOMIAL;
            }
            bit += 1;
        }
        table[i] = crc & 0x00ff_ffff;
        i += 1;
    }
    table
}

static TABLE: [u32; 256] = table();

/// RTCM CRC-24Q (Qualcomm), non reflected, zero initial value.
/// Runs over preamble, length and payload.
pub struct Crc24q;

impl Crc24q {
    /// Feeds `data` into a running `crc`
    pub fn update(crc: u32, data: &[u8]) -> u32 {
        data.iter().fold(crc, |crc, byte| {
            let index = ((crc >> 16) as u8 ^ *byte) as usize;
            ((crc << 8) & 0x00ff_ffff) ^ TABLE[index]
        })
    }
}

impl Checksum for Crc24q {
    type Input = [u8];
    type Output = u32;

    fn compute(input: &[u8]) -> u32 {
        Self::update(0, input)
    }
}
