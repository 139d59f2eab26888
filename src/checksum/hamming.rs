use super::Checksum;

/// Parity equations (ICD-GPS-200), applied to a word laid out as
/// `D29* D30* d1..d24 D25..D30` over bits 31..0.
const EQUATIONS: [u32; 6] = [
    0xbb1f_3480,
    0x5d8f_9a40,
    0xaec7_cd00,
    0x5763_e680,
    0x6bb1_f340,
    0x8b7a_89c0,
];

/// D30* of the previous word
const D30_STAR: u32 = 0x4000_0000;

/// 24 data bits
const DATA_MASK: u32 = 0x3fff_ffc0;

/// 6 bit Hamming parity of the RTCM v2 (GPS navigation message style) 30 bit words.
/// The input word carries the two last parity bits of the previous word in bits 31..30,
/// the 24 transmitted data bits in 29..6 and the 6 transmitted parity bits in 5..0.
/// Transmitted data bits are inverted whenever D30* is set.
pub struct Hamming;

impl Hamming {
    /// Parity of a word whose data bits are already restored (not inverted)
    fn parity(word: u32) -> u32 {
        EQUATIONS.iter().fold(0, |parity, equation| {
            (parity << 1) | (((word & equation) >> 6).count_ones() & 1)
        })
    }

    /// Restores data bits (undoes D30* inversion)
    fn restore(word: u32) -> u32 {
        if word & D30_STAR != 0 {
            word ^ DATA_MASK
        } else {
            word
        }
    }

    /// Verifies word parity and returns its 3 data bytes
    pub fn decode_word(word: u32) -> Option<[u8; 3]> {
        if !Self::verify(&word, (word & 0x3f) as u8) {
            return None;
        }
        let data = (Self::restore(word) >> 6) & 0x00ff_ffff;
        Some([(data >> 16) as u8, (data >> 8) as u8, data as u8])
    }

    /// Encodes 3 data bytes into a 30 bit transmitted word (bits 29..0),
    /// `previous` being the previously transmitted word (only its 2 LSB matter).
    pub fn encode_word(previous: u32, data: [u8; 3]) -> u32 {
        let data = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        let word = ((previous & 0x03) << 30) | (data << 6);
        let parity = Self::parity(word);
        let transmitted = if word & D30_STAR != 0 {
            word ^ DATA_MASK
        } else {
            word
        };
        (transmitted & DATA_MASK) | parity
    }
}

impl Checksum for Hamming {
    type Input = u32;
    type Output = u8;

    fn compute(word: &u32) -> u8 {
        Self::parity(Self::restore(*word)) as u8
    }
}
