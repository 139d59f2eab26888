//! RTCM v2 framing: 30 bit words carried by the 6 LSB of each byte,
//! least significant bit first.
use log::{debug, trace};

use crate::{
    checksum::Hamming,
    error::Error,
    framing::{Arena, Frame, Framer},
    message::{MessageId, Protocol},
};

/// First 8 bits of every frame
pub const PREAMBLE: u8 = 0x66;

/// Header length, in data bytes (2 words)
pub const HEADER_LEN: usize = 6;

const D30_STAR: u32 = 0x4000_0000;

enum Step {
    Pending,
    Complete,
    Failed(Error),
}

/// RTCM v2 [Framer]. Words are parity checked as they arrive,
/// the [Frame] exposes the 3 data bytes of each word (parity stripped).
#[derive(Debug, Clone)]
pub struct Rtcm2Framer {
    /// Bit register: two previous parity bits followed by the current 30 bit word
    word: u32,
    /// Bits received in the current word
    bits: usize,
    synced: bool,
    /// Data bytes expected for the pending frame, once known
    expected: usize,
    arena: Arena,
}

impl Rtcm2Framer {
    pub fn new(capacity: usize) -> Self {
        Self {
            word: 0,
            bits: 0,
            synced: false,
            expected: 0,
            arena: Arena::new(capacity),
        }
    }

    /// Preamble search, bit by bit
    fn search(&mut self) {
        let mut preamble = (self.word >> 22) as u8;
        if self.word & D30_STAR != 0 {
            preamble ^= 0xff;
        }
        if preamble != PREAMBLE {
            return;
        }
        let Some(data) = Hamming::decode_word(self.word) else {
            return;
        };
        trace!("rtcm2 preamble");
        self.arena.clear();
        for byte in data {
            let _ = self.arena.push(byte);
        }
        self.synced = true;
        self.bits = 0;
        self.expected = 0;
    }

    fn step(&mut self) -> Step {
        if !self.synced {
            self.search();
            return Step::Pending;
        }

        self.bits += 1;
        if self.bits < 30 {
            return Step::Pending;
        }
        self.bits = 0;

        let Some(data) = Hamming::decode_word(self.word) else {
            debug!("rtcm2 parity error");
            self.synced = false;
            return Step::Failed(Error::Parity);
        };

        for byte in data {
            if let Err(e) = self.arena.push(byte) {
                self.synced = false;
                return Step::Failed(e);
            }
        }

        if self.arena.len() == HEADER_LEN {
            let words = (self.arena.as_slice()[5] >> 3) as usize;
            self.expected = HEADER_LEN + 3 * words;
            if self.expected > self.arena.capacity() {
                debug!("rtcm2 frame too large: {} words", words);
                self.synced = false;
                return Step::Failed(Error::FrameSize {
                    length: self.expected,
                    capacity: self.arena.capacity(),
                });
            }
        }

        if self.arena.len() >= HEADER_LEN && self.arena.len() == self.expected {
            self.synced = false;
            Step::Complete
        } else {
            Step::Pending
        }
    }
}

impl Framer for Rtcm2Framer {
    fn protocol(&self) -> Protocol {
        Protocol::RtcmV2
    }

    fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    fn push(&mut self, byte: u8) -> Option<Result<Frame<'_>, Error>> {
        // 6 of 8 bytes: only `01xxxxxx` bytes carry data
        if byte & 0xc0 != 0x40 {
            return None;
        }

        let mut outcome = None;

        for i in 0..6 {
            self.word = (self.word << 1) | ((byte >> i) & 0x01) as u32;

            // a completed frame must survive until this byte is fully shifted in
            if outcome.is_some() {
                continue;
            }

            match self.step() {
                Step::Pending => {},
                Step::Complete => outcome = Some(Ok(())),
                Step::Failed(e) => outcome = Some(Err(e)),
            }
        }

        match outcome? {
            Ok(()) => {
                let bytes = self.arena.as_slice();
                let id = MessageId::Numeric((bytes[1] >> 2) as u32);
                Some(Ok(Frame::new(Protocol::RtcmV2, id, bytes, 0..bytes.len())))
            },
            Err(e) => Some(Err(e)),
        }
    }

    fn reset(&mut self) {
        self.word = 0;
        self.bits = 0;
        self.synced = false;
        self.expected = 0;
        self.arena.clear();
    }
}

/// Serializes data bytes (a multiple of 3) into 6 of 8 transmitted bytes.
pub(crate) fn to_transmitted(data: &[u8]) -> Vec<u8> {
    let mut previous = 0u32;
    let mut out = Vec::with_capacity(data.len() / 3 * 5);

    for chunk in data.chunks_exact(3) {
        let word = Hamming::encode_word(previous, [chunk[0], chunk[1], chunk[2]]);
        // 5 bytes of 6 bits, MSB of the word first, each byte LSB first
        for k in 0..5 {
            let six = (word >> (24 - 6 * k)) & 0x3f;
            let mut byte = 0x40u8;
            for bit in 0..6 {
                if six & (1 << (5 - bit)) != 0 {
                    byte |= 1 << bit;
                }
            }
            out.push(byte);
        }
        previous = word;
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn header(message_type: u8, words: u8) -> Vec<u8> {
        // preamble, type(6) station(10), zcount(13) seq(3) length(5) health(3)
        vec![
            PREAMBLE,
            message_type << 2,
            0x01,
            0x00,
            0x00,
            words << 3,
        ]
    }

    #[test]
    fn six_of_eight_stream() {
        let mut data = header(16, 1);
        data.extend_from_slice(b"ABC");

        // noise, leaving D29* D30* cleared
        let mut stream = vec![0x00, 0xff, 0x4f];
        stream.extend(to_transmitted(&data));

        let mut framer = Rtcm2Framer::new(128);
        let mut frames = Vec::new();
        for byte in stream {
            if let Some(result) = framer.push(byte) {
                let frame = result.unwrap();
                frames.push((frame.id.clone(), frame.bytes().to_vec()));
            }
        }
        assert_eq!(frames, vec![(MessageId::Numeric(16), data)]);
    }

    #[test]
    fn parity_error() {
        let mut data = header(16, 1);
        data.extend_from_slice(b"ABC");
        let mut stream = to_transmitted(&data);
        // flip one data bit of the third word
        stream[11] ^= 0x04;

        let mut framer = Rtcm2Framer::new(128);
        let errors = stream
            .iter()
            .filter_map(|byte| framer.push(*byte).map(|result| result.map(|_| ())))
            .collect::<Vec<_>>();
        assert_eq!(errors, vec![Err(Error::Parity)]);
    }

    #[test]
    fn declared_length_exceeds_capacity() {
        let data = header(16, 31);
        let stream = to_transmitted(&data);
        let mut framer = Rtcm2Framer::new(32);
        let errors = stream
            .iter()
            .filter_map(|byte| framer.push(*byte).map(|result| result.map(|_| ())))
            .collect::<Vec<_>>();
        assert_eq!(
            errors,
            vec![Err(Error::FrameSize {
                length: 6 + 93,
                capacity: 32
            })]
        );
    }
}
