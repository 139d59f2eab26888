//! `$content*hh\r\n` sentence framing
use log::{debug, trace};

use crate::{
    checksum::{Checksum, NmeaXor},
    error::Error,
    framing::{Arena, Frame, Framer},
    message::{MessageId, Protocol},
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Sync,
    Content,
    /// Checksum digits, `received` so far
    Checksum { digits: usize, received: u8 },
    CarriageReturn { received: u8 },
    LineFeed { received: u8 },
}

/// NMEA-0183 sentence [Framer]. Both `$` and `!` (encapsulation) sentences
/// are accepted; a start delimiter always opens a new sentence.
#[derive(Debug, Clone)]
pub struct NmeaFramer {
    state: State,
    arena: Arena,
    /// Position of the `*` delimiter
    star: usize,
}

fn is_start(byte: u8) -> bool {
    byte == b'$' || byte == b'!'
}

impl NmeaFramer {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: State::Sync,
            arena: Arena::new(capacity),
            star: 0,
        }
    }

    fn start(&mut self, byte: u8) {
        self.arena.clear();
        let _ = self.arena.push(byte);
        self.state = State::Content;
    }

    fn fail(&mut self, byte: u8, error: Error) -> Option<Result<Frame<'_>, Error>> {
        debug!("nmea: {}", error);
        if is_start(byte) {
            self.start(byte);
        } else {
            self.reset();
        }
        Some(Err(error))
    }

    fn complete(&mut self, received: u8) -> Result<Frame<'_>, Error> {
        self.state = State::Sync;

        let bytes = self.arena.as_slice();
        let content = &bytes[1..self.star];

        let computed = NmeaXor::compute(content);
        if computed != received {
            debug!(
                "nmea checksum error: computed={:02X} received={:02X}",
                computed, received
            );
            return Err(Error::Checksum {
                computed: computed as u32,
                received: received as u32,
            });
        }

        let address_len = content
            .iter()
            .position(|b| *b == b',')
            .unwrap_or(content.len());

        // content is printable ASCII
        let address = String::from_utf8_lossy(&content[..address_len]).to_string();

        Ok(Frame::new(
            Protocol::Nmea,
            MessageId::Text(address),
            bytes,
            1..self.star,
        ))
    }
}

impl Framer for NmeaFramer {
    fn protocol(&self) -> Protocol {
        Protocol::Nmea
    }

    fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    fn push(&mut self, byte: u8) -> Option<Result<Frame<'_>, Error>> {
        match self.state {
            State::Sync => {
                if is_start(byte) {
                    self.start(byte);
                }
                None
            },
            State::Content => {
                if is_start(byte) {
                    trace!("nmea resync");
                    self.start(byte);
                    return None;
                }
                if byte == b'\r' || byte == b'\n' {
                    return self.fail(byte, Error::Malformed("missing checksum"));
                }
                if !(0x20..=0x7e).contains(&byte) {
                    return self.fail(byte, Error::Malformed("non printable character"));
                }
                if byte == b'*' {
                    self.star = self.arena.len();
                    self.state = State::Checksum {
                        digits: 0,
                        received: 0,
                    };
                }
                if let Err(e) = self.arena.push(byte) {
                    self.reset();
                    return Some(Err(e));
                }
                None
            },
            State::Checksum { digits, received } => {
                if is_start(byte) {
                    trace!("nmea resync");
                    self.start(byte);
                    return None;
                }
                let Some(nibble) = NmeaXor::hex_digit(byte) else {
                    return self.fail(byte, Error::Malformed("invalid checksum digit"));
                };
                if let Err(e) = self.arena.push(byte) {
                    self.reset();
                    return Some(Err(e));
                }
                let received = (received << 4) | nibble;
                self.state = if digits == 1 {
                    State::CarriageReturn { received }
                } else {
                    State::Checksum {
                        digits: digits + 1,
                        received,
                    }
                };
                None
            },
            State::CarriageReturn { received } => {
                if byte != b'\r' {
                    return self.fail(byte, Error::Malformed("missing terminator"));
                }
                self.state = State::LineFeed { received };
                None
            },
            State::LineFeed { received } => {
                if byte != b'\n' {
                    return self.fail(byte, Error::Malformed("missing terminator"));
                }
                Some(self.complete(received))
            },
        }
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.state = State::Sync;
    }
}
