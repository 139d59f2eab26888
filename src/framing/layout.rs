//! Declarative frame layouts, shared by every length prefixed protocol.
use std::collections::VecDeque;

use log::{debug, trace};

use crate::{
    checksum::ChecksumKind,
    error::Error,
    framing::{Arena, Frame, Framer},
    message::{MessageId, Protocol},
};

/// Frame synchronization pattern
#[derive(Debug, Clone, PartialEq)]
pub enum SyncPattern {
    /// Exact byte sequence (`D3`, `B5 62`, `AA 44 12`..)
    Bytes(&'static [u8]),
    /// Any single byte of this set: ASTERIX blocks start with their category.
    AnyOf(Vec<u8>),
}

impl SyncPattern {
    fn first(&self, byte: u8) -> bool {
        match self {
            Self::Bytes(pattern) => pattern.first() == Some(&byte),
            Self::AnyOf(set) => set.contains(&byte),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Bytes(pattern) => pattern.len(),
            Self::AnyOf(_) => 1,
        }
    }
}

/// Header size definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderLength {
    /// Fixed header size in bytes (sync included)
    Fixed(usize),
    /// Header size is carried by the byte at `offset` (sync included),
    /// and may not be smaller than `min`.
    Field { offset: usize, min: usize },
}

/// What the length field accounts for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthCounts {
    /// Payload bytes only
    Payload,
    /// Whole frame, header included (ASTERIX)
    Total,
}

/// Length field definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthField {
    /// Byte offset from the start of the frame
    pub offset: usize,
    /// Field width in bytes (1 or 2)
    pub width: usize,
    pub big_endian: bool,
    /// Meaningful bits. Other bits are reserved: carried as data and
    /// only verified by the checksum.
    pub mask: u16,
    pub counts: LengthCounts,
}

impl LengthField {
    fn read(&self, frame: &[u8]) -> usize {
        let raw = &frame[self.offset..self.offset + self.width];
        let value = match (self.width, self.big_endian) {
            (1, _) => raw[0] as u16,
            (_, true) => u16::from_be_bytes([raw[0], raw[1]]),
            (_, false) => u16::from_le_bytes([raw[0], raw[1]]),
        };
        (value & self.mask) as usize
    }
}

/// Everything a [TableFramer] needs to know about a protocol.
#[derive(Debug, Clone)]
pub struct Layout {
    pub protocol: Protocol,
    pub sync: SyncPattern,
    pub header: HeaderLength,
    pub length: LengthField,
    pub checksum: ChecksumKind,
    /// First byte covered by the checksum
    pub checksum_from: usize,
    /// Message identification, from the complete frame and its header length.
    pub message_id: fn(&[u8], usize) -> MessageId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// Searching the sync pattern, `matched` bytes so far
    Sync { matched: usize },
    /// Gathering the header
    Header,
    /// Gathering payload and checksum, up to `total` bytes
    Body { header: usize, total: usize },
}

/// Outcome of a single byte
#[derive(Debug)]
enum Step {
    Pending,
    Complete { header: usize, total: usize },
    Dropped(Error),
}

/// [Framer] driven by a [Layout].
///
/// When a pending frame is dropped (size or checksum error), its bytes,
/// first one excluded, are scanned again: a frame that started inside the
/// dropped one is still recognized. Replayed bytes are processed ahead of
/// the following pushes.
#[derive(Debug, Clone)]
pub struct TableFramer {
    layout: Layout,
    state: State,
    arena: Arena,
    replay: VecDeque<u8>,
}

impl TableFramer {
    pub fn new(layout: Layout, capacity: usize) -> Self {
        Self {
            layout,
            state: State::Sync { matched: 0 },
            arena: Arena::new(capacity),
            replay: VecDeque::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn header_len(&self) -> Option<usize> {
        match self.layout.header {
            HeaderLength::Fixed(len) => Some(len),
            HeaderLength::Field { offset, .. } => {
                self.arena.as_slice().get(offset).map(|len| *len as usize)
            },
        }
    }

    /// Starts a new frame if `byte` opens one, otherwise goes back to sync search.
    fn restart(&mut self, byte: u8) {
        self.arena.clear();
        self.state = State::Sync { matched: 0 };
        if self.layout.sync.first(byte) {
            trace!("{} resync", self.layout.protocol);
            self.sync(byte);
        }
    }

    fn sync(&mut self, byte: u8) {
        let State::Sync { matched } = self.state else {
            return;
        };

        let accepted = match &self.layout.sync {
            SyncPattern::Bytes(pattern) => pattern.get(matched) == Some(&byte),
            SyncPattern::AnyOf(set) => set.contains(&byte),
        };

        if !accepted {
            if matched > 0 {
                self.restart(byte);
            }
            return;
        }

        if matched == 0 {
            self.arena.clear();
        }

        // sync patterns are always smaller than the arena
        let _ = self.arena.push(byte);

        if matched + 1 == self.layout.sync.len() {
            self.state = State::Header;
        } else {
            self.state = State::Sync {
                matched: matched + 1,
            };
        }
    }

    /// Drops the pending frame and queues its bytes, first one excluded,
    /// for another sync search.
    fn rescan(&mut self) {
        let dropped = self.arena.as_slice().get(1..).unwrap_or_default();
        for byte in dropped.iter().rev() {
            self.replay.push_front(*byte);
        }
        self.arena.clear();
        self.state = State::Sync { matched: 0 };
    }

    fn header(&mut self, byte: u8) -> Step {
        let position = self.arena.len();

        if let Err(e) = self.arena.push(byte) {
            return Step::Dropped(e);
        }

        if let HeaderLength::Field { offset, min } = self.layout.header {
            if position == offset {
                let len = byte as usize;
                if len < min {
                    debug!("{} invalid header length {}", self.layout.protocol, len);
                    return Step::Dropped(Error::InvalidLength(len));
                }
                if len > self.arena.capacity() {
                    return Step::Dropped(Error::FrameSize {
                        length: len,
                        capacity: self.arena.capacity(),
                    });
                }
            }
        }

        let Some(header) = self.header_len() else {
            return Step::Pending;
        };

        let length_end = self.layout.length.offset + self.layout.length.width;

        if self.arena.len() < header.max(length_end) {
            return Step::Pending;
        }

        let declared = self.layout.length.read(self.arena.as_slice());

        let payload = match self.layout.length.counts {
            LengthCounts::Payload => declared,
            LengthCounts::Total => {
                if declared < header {
                    debug!("{} invalid length {}", self.layout.protocol, declared);
                    return Step::Dropped(Error::InvalidLength(declared));
                }
                declared - header
            },
        };

        let total = header + payload + self.layout.checksum.size();

        if total > self.arena.capacity() {
            debug!(
                "{} frame too large: {} > {}",
                self.layout.protocol,
                total,
                self.arena.capacity()
            );
            return Step::Dropped(Error::FrameSize {
                length: total,
                capacity: self.arena.capacity(),
            });
        }

        self.state = State::Body { header, total };

        if self.arena.len() == total {
            Step::Complete { header, total }
        } else {
            Step::Pending
        }
    }

    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            State::Sync { .. } => {
                self.sync(byte);
                Step::Pending
            },
            State::Header => self.header(byte),
            State::Body { header, total } => {
                if let Err(e) = self.arena.push(byte) {
                    return Step::Dropped(e);
                }
                if self.arena.len() == total {
                    Step::Complete { header, total }
                } else {
                    Step::Pending
                }
            },
        }
    }

    /// Checksum verification of a complete frame, returns its [MessageId].
    fn verify(&self, header: usize, total: usize) -> Result<MessageId, Error> {
        let bytes = self.arena.as_slice();
        let size = self.layout.checksum.size();

        if size > 0 {
            let span = &bytes[self.layout.checksum_from..total - size];
            let computed = self.layout.checksum.compute(span);
            let received = self.layout.checksum.received(&bytes[total - size..total]);
            if computed != received {
                debug!(
                    "{} checksum error: computed={:06x} received={:06x}",
                    self.layout.protocol, computed, received
                );
                return Err(Error::Checksum { computed, received });
            }
        }

        Ok((self.layout.message_id)(bytes, header))
    }
}

impl Framer for TableFramer {
    fn protocol(&self) -> Protocol {
        self.layout.protocol
    }

    fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    fn push(&mut self, byte: u8) -> Option<Result<Frame<'_>, Error>> {
        self.replay.push_back(byte);

        while let Some(byte) = self.replay.pop_front() {
            match self.step(byte) {
                Step::Pending => {},
                Step::Complete { header, total } => {
                    self.state = State::Sync { matched: 0 };
                    return match self.verify(header, total) {
                        Ok(id) => Some(Ok(Frame::new(
                            self.layout.protocol,
                            id,
                            self.arena.as_slice(),
                            header..total - self.layout.checksum.size(),
                        ))),
                        Err(e) => {
                            self.rescan();
                            Some(Err(e))
                        },
                    };
                },
                Step::Dropped(e) => {
                    self.rescan();
                    return Some(Err(e));
                },
            }
        }

        None
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.replay.clear();
        self.state = State::Sync { matched: 0 };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_bytes_sync() -> Layout {
        Layout {
            protocol: Protocol::Ubx,
            sync: SyncPattern::Bytes(&[0xB5, 0x62]),
            header: HeaderLength::Fixed(6),
            length: LengthField {
                offset: 4,
                width: 2,
                big_endian: false,
                mask: 0xffff,
                counts: LengthCounts::Payload,
            },
            checksum: ChecksumKind::Fletcher8,
            checksum_from: 2,
            message_id: |frame, _| MessageId::Numeric(frame[2] as u32),
        }
    }

    fn feed(framer: &mut TableFramer, bytes: &[u8]) -> Vec<Result<Vec<u8>, Error>> {
        let mut out = Vec::new();
        for byte in bytes {
            if let Some(result) = framer.push(*byte) {
                out.push(result.map(|frame| frame.payload().to_vec()));
            }
        }
        out
    }

    #[test]
    fn partial_sync_restarts_on_sync_byte() {
        let mut framer = TableFramer::new(two_bytes_sync(), 64);
        let out = feed(
            &mut framer,
            &[
                0xB5, 0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x01, 0x0F, 0x38,
            ],
        );
        assert_eq!(out, vec![Ok(vec![0x06, 0x01])]);
    }

    const ACK: [u8; 10] = [0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x01, 0x0F, 0x38];

    #[test]
    fn truncated_header_then_valid_frame() {
        let mut framer = TableFramer::new(two_bytes_sync(), 64);
        let mut stream = vec![0xB5, 0x62, 0x06, 0x01];
        stream.extend_from_slice(&ACK);
        let out = feed(&mut framer, &stream);
        assert_eq!(
            out,
            vec![
                Err(Error::FrameSize {
                    length: 6 + 0x62B5 + 2,
                    capacity: 64
                }),
                Ok(vec![0x06, 0x01])
            ]
        );
    }

    #[test]
    fn truncated_payload_then_valid_frame() {
        let mut framer = TableFramer::new(two_bytes_sync(), 64);
        let mut stream = ACK[..7].to_vec();
        stream.extend_from_slice(&ACK);
        let out = feed(&mut framer, &stream);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Err(Error::Checksum { .. })));
        assert_eq!(out[1], Ok(vec![0x06, 0x01]));
    }

    #[test]
    fn header_length_out_of_bounds() {
        let layout = Layout {
            protocol: Protocol::Oem,
            sync: SyncPattern::Bytes(&[0xAA, 0x44, 0x12]),
            header: HeaderLength::Field { offset: 3, min: 10 },
            length: LengthField {
                offset: 8,
                width: 2,
                big_endian: false,
                mask: 0xffff,
                counts: LengthCounts::Payload,
            },
            checksum: ChecksumKind::Crc32,
            checksum_from: 0,
            message_id: |frame, _| MessageId::Numeric(frame[4] as u32),
        };
        let mut framer = TableFramer::new(layout, 64);
        let out = feed(&mut framer, &[0xAA, 0x44, 0x12, 0x04]);
        assert_eq!(out, vec![Err(Error::InvalidLength(4))]);
    }

    #[test]
    fn oversized_declaration() {
        let mut framer = TableFramer::new(two_bytes_sync(), 16);
        let out = feed(&mut framer, &[0xB5, 0x62, 0x05, 0x01, 0xff, 0x00]);
        assert_eq!(
            out,
            vec![Err(Error::FrameSize {
                length: 6 + 255 + 2,
                capacity: 16
            })]
        );
    }

    #[test]
    fn total_length_without_checksum() {
        let layout = Layout {
            protocol: Protocol::Asterix,
            sync: SyncPattern::AnyOf(vec![2]),
            header: HeaderLength::Fixed(3),
            length: LengthField {
                offset: 1,
                width: 2,
                big_endian: true,
                mask: 0xffff,
                counts: LengthCounts::Total,
            },
            checksum: ChecksumKind::None,
            checksum_from: 0,
            message_id: |frame, _| MessageId::Numeric(frame[0] as u32),
        };
        let mut framer = TableFramer::new(layout, 32);
        let out = feed(&mut framer, &[0x02, 0x00, 0x03, 0x02, 0x00, 0x05, 0xaa, 0xbb]);
        assert_eq!(out, vec![Ok(vec![]), Ok(vec![0xaa, 0xbb])]);

        let out = feed(&mut framer, &[0x02, 0x00, 0x02]);
        assert_eq!(out, vec![Err(Error::InvalidLength(2))]);
    }
}
