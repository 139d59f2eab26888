//! Incremental, byte at a time, frame recognition.
//!
//! Every [Framer] walks `Sync -> header -> payload -> checksum` and always
//! returns to `Sync` once a frame has been delivered or dropped.
//! Regular binary protocols are described by a declarative [Layout] and share
//! the [TableFramer]; NMEA sentences and RTCM v2 words have their own machines.
use std::ops::Range;

use crate::{
    error::Error,
    message::{MessageId, Protocol},
};

mod layout;
mod nmea;
pub(crate) mod rtcm2;

pub use layout::{HeaderLength, Layout, LengthCounts, LengthField, SyncPattern, TableFramer};
pub use nmea::NmeaFramer;
pub use rtcm2::Rtcm2Framer;

/// Checksum validated frame, borrowed from the [Framer] arena.
/// It only lives until the next byte is pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    /// [Protocol] this frame belongs to
    pub protocol: Protocol,
    /// [MessageId] read from the frame header
    pub id: MessageId,
    bytes: &'a [u8],
    payload: Range<usize>,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        protocol: Protocol,
        id: MessageId,
        bytes: &'a [u8],
        payload: Range<usize>,
    ) -> Self {
        Self {
            protocol,
            id,
            bytes,
            payload,
        }
    }

    /// Complete frame, as validated
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Payload region
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[self.payload.clone()]
    }
}

/// Byte at a time frame state machine
pub trait Framer {
    /// [Protocol] this framer recognizes
    fn protocol(&self) -> Protocol;

    /// Largest frame this framer can hold, in bytes
    fn capacity(&self) -> usize;

    /// Consumes one byte. Returns `None` while a frame is pending (or while
    /// searching for sync), a validated [Frame] on completion, or the [Error]
    /// that caused the pending frame to be dropped.
    fn push(&mut self, byte: u8) -> Option<Result<Frame<'_>, Error>>;

    /// Drops any pending frame and goes back to sync search.
    fn reset(&mut self);
}

impl<T: Framer + ?Sized> Framer for Box<T> {
    fn protocol(&self) -> Protocol {
        self.as_ref().protocol()
    }

    fn capacity(&self) -> usize {
        self.as_ref().capacity()
    }

    fn push(&mut self, byte: u8) -> Option<Result<Frame<'_>, Error>> {
        self.as_mut().push(byte)
    }

    fn reset(&mut self) {
        self.as_mut().reset()
    }
}

/// Fixed capacity frame buffer, owned by a single framer.
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    buf: Box<[u8]>,
    len: usize,
}

impl Arena {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Appends one byte, fails when full
    pub fn push(&mut self, byte: u8) -> Result<(), Error> {
        if self.len == self.buf.len() {
            return Err(Error::FrameSize {
                length: self.len + 1,
                capacity: self.buf.len(),
            });
        }
        self.buf[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
