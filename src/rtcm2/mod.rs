//! RTCM 10402 (v2)
//!
//! Frames are made of 30 bit words, 24 data bits each. The [Rtcm2Header]
//! (two words) is part of every payload, its 5 bit word count is derived
//! from the message content when encoding.
use hifitime::{Duration, Unit};

use crate::{
    codec::{BitReader, BitWriter},
    error::Error,
    framing::rtcm2::{to_transmitted, HEADER_LEN, PREAMBLE},
    message::BitPayload,
    registry::Registry,
};

mod messages;

pub use messages::{ReferenceStation, SpecialMessage, TimeOfWeek};

/// Largest word count the header can declare
pub const MAX_WORDS: usize = 31;

/// Common two words header
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rtcm2Header {
    /// Message type (6 bits)
    pub message_type: u8,
    /// Reference station ID (10 bits)
    pub station_id: u16,
    /// Modified z-count, 0.6 s units
    pub z_count: u16,
    /// Sequence number (3 bits)
    pub sequence: u8,
    /// Station health (3 bits)
    pub health: u8,
}

impl Rtcm2Header {
    pub fn new(message_type: u8) -> Self {
        Self {
            message_type,
            ..Default::default()
        }
    }

    /// Time within the hour
    pub fn time_of_hour(&self) -> Duration {
        Unit::Millisecond * (self.z_count as i64 * 600)
    }

    /// Decodes the header, returns it with the number of data words that follow.
    pub(crate) fn decode(reader: &mut BitReader<'_>) -> Result<(Self, usize), Error> {
        if reader.read_u8(8)? != PREAMBLE {
            return Err(Error::InvalidField("preamble"));
        }
        let header = Self {
            message_type: reader.read_u8(6)?,
            station_id: reader.read_u16(10)?,
            z_count: reader.read_u16(13)?,
            sequence: reader.read_u8(3)?,
            ..Default::default()
        };
        let words = reader.read_u8(5)? as usize;
        let health = reader.read_u8(3)?;
        Ok((Self { health, ..header }, words))
    }

    pub(crate) fn encode(&self, writer: &mut BitWriter, words: usize) -> Result<(), Error> {
        if words > MAX_WORDS {
            return Err(Error::FrameSize {
                length: HEADER_LEN + 3 * words,
                capacity: HEADER_LEN + 3 * MAX_WORDS,
            });
        }
        writer.write_u32(8, PREAMBLE as u32)?;
        writer.write_u32(6, self.message_type as u32)?;
        writer.write_u32(10, self.station_id as u32)?;
        writer.write_u32(13, self.z_count as u32)?;
        writer.write_u32(3, self.sequence as u32)?;
        writer.write_u32(5, words as u32)?;
        writer.write_u32(3, self.health as u32)
    }

    /// Checks the decoded message type against the expected one
    pub(crate) fn expect(&self, message_type: u8) -> Result<(), Error> {
        if self.message_type != message_type {
            Err(Error::InvalidField("message type"))
        } else {
            Ok(())
        }
    }
}

/// Types 3 and 16
pub fn default_set() -> Registry<u32, dyn BitPayload> {
    let mut registry = Registry::<u32, dyn BitPayload>::new();
    registry.register(3, || Box::new(ReferenceStation::default()));
    registry.register(16, || Box::new(SpecialMessage::default()));
    registry
}

/// [default_set] plus type 14
pub fn extended_set() -> Registry<u32, dyn BitPayload> {
    let mut extension = Registry::<u32, dyn BitPayload>::new();
    extension.register(14, || Box::new(TimeOfWeek::default()));

    let mut registry = default_set();
    registry.extend(extension);
    registry
}

/// Encodes a message into 6 of 8 transmitted bytes, ready to be sent.
pub fn encode(payload: &dyn BitPayload) -> Result<Vec<u8>, Error> {
    let mut writer = BitWriter::new();
    payload.serialize(&mut writer)?;
    let data = writer.into_bytes();

    if data.len() < HEADER_LEN || data.len() % 3 != 0 {
        return Err(Error::InvalidField("word alignment"));
    }
    Ok(to_transmitted(&data))
}
