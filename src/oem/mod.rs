//! Vendor binary receiver protocol
//!
//! `AA 44 12` sync, self describing header length, little endian
//! fields and a trailing reflected CRC-32 over header and payload.
use crate::{
    checksum::ChecksumKind,
    codec::{ByteReader, ByteWriter},
    error::Error,
    framing::{HeaderLength, Layout, LengthCounts, LengthField, SyncPattern},
    message::{BytePayload, MessageId, Protocol},
    registry::Registry,
};

mod time;
mod version;

pub use time::{ClockStatus, Time, UtcStatus};
pub use version::{Component, Version};

/// Sync bytes
pub const SYNC: [u8; 3] = [0xAA, 0x44, 0x12];

/// Standard header length
pub const HEADER_LEN: usize = 28;

/// Smallest header that still holds the message id and length
const MIN_HEADER_LEN: usize = 10;

/// Binary message header. Sync and length fields are not stored:
/// they are implied by the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OemHeader {
    pub message_id: u16,
    /// Message type (format and response bits)
    pub message_type: u8,
    pub port_address: u8,
    pub sequence: u16,
    /// Processor idle time (0.5 % units)
    pub idle_time: u8,
    /// Quality of the reference time
    pub time_status: u8,
    pub week: u16,
    /// Milliseconds into the week
    pub ms: u32,
    pub receiver_status: u32,
    pub sw_version: u16,
}

impl OemHeader {
    pub fn new(message_id: u16) -> Self {
        Self {
            message_id,
            ..Default::default()
        }
    }

    /// Decodes the header of a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(frame);
        if reader.take(3)? != SYNC {
            return Err(Error::InvalidField("sync"));
        }
        let header_len = reader.u8()? as usize;
        if header_len < HEADER_LEN {
            return Err(Error::InvalidLength(header_len));
        }
        let message_id = reader.u16_le()?;
        let message_type = reader.u8()?;
        let port_address = reader.u8()?;
        let _length = reader.u16_le()?;
        let sequence = reader.u16_le()?;
        let idle_time = reader.u8()?;
        let time_status = reader.u8()?;
        let week = reader.u16_le()?;
        let ms = reader.u32_le()?;
        let receiver_status = reader.u32_le()?;
        let _reserved = reader.u16_le()?;
        let header = Self {
            message_id,
            message_type,
            port_address,
            sequence,
            idle_time,
            time_status,
            week,
            ms,
            receiver_status,
            sw_version: reader.u16_le()?,
        };
        Ok(header)
    }

    fn encode(&self, writer: &mut ByteWriter, payload_len: u16) {
        writer.bytes(&SYNC);
        writer.u8(HEADER_LEN as u8);
        writer.u16_le(self.message_id);
        writer.u8(self.message_type);
        writer.u8(self.port_address);
        writer.u16_le(payload_len);
        writer.u16_le(self.sequence);
        writer.u8(self.idle_time);
        writer.u8(self.time_status);
        writer.u16_le(self.week);
        writer.u32_le(self.ms);
        writer.u32_le(self.receiver_status);
        writer.u16_le(0);
        writer.u16_le(self.sw_version);
    }
}

/// Oem frame [Layout]
pub fn layout() -> Layout {
    Layout {
        protocol: Protocol::Oem,
        sync: SyncPattern::Bytes(&SYNC),
        header: HeaderLength::Field {
            offset: 3,
            min: MIN_HEADER_LEN,
        },
        length: LengthField {
            offset: 8,
            width: 2,
            big_endian: false,
            mask: 0xffff,
            counts: LengthCounts::Payload,
        },
        checksum: ChecksumKind::Crc32,
        checksum_from: 0,
        message_id: |frame, _| MessageId::Numeric(u16::from_le_bytes([frame[4], frame[5]]) as u32),
    }
}

/// TIME
pub fn default_set() -> Registry<u32, dyn BytePayload> {
    let mut registry = Registry::<u32, dyn BytePayload>::new();
    registry.register(Time::ID, || Box::new(Time::default()));
    registry
}

/// [default_set] plus VERSION
pub fn extended_set() -> Registry<u32, dyn BytePayload> {
    let mut extension = Registry::<u32, dyn BytePayload>::new();
    extension.register(Version::ID, || Box::new(Version::default()));

    let mut registry = default_set();
    registry.extend(extension);
    registry
}

/// Encodes a complete frame. The header message id is taken from the payload.
pub fn encode(header: &OemHeader, payload: &dyn BytePayload) -> Result<Vec<u8>, Error> {
    let MessageId::Numeric(id) = payload.id() else {
        return Err(Error::InvalidField("message id"));
    };
    let message_id = u16::try_from(id).map_err(|_| Error::ValueOutOfRange { width: 16 })?;

    let mut body = ByteWriter::new();
    payload.serialize(&mut body)?;
    let body = body.into_bytes();
    let len = u16::try_from(body.len()).map_err(|_| Error::ValueOutOfRange { width: 16 })?;

    let mut writer = ByteWriter::new();
    OemHeader {
        message_id,
        ..*header
    }
    .encode(&mut writer, len);
    writer.bytes(&body);

    let mut frame = writer.into_bytes();
    let crc = ChecksumKind::Crc32.compute(&frame);
    frame.extend(ChecksumKind::Crc32.to_bytes(crc));
    Ok(frame)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header() {
        let header = OemHeader {
            message_type: 0x02,
            port_address: 0x20,
            sequence: 3,
            idle_time: 150,
            time_status: 180,
            week: 2345,
            ms: 345_600_000,
            receiver_status: 0x0200_0020,
            sw_version: 16_809,
            ..OemHeader::new(Time::ID as u16)
        };

        let frame = encode(&header, &Time::default()).unwrap();
        assert_eq!(frame.len(), HEADER_LEN + 44 + 4);
        assert_eq!(&frame[..4], &[0xAA, 0x44, 0x12, 0x1C]);
        assert_eq!(&frame[8..10], &[44, 0]);
        assert_eq!(OemHeader::decode(&frame), Ok(header));
    }

    #[test]
    fn short_header() {
        let frame = [0xAA, 0x44, 0x12, 0x0A, 0x65, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(OemHeader::decode(&frame), Err(Error::InvalidLength(10)));
    }
}
