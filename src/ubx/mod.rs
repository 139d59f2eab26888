//! u-blox binary protocol
//!
//! Messages are identified by `class << 8 | id`.
use crate::{
    checksum::ChecksumKind,
    codec::ByteWriter,
    error::Error,
    framing::{HeaderLength, Layout, LengthCounts, LengthField, SyncPattern},
    message::{BytePayload, MessageId, Protocol},
    registry::Registry,
};

mod ack;
mod mon;
mod nav;

pub use ack::{AckAck, AckNak};
pub use mon::MonVer;
pub use nav::NavClock;

/// Sync characters
pub const SYNC: [u8; 2] = [0xB5, 0x62];

/// Sync, class, id and payload length
pub const HEADER_LEN: usize = 6;

pub const CLASS_NAV: u8 = 0x01;
pub const CLASS_ACK: u8 = 0x05;
pub const CLASS_MON: u8 = 0x0A;

/// Message identifier, as registered
pub const fn message_id(class: u8, id: u8) -> u32 {
    ((class as u32) << 8) | id as u32
}

/// UBX frame [Layout]
pub fn layout() -> Layout {
    Layout {
        protocol: Protocol::Ubx,
        sync: SyncPattern::Bytes(&SYNC),
        header: HeaderLength::Fixed(HEADER_LEN),
        length: LengthField {
            offset: 4,
            width: 2,
            big_endian: false,
            mask: 0xffff,
            counts: LengthCounts::Payload,
        },
        checksum: ChecksumKind::Fletcher8,
        checksum_from: 2,
        message_id: |frame, _| MessageId::Numeric(message_id(frame[2], frame[3])),
    }
}

/// ACK-ACK, ACK-NAK and NAV-CLOCK
pub fn default_set() -> Registry<u32, dyn BytePayload> {
    let mut registry = Registry::<u32, dyn BytePayload>::new();
    registry.register(AckAck::ID, || Box::new(AckAck::default()));
    registry.register(AckNak::ID, || Box::new(AckNak::default()));
    registry.register(NavClock::ID, || Box::new(NavClock::default()));
    registry
}

/// [default_set] plus MON-VER
pub fn extended_set() -> Registry<u32, dyn BytePayload> {
    let mut extension = Registry::<u32, dyn BytePayload>::new();
    extension.register(MonVer::ID, || Box::new(MonVer::default()));

    let mut registry = default_set();
    registry.extend(extension);
    registry
}

/// Encodes a complete UBX frame: sync, class, id, length, payload and checksum.
pub fn encode(payload: &dyn BytePayload) -> Result<Vec<u8>, Error> {
    let MessageId::Numeric(id) = payload.id() else {
        return Err(Error::InvalidField("message id"));
    };

    let mut writer = ByteWriter::new();
    payload.serialize(&mut writer)?;
    let body = writer.into_bytes();

    let len = u16::try_from(body.len()).map_err(|_| Error::ValueOutOfRange { width: 16 })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + body.len() + 2);
    frame.extend_from_slice(&SYNC);
    frame.push((id >> 8) as u8);
    frame.push(id as u8);
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);

    let checksum = ChecksumKind::Fletcher8.compute(&frame[2..]);
    frame.extend(ChecksumKind::Fletcher8.to_bytes(checksum));
    Ok(frame)
}
