//! RTCM 10403 (v3)
use crate::{
    checksum::ChecksumKind,
    codec::BitWriter,
    error::Error,
    framing::{HeaderLength, Layout, LengthCounts, LengthField, SyncPattern},
    message::{BitPayload, MessageId, Protocol},
    registry::Registry,
};

mod antenna;
mod station;

pub mod msm;

pub use antenna::{AntennaDescriptor, ReceiverDescriptor};
pub use station::StationArp;

/// Frame preamble
pub const PREAMBLE: u8 = 0xD3;

/// Preamble, 6 reserved bits and 10 bit payload length
pub const HEADER_LEN: usize = 3;

/// Largest payload the 10 bit length field can declare
pub const MAX_PAYLOAD_LEN: usize = 1023;

/// Message number: first 12 bits of the payload.
/// Empty payloads are identified as message 0.
fn message_id(frame: &[u8], header: usize) -> MessageId {
    let declared = (((frame[1] & 0x03) as usize) << 8) | frame[2] as usize;
    if declared < 2 {
        return MessageId::Numeric(0);
    }
    let number = ((frame[header] as u32) << 4) | (frame[header + 1] >> 4) as u32;
    MessageId::Numeric(number)
}

/// RTCM v3 frame [Layout]
pub fn layout() -> Layout {
    Layout {
        protocol: Protocol::RtcmV3,
        sync: SyncPattern::Bytes(&[PREAMBLE]),
        header: HeaderLength::Fixed(HEADER_LEN),
        length: LengthField {
            offset: 1,
            width: 2,
            big_endian: true,
            mask: 0x03ff,
            counts: LengthCounts::Payload,
        },
        checksum: ChecksumKind::Crc24q,
        checksum_from: 0,
        message_id,
    }
}

/// 1005..1008 and MSM4..7
pub fn default_set() -> Registry<u32, dyn BitPayload> {
    let mut registry = Registry::<u32, dyn BitPayload>::new();
    registry.register(1005, || Box::new(StationArp::new(1005)));
    registry.register(1006, || Box::new(StationArp::new(1006)));
    registry.register(1007, || Box::new(AntennaDescriptor::new(1007)));
    registry.register(1008, || Box::new(AntennaDescriptor::new(1008)));
    msm::register(
        &mut registry,
        &[
            msm::MsmKind::Msm4,
            msm::MsmKind::Msm5,
            msm::MsmKind::Msm6,
            msm::MsmKind::Msm7,
        ],
    );
    registry
}

/// [default_set] plus 1033 and MSM1..3
pub fn extended_set() -> Registry<u32, dyn BitPayload> {
    let mut extension = Registry::<u32, dyn BitPayload>::new();
    extension.register(1033, || Box::new(ReceiverDescriptor::default()));
    msm::register(
        &mut extension,
        &[msm::MsmKind::Msm1, msm::MsmKind::Msm2, msm::MsmKind::Msm3],
    );

    let mut registry = default_set();
    registry.extend(extension);
    registry
}

/// Encodes a complete RTCM v3 frame: header, payload and CRC-24Q.
pub fn encode(payload: &dyn BitPayload) -> Result<Vec<u8>, Error> {
    let mut writer = BitWriter::new();
    payload.serialize(&mut writer)?;
    let payload = writer.into_bytes();

    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(Error::FrameSize {
            length: payload.len(),
            capacity: MAX_PAYLOAD_LEN,
        });
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + 3);
    frame.push(PREAMBLE);
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(&payload);

    let crc = ChecksumKind::Crc24q.compute(&frame);
    frame.extend(ChecksumKind::Crc24q.to_bytes(crc));
    Ok(frame)
}
