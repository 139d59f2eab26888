//! Eurocontrol ASTERIX data blocks
//!
//! A data block is a category byte, a 2 byte big endian length that
//! includes the block header, then one or more records. Each record
//! starts with its [Fspec]. Blocks are registered under their category.
use crate::{
    codec::ByteWriter,
    checksum::ChecksumKind,
    error::Error,
    framing::{HeaderLength, Layout, LengthCounts, LengthField, SyncPattern},
    message::{BytePayload, MessageId, Protocol},
    registry::Registry,
};

mod cat002;
mod cat034;
mod items;

pub use cat002::{Cat002, Cat002Record, MonoradarMessage};
pub use cat034::{Cat034, Cat034Record, SourcePosition};
pub use items::{CollimationError, DataSource, Fspec, PolarWindow};

/// Category and length
pub const HEADER_LEN: usize = 3;

/// ASTERIX frame [Layout], synchronized on these categories
pub fn layout(categories: &[u8]) -> Layout {
    Layout {
        protocol: Protocol::Asterix,
        sync: SyncPattern::AnyOf(categories.to_vec()),
        header: HeaderLength::Fixed(HEADER_LEN),
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
    }
}

/// CAT002
pub fn default_set() -> Registry<u32, dyn BytePayload> {
    let mut registry = Registry::<u32, dyn BytePayload>::new();
    registry.register(Cat002::CATEGORY as u32, || Box::new(Cat002::default()));
    registry
}

/// [default_set] plus CAT034
pub fn extended_set() -> Registry<u32, dyn BytePayload> {
    let mut extension = Registry::<u32, dyn BytePayload>::new();
    extension.register(Cat034::CATEGORY as u32, || Box::new(Cat034::default()));

    let mut registry = default_set();
    registry.extend(extension);
    registry
}

/// Encodes a complete data block
pub fn encode(payload: &dyn BytePayload) -> Result<Vec<u8>, Error> {
    let MessageId::Numeric(category) = payload.id() else {
        return Err(Error::InvalidField("category"));
    };
    let category = u8::try_from(category).map_err(|_| Error::ValueOutOfRange { width: 8 })?;

    let mut writer = ByteWriter::new();
    payload.serialize(&mut writer)?;
    let records = writer.into_bytes();

    let len = u16::try_from(HEADER_LEN + records.len())
        .map_err(|_| Error::ValueOutOfRange { width: 16 })?;

    let mut block = Vec::with_capacity(len as usize);
    block.push(category);
    block.extend_from_slice(&len.to_be_bytes());
    block.extend_from_slice(&records);
    Ok(block)
}
