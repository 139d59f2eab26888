//! Validated frame to typed [Message]
use log::trace;

use crate::{
    codec::{BitReader, ByteReader, FieldReader},
    error::{Error, ErrorEvent},
    framing::Frame,
    message::{BitPayload, BytePayload, Message, MessageId, Protocol, SentencePayload},
    registry::Registry,
};

/// [Decoder] turns a validated [Frame] into a [Message].
/// The payload must be consumed entirely, otherwise
/// the frame is rejected with [Error::TrailingData].
pub trait Decoder {
    /// [Protocol] this decoder supports
    fn protocol(&self) -> Protocol;

    fn decode(&self, frame: &Frame<'_>) -> Result<Message, ErrorEvent>;
}

impl<T: Decoder + ?Sized> Decoder for Box<T> {
    fn protocol(&self) -> Protocol {
        self.as_ref().protocol()
    }

    fn decode(&self, frame: &Frame<'_>) -> Result<Message, ErrorEvent> {
        self.as_ref().decode(frame)
    }
}

fn error_event(protocol: Protocol, frame: &Frame<'_>, error: Error) -> ErrorEvent {
    ErrorEvent::new(protocol, error).with_message_id(frame.id.clone())
}

fn numeric_id(protocol: Protocol, frame: &Frame<'_>) -> Result<u32, ErrorEvent> {
    match frame.id {
        MessageId::Numeric(id) => Ok(id),
        MessageId::Text(_) => Err(error_event(
            protocol,
            frame,
            Error::UnknownMessage(frame.id.clone()),
        )),
    }
}

/// Bit packed payloads: RTCM v3 and v2.
/// Consumption is counted in bits, rounded up to whole bytes.
#[derive(Debug)]
pub struct BitDecoder {
    protocol: Protocol,
    registry: Registry<u32, dyn BitPayload>,
}

impl BitDecoder {
    pub fn new(protocol: Protocol, registry: Registry<u32, dyn BitPayload>) -> Self {
        Self { protocol, registry }
    }

    pub fn registry(&self) -> &Registry<u32, dyn BitPayload> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<u32, dyn BitPayload> {
        &mut self.registry
    }
}

impl Decoder for BitDecoder {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn decode(&self, frame: &Frame<'_>) -> Result<Message, ErrorEvent> {
        let id = numeric_id(self.protocol, frame)?;

        let mut payload = self.registry.create(&id).ok_or_else(|| {
            error_event(self.protocol, frame, Error::UnknownMessage(frame.id.clone()))
        })?;

        let bytes = frame.payload();
        let mut reader = BitReader::new(bytes);

        payload.deserialize(&mut reader).map_err(|e| {
            error_event(self.protocol, frame, e).with_message_name(payload.name())
        })?;

        let consumed = reader.bytes_consumed();
        if consumed != bytes.len() {
            return Err(error_event(
                self.protocol,
                frame,
                Error::TrailingData {
                    consumed,
                    declared: bytes.len(),
                },
            )
            .with_message_name(payload.name()));
        }

        trace!("{}({}) {}", self.protocol, frame.id, payload.name());
        Ok(Message::new(self.protocol, frame.id.clone(), payload.into_body()))
    }
}

/// Byte aligned payloads: UBX, OEM and ASTERIX
#[derive(Debug)]
pub struct ByteDecoder {
    protocol: Protocol,
    registry: Registry<u32, dyn BytePayload>,
}

impl ByteDecoder {
    pub fn new(protocol: Protocol, registry: Registry<u32, dyn BytePayload>) -> Self {
        Self { protocol, registry }
    }

    pub fn registry(&self) -> &Registry<u32, dyn BytePayload> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<u32, dyn BytePayload> {
        &mut self.registry
    }
}

impl Decoder for ByteDecoder {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn decode(&self, frame: &Frame<'_>) -> Result<Message, ErrorEvent> {
        let id = numeric_id(self.protocol, frame)?;

        let mut payload = self.registry.create(&id).ok_or_else(|| {
            error_event(self.protocol, frame, Error::UnknownMessage(frame.id.clone()))
        })?;

        let bytes = frame.payload();
        let mut reader = ByteReader::new(bytes);

        payload.deserialize(&mut reader).map_err(|e| {
            error_event(self.protocol, frame, e).with_message_name(payload.name())
        })?;

        if !reader.is_empty() {
            return Err(error_event(
                self.protocol,
                frame,
                Error::TrailingData {
                    consumed: reader.position(),
                    declared: bytes.len(),
                },
            )
            .with_message_name(payload.name()));
        }

        trace!("{}({}) {}", self.protocol, frame.id, payload.name());
        Ok(Message::new(self.protocol, frame.id.clone(), payload.into_body()))
    }
}

/// Registry key of a sentence address: the formatter, talker removed.
/// Proprietary sentences (`P` + manufacturer) are registered under their
/// complete address.
pub fn sentence_key(address: &str) -> &str {
    if address.starts_with('P') {
        address
    } else {
        address.get(2..).unwrap_or(address)
    }
}

/// NMEA sentences. Consumption is counted in fields.
#[derive(Debug)]
pub struct SentenceDecoder {
    registry: Registry<String, dyn SentencePayload>,
}

impl SentenceDecoder {
    pub fn new(registry: Registry<String, dyn SentencePayload>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry<String, dyn SentencePayload> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<String, dyn SentencePayload> {
        &mut self.registry
    }
}

impl Decoder for SentenceDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::Nmea
    }

    fn decode(&self, frame: &Frame<'_>) -> Result<Message, ErrorEvent> {
        let content = std::str::from_utf8(frame.payload()).map_err(|_| {
            error_event(Protocol::Nmea, frame, Error::Malformed("non ascii content"))
        })?;

        let mut reader = FieldReader::new(content);

        let address = reader
            .next_field()
            .map_err(|e| error_event(Protocol::Nmea, frame, e))?;

        let mut payload = self.registry.create(sentence_key(address)).ok_or_else(|| {
            error_event(
                Protocol::Nmea,
                frame,
                Error::UnknownMessage(frame.id.clone()),
            )
        })?;

        payload.deserialize(&mut reader).map_err(|e| {
            error_event(Protocol::Nmea, frame, e).with_message_name(payload.name())
        })?;

        if reader.remaining() > 0 {
            return Err(error_event(
                Protocol::Nmea,
                frame,
                Error::TrailingData {
                    consumed: reader.consumed(),
                    declared: reader.len(),
                },
            )
            .with_message_name(payload.name()));
        }

        trace!("NMEA({}) {}", frame.id, payload.name());
        Ok(Message::new(Protocol::Nmea, frame.id.clone(), payload.into_body()))
    }
}

#[cfg(test)]
mod test {
    use super::sentence_key;

    #[test]
    fn sentence_keys() {
        assert_eq!(sentence_key("GPGBS"), "GBS");
        assert_eq!(sentence_key("GNZDA"), "ZDA");
        assert_eq!(sentence_key("PUBX"), "PUBX");
        assert_eq!(sentence_key("G"), "G");
    }
}
