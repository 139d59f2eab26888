//! Decoded messages
use std::any::Any;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    codec::{BitReader, BitWriter, ByteReader, ByteWriter, FieldReader, FieldWriter},
    error::Error,
};

/// Supported wire protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Protocol {
    /// RTCM 10403 (v3)
    RtcmV3,
    /// RTCM 10402 (v2), 30 bit words with Hamming parity
    RtcmV2,
    /// u-blox binary
    Ubx,
    /// Vendor binary receiver protocol (3 byte sync, CRC-32)
    Oem,
    /// NMEA-0183 sentences
    Nmea,
    /// Eurocontrol ASTERIX data blocks
    Asterix,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::RtcmV3 => write!(f, "RTCM3"),
            Self::RtcmV2 => write!(f, "RTCM2"),
            Self::Ubx => write!(f, "UBX"),
            Self::Oem => write!(f, "OEM"),
            Self::Nmea => write!(f, "NMEA"),
            Self::Asterix => write!(f, "ASTERIX"),
        }
    }
}

/// Message identifier, numeric for binary protocols and textual for NMEA.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageId {
    Numeric(u32),
    Text(String),
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{}", id),
            Self::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<u32> for MessageId {
    fn from(id: u32) -> Self {
        Self::Numeric(id)
    }
}

impl From<u16> for MessageId {
    fn from(id: u16) -> Self {
        Self::Numeric(id as u32)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Converts a concrete payload into the protocol independent [Body].
pub trait IntoBody {
    fn into_body(self: Box<Self>) -> Box<dyn Body>;
}

impl<T: Body + 'static> IntoBody for T {
    fn into_body(self: Box<Self>) -> Box<dyn Body> {
        self
    }
}

/// Decoded content of any [Message].
pub trait Body: AsAny + Debug + Send {
    /// Human readable name
    fn name(&self) -> &'static str;

    /// Identifier this content is registered under
    fn id(&self) -> MessageId;
}

/// Bit packed payloads (RTCM)
pub trait BitPayload: Body + IntoBody {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error>;
    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error>;
}

/// Byte aligned payloads (UBX, OEM, ASTERIX)
pub trait BytePayload: Body + IntoBody {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error>;
    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error>;
}

/// Comma separated sentences (NMEA)
pub trait SentencePayload: Body + IntoBody {
    /// Sentence formatter, without talker ("GBS", "ZDA"..)
    fn formatter(&self) -> &'static str;
    fn deserialize(&mut self, reader: &mut FieldReader<'_>) -> Result<(), Error>;
    fn serialize(&self, writer: &mut FieldWriter) -> Result<(), Error>;
}

/// [Message] as emitted by a [crate::parser::Parser].
#[derive(Debug)]
pub struct Message {
    /// [Protocol] this message was received on
    pub protocol: Protocol,
    /// [MessageId] as found in the frame
    pub id: MessageId,
    body: Box<dyn Body>,
}

impl Message {
    pub(crate) fn new(protocol: Protocol, id: MessageId, body: Box<dyn Body>) -> Self {
        Self { protocol, id, body }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        self.body.name()
    }

    /// Decoded content
    pub fn body(&self) -> &dyn Body {
        self.body.as_ref()
    }

    /// Returns decoded content as concrete type, if it matches.
    pub fn downcast_ref<T: Body + 'static>(&self) -> Option<&T> {
        let body: &dyn Body = self.body.as_ref();
        body.as_any().downcast_ref::<T>()
    }
}
