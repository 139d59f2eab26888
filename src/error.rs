use thiserror::Error;

use crate::message::{MessageId, Protocol};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Declared (or accumulated) frame length does not fit in the framer arena.
    /// The frame is dropped and the framer returns to sync search.
    #[error("frame length {length} exceeds capacity of {capacity} bytes")]
    FrameSize { length: usize, capacity: usize },

    /// Declared length is shorter than the protocol header itself.
    #[error("invalid declared frame length {0}")]
    InvalidLength(usize),

    /// Computed checksum does not match the transmitted one.
    #[error("checksum mismatch: computed {computed:#x}, received {received:#x}")]
    Checksum { computed: u32, received: u32 },

    /// 30-bit word failed its 6-bit Hamming parity check.
    #[error("word parity failure")]
    Parity,

    /// Valid frame, but no constructor was registered for its identifier.
    #[error("no message registered for id {0}")]
    UnknownMessage(MessageId),

    /// Field read went past the end of the payload.
    #[error("truncated payload: {needed} more bits needed")]
    Truncated { needed: usize },

    /// Message deserialization did not consume exactly the declared payload.
    /// Either the id->type mapping is wrong or an optional field revision
    /// is not supported.
    #[error("trailing data: consumed {consumed} of {declared} bytes")]
    TrailingData { consumed: usize, declared: usize },

    /// MSM header declares more satellite x signal cells than the 64 bit cell mask can hold.
    #[error("cell mask overflow: {satellites} satellites x {signals} signals > 64")]
    CellMaskOverflow { satellites: usize, signals: usize },

    /// Field content is not valid for this message.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// Value does not fit in its wire representation.
    #[error("value out of range for {width} bit field")]
    ValueOutOfRange { width: usize },

    /// Text frame violates the sentence grammar (bad hex digit, missing terminator..).
    #[error("malformed sentence: {0}")]
    Malformed(&'static str),

    /// A message subscriber returned an error.
    #[error("subscriber failure: {0}")]
    Publication(String),
}

/// Classification of [Error]s, as reported on the error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Byte does not match the expected preamble. Classification only:
    /// sync search goes on silently and no event ever carries this kind.
    Sync,
    /// Declared length exceeds the frame capacity or is inconsistent.
    Size,
    /// Checksum or parity mismatch.
    Checksum,
    /// No constructor registered for a valid frame.
    UnknownMessage,
    /// Field level deserialization failure.
    Decode,
    /// Payload not entirely consumed.
    TrailingData,
    /// Message subscriber failure.
    Publication,
    /// Text framing violation.
    Malformed,
}

impl Error {
    /// Returns the [ErrorKind] of this [Error].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FrameSize { .. } | Self::InvalidLength(_) => ErrorKind::Size,
            Self::Checksum { .. } | Self::Parity => ErrorKind::Checksum,
            Self::UnknownMessage(_) => ErrorKind::UnknownMessage,
            Self::TrailingData { .. } => ErrorKind::TrailingData,
            Self::Publication(_) => ErrorKind::Publication,
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::Truncated { .. }
            | Self::CellMaskOverflow { .. }
            | Self::InvalidField(_)
            | Self::ValueOutOfRange { .. } => ErrorKind::Decode,
        }
    }
}

/// [ErrorEvent] is what error subscribers receive: the [Error],
/// the [Protocol] it was detected on and, when known at that stage,
/// the message identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub protocol: Protocol,
    pub message_id: Option<MessageId>,
    pub message_name: Option<&'static str>,
    pub error: Error,
}

impl ErrorEvent {
    pub fn new(protocol: Protocol, error: Error) -> Self {
        Self {
            protocol,
            kind: error.kind(),
            message_id: None,
            message_name: None,
            error,
        }
    }

    /// Copies and returns [ErrorEvent] with message identifier
    pub fn with_message_id(mut self, id: MessageId) -> Self {
        self.message_id = Some(id);
        self
    }

    /// Copies and returns [ErrorEvent] with message name
    pub fn with_message_name(mut self, name: &'static str) -> Self {
        self.message_name = Some(name);
        self
    }
}

impl std::fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.protocol)?;
        if let Some(id) = &self.message_id {
            write!(f, "({})", id)?;
        }
        if let Some(name) = self.message_name {
            write!(f, " {}", name)?;
        }
        write!(f, ": {}", self.error)
    }
}
