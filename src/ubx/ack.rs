use crate::{
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
    ubx::{message_id, CLASS_ACK},
};

/// Message acknowledged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AckAck {
    /// Class of the acknowledged message
    pub class: u8,
    /// Id of the acknowledged message
    pub id: u8,
}

/// Message not acknowledged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AckNak {
    /// Class of the rejected message
    pub class: u8,
    /// Id of the rejected message
    pub id: u8,
}

impl AckAck {
    pub const ID: u32 = message_id(CLASS_ACK, 0x01);
}

impl AckNak {
    pub const ID: u32 = message_id(CLASS_ACK, 0x00);
}

impl Body for AckAck {
    fn name(&self) -> &'static str {
        "ACK-ACK"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::ID)
    }
}

impl BytePayload for AckAck {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.class = reader.u8()?;
        self.id = reader.u8()?;
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        writer.u8(self.class);
        writer.u8(self.id);
        Ok(())
    }
}

impl Body for AckNak {
    fn name(&self) -> &'static str {
        "ACK-NAK"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::ID)
    }
}

impl BytePayload for AckNak {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.class = reader.u8()?;
        self.id = reader.u8()?;
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        writer.u8(self.class);
        writer.u8(self.id);
        Ok(())
    }
}
