use crate::{
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
    ubx::{message_id, CLASS_MON},
};

const SW_VERSION_LEN: usize = 30;
const HW_VERSION_LEN: usize = 10;
const EXTENSION_LEN: usize = 30;

/// MON-VER: receiver and software versions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonVer {
    pub sw_version: String,
    pub hw_version: String,
    /// Extended version information ("PROTVER=..", "GPS;GLO;GAL"..)
    pub extensions: Vec<String>,
}

impl MonVer {
    pub const ID: u32 = message_id(CLASS_MON, 0x04);
}

impl Body for MonVer {
    fn name(&self) -> &'static str {
        "MON-VER"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::ID)
    }
}

impl BytePayload for MonVer {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.sw_version = reader.string(SW_VERSION_LEN)?;
        self.hw_version = reader.string(HW_VERSION_LEN)?;
        self.extensions.clear();
        while reader.remaining() >= EXTENSION_LEN {
            self.extensions.push(reader.string(EXTENSION_LEN)?);
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        writer.string(&self.sw_version, SW_VERSION_LEN)?;
        writer.string(&self.hw_version, HW_VERSION_LEN)?;
        for extension in self.extensions.iter() {
            writer.string(extension, EXTENSION_LEN)?;
        }
        Ok(())
    }
}
