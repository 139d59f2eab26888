use crate::{
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
};

/// Version information of one receiver component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub kind: u32,
    pub model: String,
    pub serial_number: String,
    pub hw_version: String,
    pub sw_version: String,
    pub boot_version: String,
    pub compile_date: String,
    pub compile_time: String,
}

/// VERSION: receiver components
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Version {
    pub components: Vec<Component>,
}

impl Version {
    pub const ID: u32 = 37;
}

impl Body for Version {
    fn name(&self) -> &'static str {
        "VERSION"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::ID)
    }
}

impl BytePayload for Version {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        let count = reader.u32_le()?;
        self.components = (0..count)
            .map(|_| {
                Ok(Component {
                    kind: reader.u32_le()?,
                    model: reader.string(16)?,
                    serial_number: reader.string(16)?,
                    hw_version: reader.string(16)?,
                    sw_version: reader.string(16)?,
                    boot_version: reader.string(16)?,
                    compile_date: reader.string(12)?,
                    compile_time: reader.string(12)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        writer.u32_le(self.components.len() as u32);
        for component in self.components.iter() {
            writer.u32_le(component.kind);
            writer.string(&component.model, 16)?;
            writer.string(&component.serial_number, 16)?;
            writer.string(&component.hw_version, 16)?;
            writer.string(&component.sw_version, 16)?;
            writer.string(&component.boot_version, 16)?;
            writer.string(&component.compile_date, 12)?;
            writer.string(&component.compile_time, 12)?;
        }
        Ok(())
    }
}
