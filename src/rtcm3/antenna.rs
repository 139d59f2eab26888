use crate::{
    codec::{BitReader, BitWriter},
    error::Error,
    message::{BitPayload, Body, MessageId},
};

/// Counted string: 8 bit character count followed by the characters
fn read_text(reader: &mut BitReader<'_>) -> Result<String, Error> {
    let len = reader.read_u8(8)? as usize;
    reader.read_string(len)
}

fn write_text(writer: &mut BitWriter, text: &str) -> Result<(), Error> {
    let len = text.chars().count();
    if len > u8::MAX as usize {
        return Err(Error::ValueOutOfRange { width: 8 });
    }
    writer.write_u32(8, len as u32)?;
    writer.write_str(text)
}

/// Antenna descriptor, messages 1007 and 1008 (1008 adds the serial number).
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaDescriptor {
    /// 1007 or 1008
    pub number: u16,
    pub station_id: u16,
    /// IGS antenna name
    pub descriptor: String,
    /// Antenna setup ID, 0 = use standard IGS model
    pub setup_id: u8,
    /// 1008 only
    pub serial_number: Option<String>,
}

impl AntennaDescriptor {
    pub fn new(number: u16) -> Self {
        Self {
            number,
            station_id: 0,
            descriptor: String::new(),
            setup_id: 0,
            serial_number: if number == 1008 {
                Some(String::new())
            } else {
                None
            },
        }
    }
}

impl Body for AntennaDescriptor {
    fn name(&self) -> &'static str {
        if self.number == 1008 {
            "Antenna descriptor and serial number"
        } else {
            "Antenna descriptor"
        }
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(self.number as u32)
    }
}

impl BitPayload for AntennaDescriptor {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        if reader.read_u16(12)? != self.number {
            return Err(Error::InvalidField("message number"));
        }
        self.station_id = reader.read_u16(12)?;
        self.descriptor = read_text(reader)?;
        self.setup_id = reader.read_u8(8)?;
        if self.number == 1008 {
            self.serial_number = Some(read_text(reader)?);
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        writer.write_u32(12, self.number as u32)?;
        writer.write_u32(12, self.station_id as u32)?;
        write_text(writer, &self.descriptor)?;
        writer.write_u32(8, self.setup_id as u32)?;
        if self.number == 1008 {
            write_text(writer, self.serial_number.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Receiver and antenna descriptors, message 1033
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiverDescriptor {
    pub station_id: u16,
    pub antenna_descriptor: String,
    pub antenna_setup_id: u8,
    pub antenna_serial_number: String,
    pub receiver_type: String,
    pub firmware_version: String,
    pub receiver_serial_number: String,
}

impl Body for ReceiverDescriptor {
    fn name(&self) -> &'static str {
        "Receiver and antenna descriptors"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(1033)
    }
}

impl BitPayload for ReceiverDescriptor {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        if reader.read_u16(12)? != 1033 {
            return Err(Error::InvalidField("message number"));
        }
        self.station_id = reader.read_u16(12)?;
        self.antenna_descriptor = read_text(reader)?;
        self.antenna_setup_id = reader.read_u8(8)?;
        self.antenna_serial_number = read_text(reader)?;
        self.receiver_type = read_text(reader)?;
        self.firmware_version = read_text(reader)?;
        self.receiver_serial_number = read_text(reader)?;
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        writer.write_u32(12, 1033)?;
        writer.write_u32(12, self.station_id as u32)?;
        write_text(writer, &self.antenna_descriptor)?;
        writer.write_u32(8, self.antenna_setup_id as u32)?;
        write_text(writer, &self.antenna_serial_number)?;
        write_text(writer, &self.receiver_type)?;
        write_text(writer, &self.firmware_version)?;
        write_text(writer, &self.receiver_serial_number)
    }
}
