use nalgebra::Vector3;

use crate::{
    codec::{BitReader, BitWriter},
    error::Error,
    message::{BitPayload, Body, MessageId},
    rtcm2::Rtcm2Header,
};

/// Reference station ECEF resolution (m)
const ECEF_RESOLUTION_M: f64 = 0.01;

/// Type 3: reference station parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceStation {
    pub header: Rtcm2Header,
    /// Reference station ECEF coordinates (m)
    pub ecef_m: Vector3<f64>,
}

impl Default for ReferenceStation {
    fn default() -> Self {
        Self {
            header: Rtcm2Header::new(3),
            ecef_m: Vector3::zeros(),
        }
    }
}

impl Body for ReferenceStation {
    fn name(&self) -> &'static str {
        "Reference station parameters"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(3)
    }
}

impl BitPayload for ReferenceStation {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        let (header, words) = Rtcm2Header::decode(reader)?;
        header.expect(3)?;
        if words != 4 {
            return Err(Error::InvalidField("word count"));
        }
        let x = reader.read_i32(32)?;
        let y = reader.read_i32(32)?;
        let z = reader.read_i32(32)?;
        self.header = header;
        self.ecef_m = Vector3::new(x as f64, y as f64, z as f64) * ECEF_RESOLUTION_M;
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        self.header.encode(writer, 4)?;
        for value in self.ecef_m.iter() {
            let raw = (value / ECEF_RESOLUTION_M).round();
            if raw < i32::MIN as f64 || raw > i32::MAX as f64 {
                return Err(Error::ValueOutOfRange { width: 32 });
            }
            writer.write_i32(32, raw as i32)?;
        }
        Ok(())
    }
}

/// Type 16: special text message. Text is padded with NUL
/// characters up to the word boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialMessage {
    pub header: Rtcm2Header,
    pub text: String,
}

impl Default for SpecialMessage {
    fn default() -> Self {
        Self {
            header: Rtcm2Header::new(16),
            text: String::new(),
        }
    }
}

impl Body for SpecialMessage {
    fn name(&self) -> &'static str {
        "Special message"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(16)
    }
}

impl BitPayload for SpecialMessage {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        let (header, words) = Rtcm2Header::decode(reader)?;
        header.expect(16)?;
        let text = reader.read_string(3 * words)?;
        self.header = header;
        self.text = text.trim_end_matches('\0').to_string();
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        let len = self.text.chars().count();
        let words = len.div_ceil(3);
        self.header.encode(writer, words)?;
        writer.write_str(&self.text)?;
        for _ in len..3 * words {
            writer.write_u32(8, 0)?;
        }
        Ok(())
    }
}

/// Type 14: GPS time of week
#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfWeek {
    pub header: Rtcm2Header,
    /// GPS week number (10 bits)
    pub week: u16,
    /// Hour within the week
    pub hour: u8,
    /// GPS - UTC leap seconds
    pub leap_seconds: u8,
}

impl Default for TimeOfWeek {
    fn default() -> Self {
        Self {
            header: Rtcm2Header::new(14),
            week: 0,
            hour: 0,
            leap_seconds: 0,
        }
    }
}

impl Body for TimeOfWeek {
    fn name(&self) -> &'static str {
        "GPS time of week"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(14)
    }
}

impl BitPayload for TimeOfWeek {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        let (header, words) = Rtcm2Header::decode(reader)?;
        header.expect(14)?;
        if words != 1 {
            return Err(Error::InvalidField("word count"));
        }
        self.header = header;
        self.week = reader.read_u16(10)?;
        self.hour = reader.read_u8(8)?;
        self.leap_seconds = reader.read_u8(6)?;
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        self.header.encode(writer, 1)?;
        writer.write_u32(10, self.week as u32)?;
        writer.write_u32(8, self.hour as u32)?;
        writer.write_u32(6, self.leap_seconds as u32)
    }
}
