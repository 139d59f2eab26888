//! FSPEC and data item building blocks
use crate::{
    codec::{ByteReader, ByteWriter},
    error::Error,
};

/// Field specification: presence bit of each field reference number (FRN),
/// 7 per octet, LSB of every octet being the FX extension bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fspec {
    octets: Vec<u8>,
}

impl Fspec {
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let octets = extended(reader)?;
        Ok(Self { octets })
    }

    /// Builds the shortest [Fspec] announcing these FRNs
    pub fn from_frns(frns: &[usize]) -> Self {
        let mut octets = Vec::new();
        for frn in frns.iter().copied().filter(|frn| *frn > 0) {
            let index = (frn - 1) / 7;
            if octets.len() <= index {
                octets.resize(index + 1, 0);
            }
            octets[index] |= 0x80 >> ((frn - 1) % 7);
        }
        if octets.is_empty() {
            octets.push(0);
        }
        let last = octets.len() - 1;
        for octet in octets[..last].iter_mut() {
            *octet |= 0x01;
        }
        Self { octets }
    }

    /// Field reference number presence, 1-based
    pub fn is_set(&self, frn: usize) -> bool {
        if frn == 0 {
            return false;
        }
        self.octets
            .get((frn - 1) / 7)
            .is_some_and(|octet| octet & (0x80 >> ((frn - 1) % 7)) != 0)
    }

    /// Highest FRN this [Fspec] can announce
    pub fn capacity(&self) -> usize {
        self.octets.len() * 7
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.bytes(&self.octets);
    }
}

/// Variable length item: octets are read up to the first one with FX cleared.
pub(crate) fn extended(reader: &mut ByteReader<'_>) -> Result<Vec<u8>, Error> {
    let mut octets = Vec::new();
    loop {
        let octet = reader.u8()?;
        octets.push(octet);
        if octet & 0x01 == 0 {
            return Ok(octets);
        }
    }
}

pub(crate) fn write_extended(writer: &mut ByteWriter, octets: &[u8]) -> Result<(), Error> {
    let valid = octets.split_last().is_some_and(|(last, others)| {
        last & 0x01 == 0 && others.iter().all(|octet| octet & 0x01 != 0)
    });
    if !valid {
        return Err(Error::InvalidField("extension bits"));
    }
    writer.bytes(octets);
    Ok(())
}

/// Repetitive item of 16 bit values: repetition factor then values
pub(crate) fn repetitive_u16(reader: &mut ByteReader<'_>) -> Result<Vec<u16>, Error> {
    let count = reader.u8()?;
    (0..count).map(|_| reader.u16_be()).collect()
}

pub(crate) fn write_repetitive_u16(writer: &mut ByteWriter, values: &[u16]) -> Result<(), Error> {
    let count = u8::try_from(values.len()).map_err(|_| Error::ValueOutOfRange { width: 8 })?;
    writer.u8(count);
    for value in values {
        writer.u16_be(*value);
    }
    Ok(())
}

/// Explicit length item (SP, RE): length octet, itself included, then content
pub(crate) fn explicit(reader: &mut ByteReader<'_>) -> Result<Vec<u8>, Error> {
    let len = reader.u8()? as usize;
    if len == 0 {
        return Err(Error::InvalidField("explicit length"));
    }
    Ok(reader.take(len - 1)?.to_vec())
}

pub(crate) fn write_explicit(writer: &mut ByteWriter, content: &[u8]) -> Result<(), Error> {
    let len = u8::try_from(content.len() + 1).map_err(|_| Error::ValueOutOfRange { width: 8 })?;
    writer.u8(len);
    writer.bytes(content);
    Ok(())
}

/// Compound item, kept as transmitted. `lengths` gives the size
/// of the subfield announced by each bit of the primary subfield
/// (7 per octet, None for spare bits).
pub(crate) fn compound(
    reader: &mut ByteReader<'_>,
    lengths: &[Option<usize>],
) -> Result<Vec<u8>, Error> {
    let mut raw = extended(reader)?;
    let primary = Fspec {
        octets: raw.clone(),
    };
    for (index, length) in lengths.iter().enumerate() {
        if !primary.is_set(index + 1) {
            continue;
        }
        let Some(length) = length else {
            return Err(Error::InvalidField("spare subfield"));
        };
        raw.extend_from_slice(reader.take(*length)?);
    }
    if (lengths.len() + 1..=primary.capacity()).any(|frn| primary.is_set(frn)) {
        return Err(Error::InvalidField("unknown subfield"));
    }
    Ok(raw)
}

/// Data source identifier (item 010)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataSource {
    /// System area code
    pub sac: u8,
    /// System identification code
    pub sic: u8,
}

impl DataSource {
    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            sac: reader.u8()?,
            sic: reader.u8()?,
        })
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter) {
        writer.u8(self.sac);
        writer.u8(self.sic);
    }
}

/// Dynamic window (item 100), raw binary units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolarWindow {
    /// 1/128 NM
    pub rho_start: u16,
    /// 1/128 NM
    pub rho_end: u16,
    /// 360/2^16 degrees
    pub theta_start: u16,
    /// 360/2^16 degrees
    pub theta_end: u16,
}

impl PolarWindow {
    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            rho_start: reader.u16_be()?,
            rho_end: reader.u16_be()?,
            theta_start: reader.u16_be()?,
            theta_end: reader.u16_be()?,
        })
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter) {
        writer.u16_be(self.rho_start);
        writer.u16_be(self.rho_end);
        writer.u16_be(self.theta_start);
        writer.u16_be(self.theta_end);
    }
}

/// Collimation error (item 090), raw binary units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollimationError {
    /// 1/128 NM
    pub range: i8,
    /// 360/2^14 degrees
    pub azimuth: i8,
}

impl CollimationError {
    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            range: reader.i8()?,
            azimuth: reader.i8()?,
        })
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter) {
        writer.i8(self.range);
        writer.i8(self.azimuth);
    }
}
