use hifitime::Duration;

use crate::{
    asterix::{
        cat002::from_1_128_s,
        items::{
            compound, explicit, repetitive_u16, write_explicit, write_repetitive_u16,
            CollimationError, DataSource, Fspec, PolarWindow,
        },
    },
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
};

/// Highest FRN of the CAT034 UAP
const MAX_FRN: usize = 14;

/// I034/050 subfields: COM, spare, spare, PSR, SSR, MDS
const SYSTEM_CONFIGURATION: [Option<usize>; 6] = [Some(1), None, None, Some(1), Some(1), Some(2)];

/// I034/060 subfields: COM, spare, spare, PSR, SSR, MDS
const PROCESSING_MODE: [Option<usize>; 6] = [Some(1), None, None, Some(1), Some(1), Some(1)];

fn read_i24(reader: &mut ByteReader<'_>) -> Result<i32, Error> {
    let raw = reader.u24_be()?;
    Ok(((raw << 8) as i32) >> 8)
}

fn write_i24(writer: &mut ByteWriter, value: i32) -> Result<(), Error> {
    if !(-(1 << 23)..(1 << 23)).contains(&value) {
        return Err(Error::ValueOutOfRange { width: 24 });
    }
    writer.u24_be(value as u32 & 0x00ff_ffff)
}

/// Data source position (I034/120), raw binary units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePosition {
    /// Height above WGS84 (m)
    pub height_m: i16,
    /// 180/2^23 degrees
    pub latitude: i32,
    /// 180/2^23 degrees
    pub longitude: i32,
}

impl SourcePosition {
    /// Latitude and longitude in decimal degrees
    pub fn lat_lon_deg(&self) -> (f64, f64) {
        let lsb = 180.0 / (1 << 23) as f64;
        (self.latitude as f64 * lsb, self.longitude as f64 * lsb)
    }
}

/// One CAT034 record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cat034Record {
    /// I034/010
    pub data_source: Option<DataSource>,
    /// I034/000
    pub message_type: Option<u8>,
    /// I034/030, 1/128 s
    pub time_of_day: Option<u32>,
    /// I034/020, 360/2^8 degrees
    pub sector_number: Option<u8>,
    /// I034/041, 1/128 s
    pub antenna_rotation_period: Option<u16>,
    /// I034/050 compound item, as transmitted
    pub system_configuration: Option<Vec<u8>>,
    /// I034/060 compound item, as transmitted
    pub processing_mode: Option<Vec<u8>>,
    /// I034/070
    pub plot_counts: Option<Vec<u16>>,
    /// I034/100
    pub polar_window: Option<PolarWindow>,
    /// I034/110
    pub data_filter: Option<u8>,
    /// I034/120
    pub position: Option<SourcePosition>,
    /// I034/090
    pub collimation_error: Option<CollimationError>,
    pub reserved_expansion: Option<Vec<u8>>,
    pub special_purpose: Option<Vec<u8>>,
}

impl Cat034Record {
    pub fn time_of_day(&self) -> Option<Duration> {
        self.time_of_day.map(from_1_128_s)
    }

    fn frns(&self) -> Vec<usize> {
        [
            self.data_source.is_some(),
            self.message_type.is_some(),
            self.time_of_day.is_some(),
            self.sector_number.is_some(),
            self.antenna_rotation_period.is_some(),
            self.system_configuration.is_some(),
            self.processing_mode.is_some(),
            self.plot_counts.is_some(),
            self.polar_window.is_some(),
            self.data_filter.is_some(),
            self.position.is_some(),
            self.collimation_error.is_some(),
            self.reserved_expansion.is_some(),
            self.special_purpose.is_some(),
        ]
        .iter()
        .enumerate()
        .filter(|(_, present)| **present)
        .map(|(index, _)| index + 1)
        .collect()
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let fspec = Fspec::decode(reader)?;
        if (MAX_FRN + 1..=fspec.capacity()).any(|frn| fspec.is_set(frn)) {
            return Err(Error::InvalidField("unknown item"));
        }

        let mut record = Self::default();
        if fspec.is_set(1) {
            record.data_source = Some(DataSource::decode(reader)?);
        }
        if fspec.is_set(2) {
            record.message_type = Some(reader.u8()?);
        }
        if fspec.is_set(3) {
            record.time_of_day = Some(reader.u24_be()?);
        }
        if fspec.is_set(4) {
            record.sector_number = Some(reader.u8()?);
        }
        if fspec.is_set(5) {
            record.antenna_rotation_period = Some(reader.u16_be()?);
        }
        if fspec.is_set(6) {
            record.system_configuration = Some(compound(reader, &SYSTEM_CONFIGURATION)?);
        }
        if fspec.is_set(7) {
            record.processing_mode = Some(compound(reader, &PROCESSING_MODE)?);
        }
        if fspec.is_set(8) {
            record.plot_counts = Some(repetitive_u16(reader)?);
        }
        if fspec.is_set(9) {
            record.polar_window = Some(PolarWindow::decode(reader)?);
        }
        if fspec.is_set(10) {
            record.data_filter = Some(reader.u8()?);
        }
        if fspec.is_set(11) {
            record.position = Some(SourcePosition {
                height_m: reader.i16_be()?,
                latitude: read_i24(reader)?,
                longitude: read_i24(reader)?,
            });
        }
        if fspec.is_set(12) {
            record.collimation_error = Some(CollimationError::decode(reader)?);
        }
        if fspec.is_set(13) {
            record.reserved_expansion = Some(explicit(reader)?);
        }
        if fspec.is_set(14) {
            record.special_purpose = Some(explicit(reader)?);
        }
        Ok(record)
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        Fspec::from_frns(&self.frns()).encode(writer);

        if let Some(data_source) = &self.data_source {
            data_source.encode(writer);
        }
        if let Some(message_type) = self.message_type {
            writer.u8(message_type);
        }
        if let Some(time_of_day) = self.time_of_day {
            writer.u24_be(time_of_day)?;
        }
        if let Some(sector) = self.sector_number {
            writer.u8(sector);
        }
        if let Some(period) = self.antenna_rotation_period {
            writer.u16_be(period);
        }
        if let Some(raw) = &self.system_configuration {
            compound(&mut ByteReader::new(raw), &SYSTEM_CONFIGURATION)?;
            writer.bytes(raw);
        }
        if let Some(raw) = &self.processing_mode {
            compound(&mut ByteReader::new(raw), &PROCESSING_MODE)?;
            writer.bytes(raw);
        }
        if let Some(counts) = &self.plot_counts {
            write_repetitive_u16(writer, counts)?;
        }
        if let Some(window) = &self.polar_window {
            window.encode(writer);
        }
        if let Some(filter) = self.data_filter {
            writer.u8(filter);
        }
        if let Some(position) = &self.position {
            writer.i16_be(position.height_m);
            write_i24(writer, position.latitude)?;
            write_i24(writer, position.longitude)?;
        }
        if let Some(error) = &self.collimation_error {
            error.encode(writer);
        }
        if let Some(content) = &self.reserved_expansion {
            write_explicit(writer, content)?;
        }
        if let Some(content) = &self.special_purpose {
            write_explicit(writer, content)?;
        }
        Ok(())
    }
}

/// CAT034: transmission of monoradar service messages (CAT002 successor)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cat034 {
    pub records: Vec<Cat034Record>,
}

impl Cat034 {
    pub const CATEGORY: u8 = 34;
}

impl Body for Cat034 {
    fn name(&self) -> &'static str {
        "CAT034"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::CATEGORY as u32)
    }
}

impl BytePayload for Cat034 {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.records.clear();
        while !reader.is_empty() {
            self.records.push(Cat034Record::decode(reader)?);
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        for record in self.records.iter() {
            record.encode(writer)?;
        }
        Ok(())
    }
}
