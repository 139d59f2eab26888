use hifitime::{Duration, Unit};

use crate::{
    asterix::items::{
        explicit, extended, repetitive_u16, write_explicit, write_extended,
        write_repetitive_u16, CollimationError, DataSource, Fspec, PolarWindow,
    },
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
};

/// Highest FRN of the CAT002 UAP
const MAX_FRN: usize = 14;

/// Spare FRN
const SPARE_FRN: usize = 12;

/// Time of day and rotation period resolution: 1/128 s
pub(crate) fn from_1_128_s(raw: u32) -> Duration {
    Unit::Microsecond * (raw as i64 * 1_000_000 / 128)
}

/// CAT002 message type (item 000)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonoradarMessage {
    #[default]
    NorthMarker,
    SectorCrossing,
    SouthMarker,
    BlindZoneFilteringOn,
    BlindZoneFilteringOff,
    Other(u8),
}

impl From<u8> for MonoradarMessage {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::NorthMarker,
            2 => Self::SectorCrossing,
            3 => Self::SouthMarker,
            8 => Self::BlindZoneFilteringOn,
            9 => Self::BlindZoneFilteringOff,
            other => Self::Other(other),
        }
    }
}

impl From<MonoradarMessage> for u8 {
    fn from(message: MonoradarMessage) -> u8 {
        match message {
            MonoradarMessage::NorthMarker => 1,
            MonoradarMessage::SectorCrossing => 2,
            MonoradarMessage::SouthMarker => 3,
            MonoradarMessage::BlindZoneFilteringOn => 8,
            MonoradarMessage::BlindZoneFilteringOff => 9,
            MonoradarMessage::Other(other) => other,
        }
    }
}

/// One CAT002 record. Every item is optional, as announced by the FSPEC.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cat002Record {
    /// I002/010
    pub data_source: Option<DataSource>,
    /// I002/000
    pub message_type: Option<MonoradarMessage>,
    /// I002/020, 360/2^8 degrees
    pub sector_number: Option<u8>,
    /// I002/030, 1/128 s
    pub time_of_day: Option<u32>,
    /// I002/041, 1/128 s
    pub antenna_rotation_period: Option<u16>,
    /// I002/050, extensible octets
    pub station_configuration: Option<Vec<u8>>,
    /// I002/060, extensible octets
    pub station_processing_mode: Option<Vec<u8>>,
    /// I002/070, per counter: identifier (5 bits) and value (11 bits)
    pub plot_counts: Option<Vec<u16>>,
    /// I002/100
    pub dynamic_window: Option<PolarWindow>,
    /// I002/090
    pub collimation_error: Option<CollimationError>,
    /// I002/080, extensible octets
    pub warnings: Option<Vec<u8>>,
    /// Special purpose field content
    pub special_purpose: Option<Vec<u8>>,
    /// Reserved expansion field content
    pub reserved_expansion: Option<Vec<u8>>,
}

impl Cat002Record {
    /// Decoded I002/030
    pub fn time_of_day(&self) -> Option<Duration> {
        self.time_of_day.map(from_1_128_s)
    }

    /// Decoded I002/041
    pub fn antenna_rotation_period(&self) -> Option<Duration> {
        self.antenna_rotation_period
            .map(|raw| from_1_128_s(raw as u32))
    }

    fn frns(&self) -> Vec<usize> {
        [
            self.data_source.is_some(),
            self.message_type.is_some(),
            self.sector_number.is_some(),
            self.time_of_day.is_some(),
            self.antenna_rotation_period.is_some(),
            self.station_configuration.is_some(),
            self.station_processing_mode.is_some(),
            self.plot_counts.is_some(),
            self.dynamic_window.is_some(),
            self.collimation_error.is_some(),
            self.warnings.is_some(),
            false,
            self.special_purpose.is_some(),
            self.reserved_expansion.is_some(),
        ]
        .iter()
        .enumerate()
        .filter(|(_, present)| **present)
        .map(|(index, _)| index + 1)
        .collect()
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let fspec = Fspec::decode(reader)?;

        if fspec.is_set(SPARE_FRN) {
            return Err(Error::InvalidField("spare item"));
        }
        if (MAX_FRN + 1..=fspec.capacity()).any(|frn| fspec.is_set(frn)) {
            return Err(Error::InvalidField("unknown item"));
        }

        let mut record = Self::default();
        if fspec.is_set(1) {
            record.data_source = Some(DataSource::decode(reader)?);
        }
        if fspec.is_set(2) {
            record.message_type = Some(reader.u8()?.into());
        }
        if fspec.is_set(3) {
            record.sector_number = Some(reader.u8()?);
        }
        if fspec.is_set(4) {
            record.time_of_day = Some(reader.u24_be()?);
        }
        if fspec.is_set(5) {
            record.antenna_rotation_period = Some(reader.u16_be()?);
        }
        if fspec.is_set(6) {
            record.station_configuration = Some(extended(reader)?);
        }
        if fspec.is_set(7) {
            record.station_processing_mode = Some(extended(reader)?);
        }
        if fspec.is_set(8) {
            record.plot_counts = Some(repetitive_u16(reader)?);
        }
        if fspec.is_set(9) {
            record.dynamic_window = Some(PolarWindow::decode(reader)?);
        }
        if fspec.is_set(10) {
            record.collimation_error = Some(CollimationError::decode(reader)?);
        }
        if fspec.is_set(11) {
            record.warnings = Some(extended(reader)?);
        }
        if fspec.is_set(13) {
            record.special_purpose = Some(explicit(reader)?);
        }
        if fspec.is_set(14) {
            record.reserved_expansion = Some(explicit(reader)?);
        }
        Ok(record)
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        Fspec::from_frns(&self.frns()).encode(writer);

        if let Some(data_source) = &self.data_source {
            data_source.encode(writer);
        }
        if let Some(message_type) = self.message_type {
            writer.u8(message_type.into());
        }
        if let Some(sector) = self.sector_number {
            writer.u8(sector);
        }
        if let Some(time_of_day) = self.time_of_day {
            writer.u24_be(time_of_day)?;
        }
        if let Some(period) = self.antenna_rotation_period {
            writer.u16_be(period);
        }
        if let Some(octets) = &self.station_configuration {
            write_extended(writer, octets)?;
        }
        if let Some(octets) = &self.station_processing_mode {
            write_extended(writer, octets)?;
        }
        if let Some(counts) = &self.plot_counts {
            write_repetitive_u16(writer, counts)?;
        }
        if let Some(window) = &self.dynamic_window {
            window.encode(writer);
        }
        if let Some(error) = &self.collimation_error {
            error.encode(writer);
        }
        if let Some(octets) = &self.warnings {
            write_extended(writer, octets)?;
        }
        if let Some(content) = &self.special_purpose {
            write_explicit(writer, content)?;
        }
        if let Some(content) = &self.reserved_expansion {
            write_explicit(writer, content)?;
        }
        Ok(())
    }
}

/// CAT002: monoradar service messages. One data block may carry several records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cat002 {
    pub records: Vec<Cat002Record>,
}

impl Cat002 {
    pub const CATEGORY: u8 = 2;
}

impl Body for Cat002 {
    fn name(&self) -> &'static str {
        "CAT002"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::CATEGORY as u32)
    }
}

impl BytePayload for Cat002 {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.records.clear();
        while !reader.is_empty() {
            self.records.push(Cat002Record::decode(reader)?);
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn north_marker() {
        // FSPEC 0xf0: data source, message type, sector, time of day
        let bytes = [0xf0, 0x19, 0xc9, 0x01, 0x00, 0x35, 0x6d, 0x80];
        let mut reader = ByteReader::new(&bytes);
        let record = Cat002Record::decode(&mut reader).unwrap();
        assert!(reader.is_empty());

        assert_eq!(record.data_source, Some(DataSource { sac: 25, sic: 201 }));
        assert_eq!(record.message_type, Some(MonoradarMessage::NorthMarker));
        assert_eq!(record.sector_number, Some(0));
        assert_eq!(
            record.time_of_day(),
            Some(Unit::Second * 27355)
        );

        let mut writer = ByteWriter::new();
        record.encode(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), bytes);
    }

    #[test]
    fn spare_item() {
        let bytes = [0x01, 0x08];
        assert_eq!(
            Cat002Record::decode(&mut ByteReader::new(&bytes)),
            Err(Error::InvalidField("spare item"))
        );
    }
}
