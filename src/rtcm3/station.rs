use nalgebra::Vector3;

use crate::{
    codec::{BitReader, BitWriter},
    error::Error,
    message::{BitPayload, Body, MessageId},
};

/// ECEF coordinates and antenna height resolution (m)
const RESOLUTION_M: f64 = 0.0001;

fn to_raw(value_m: f64) -> i64 {
    (value_m / RESOLUTION_M).round() as i64
}

/// Stationary reference station antenna reference point,
/// messages 1005 and 1006 (1006 adds the antenna height).
#[derive(Debug, Clone, PartialEq)]
pub struct StationArp {
    /// 1005 or 1006
    pub number: u16,
    pub station_id: u16,
    /// ITRF realization year
    pub itrf_year: u8,
    pub gps: bool,
    pub glonass: bool,
    pub galileo: bool,
    /// Physical (false) or non physical computed reference station
    pub reference_station: bool,
    /// ARP ECEF coordinates (m)
    pub ecef_m: Vector3<f64>,
    /// All raw measurements come from one receiver oscillator
    pub single_oscillator: bool,
    pub quarter_cycle: u8,
    /// Antenna height above the marker (m), 1006 only
    pub antenna_height_m: Option<f64>,
}

impl StationArp {
    pub fn new(number: u16) -> Self {
        Self {
            number,
            station_id: 0,
            itrf_year: 0,
            gps: false,
            glonass: false,
            galileo: false,
            reference_station: false,
            ecef_m: Vector3::zeros(),
            single_oscillator: false,
            quarter_cycle: 0,
            antenna_height_m: if number == 1006 { Some(0.0) } else { None },
        }
    }
}

impl Body for StationArp {
    fn name(&self) -> &'static str {
        if self.number == 1006 {
            "Station ARP and antenna height"
        } else {
            "Station ARP"
        }
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(self.number as u32)
    }
}

impl BitPayload for StationArp {
    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> Result<(), Error> {
        if reader.read_u16(12)? != self.number {
            return Err(Error::InvalidField("message number"));
        }
        self.station_id = reader.read_u16(12)?;
        self.itrf_year = reader.read_u8(6)?;
        self.gps = reader.read_bool()?;
        self.glonass = reader.read_bool()?;
        self.galileo = reader.read_bool()?;
        self.reference_station = reader.read_bool()?;
        let x = reader.read_i64(38)?;
        self.single_oscillator = reader.read_bool()?;
        reader.skip(1)?;
        let y = reader.read_i64(38)?;
        self.quarter_cycle = reader.read_u8(2)?;
        let z = reader.read_i64(38)?;

        self.ecef_m = Vector3::new(x as f64, y as f64, z as f64) * RESOLUTION_M;

        if self.number == 1006 {
            self.antenna_height_m = Some(reader.read_u16(16)? as f64 * RESOLUTION_M);
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut BitWriter) -> Result<(), Error> {
        writer.write_u32(12, self.number as u32)?;
        writer.write_u32(12, self.station_id as u32)?;
        writer.write_u32(6, self.itrf_year as u32)?;
        writer.write_bool(self.gps)?;
        writer.write_bool(self.glonass)?;
        writer.write_bool(self.galileo)?;
        writer.write_bool(self.reference_station)?;
        writer.write_i64(38, to_raw(self.ecef_m[0]))?;
        writer.write_bool(self.single_oscillator)?;
        writer.write_bool(false)?;
        writer.write_i64(38, to_raw(self.ecef_m[1]))?;
        writer.write_u32(2, self.quarter_cycle as u32)?;
        writer.write_i64(38, to_raw(self.ecef_m[2]))?;

        if self.number == 1006 {
            let height = to_raw(self.antenna_height_m.unwrap_or_default());
            let height = u32::try_from(height).map_err(|_| Error::ValueOutOfRange { width: 16 })?;
            writer.write_u32(16, height)?;
        }
        Ok(())
    }
}
