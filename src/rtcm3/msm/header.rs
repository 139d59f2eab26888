use hifitime::{Duration, Unit};

use crate::{
    codec::{BitReader, BitWriter},
    constants::BDT_GPST_OFFSET_S,
    error::Error,
    prelude::Constellation,
    rtcm3::msm::MsmMask,
};

const MS_PER_WEEK: i64 = 604_800_000;

/// MSM header, common to MSM1..7
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsmHeader {
    /// Reference station ID
    pub station_id: u16,
    /// Raw 30 bit epoch, see [MsmEpoch]
    pub epoch: u32,
    /// More MSM messages follow for this epoch
    pub multiple_message: bool,
    /// Issue of data station
    pub iods: u8,
    /// Session transmit time (7 bits)
    pub session_time: u8,
    /// Clock steering indicator
    pub clock_steering: u8,
    /// External clock indicator
    pub external_clock: u8,
    /// Divergence free smoothing indicator
    pub divergence_free: bool,
    /// Smoothing interval indicator
    pub smoothing_interval: u8,
    /// Satellite, signal and cell masks
    pub mask: MsmMask,
}

/// MSM epoch, as interpreted per constellation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MsmEpoch {
    /// GPS time of week. BeiDou epochs are converted to GPS time.
    TimeOfWeek(Duration),
    /// Glonass day of week (0 = sunday, 7 = unknown) and time of day
    Glonass {
        day_of_week: u8,
        time_of_day: Duration,
    },
}

impl MsmHeader {
    /// Interprets the raw epoch for this [Constellation]
    pub fn epoch(&self, constellation: Constellation) -> MsmEpoch {
        match constellation {
            Constellation::Glonass => MsmEpoch::Glonass {
                day_of_week: (self.epoch >> 27) as u8,
                time_of_day: Duration::from_milliseconds((self.epoch & 0x07ff_ffff) as f64),
            },
            Constellation::BeiDou => {
                let ms = (self.epoch as i64 + BDT_GPST_OFFSET_S * 1000) % MS_PER_WEEK;
                MsmEpoch::TimeOfWeek(Unit::Millisecond * ms)
            },
            _ => MsmEpoch::TimeOfWeek(Duration::from_milliseconds(self.epoch as f64)),
        }
    }

    /// Decodes the header, message number excluded
    pub(crate) fn decode(reader: &mut BitReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            station_id: reader.read_u16(12)?,
            epoch: reader.read_u32(30)?,
            multiple_message: reader.read_bool()?,
            iods: reader.read_u8(3)?,
            session_time: reader.read_u8(7)?,
            clock_steering: reader.read_u8(2)?,
            external_clock: reader.read_u8(2)?,
            divergence_free: reader.read_bool()?,
            smoothing_interval: reader.read_u8(3)?,
            mask: MsmMask::decode(reader)?,
        })
    }

    pub(crate) fn encode(&self, writer: &mut BitWriter) -> Result<(), Error> {
        writer.write_u32(12, self.station_id as u32)?;
        writer.write_u32(30, self.epoch)?;
        writer.write_bool(self.multiple_message)?;
        writer.write_u32(3, self.iods as u32)?;
        writer.write_u32(7, self.session_time as u32)?;
        writer.write_u32(2, self.clock_steering as u32)?;
        writer.write_u32(2, self.external_clock as u32)?;
        writer.write_bool(self.divergence_free)?;
        writer.write_u32(3, self.smoothing_interval as u32)?;
        self.mask.encode(writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn epochs() {
        let header = MsmHeader {
            epoch: (2 << 27) | 3_600_000,
            ..Default::default()
        };
        assert_eq!(
            header.epoch(Constellation::Glonass),
            MsmEpoch::Glonass {
                day_of_week: 2,
                time_of_day: Unit::Hour * 1,
            }
        );

        let header = MsmHeader {
            epoch: 604_790_000,
            ..Default::default()
        };
        assert_eq!(
            header.epoch(Constellation::BeiDou),
            MsmEpoch::TimeOfWeek(Unit::Second * 4)
        );
        assert_eq!(
            header.epoch(Constellation::GPS),
            MsmEpoch::TimeOfWeek(Unit::Second * 604_790)
        );
    }
}
