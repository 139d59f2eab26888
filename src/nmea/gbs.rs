use hifitime::Duration;

use crate::{
    codec::{FieldReader, FieldWriter},
    error::Error,
    message::{Body, MessageId, SentencePayload},
    nmea::hex_field,
};

/// GBS: GNSS satellite fault detection (RAIM)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gbs {
    /// UTC time of the associated position fix
    pub time_utc: Option<Duration>,
    /// Expected latitude error (m)
    pub latitude_error_m: Option<f64>,
    /// Expected longitude error (m)
    pub longitude_error_m: Option<f64>,
    /// Expected altitude error (m)
    pub altitude_error_m: Option<f64>,
    /// Most likely failed satellite
    pub failed_satellite: Option<u8>,
    /// Probability of missed detection for the failed satellite
    pub missed_detection_probability: Option<f64>,
    /// Estimated bias on the failed satellite (m)
    pub bias_estimate_m: Option<f64>,
    /// Standard deviation of the bias estimate (m)
    pub bias_estimate_std_m: Option<f64>,
    /// NMEA 4.10 system id
    pub system_id: Option<u8>,
    /// NMEA 4.10 signal id
    pub signal_id: Option<u8>,
}

impl Body for Gbs {
    fn name(&self) -> &'static str {
        "GBS"
    }

    fn id(&self) -> MessageId {
        MessageId::Text("GBS".to_string())
    }
}

impl SentencePayload for Gbs {
    fn formatter(&self) -> &'static str {
        "GBS"
    }

    fn deserialize(&mut self, reader: &mut FieldReader<'_>) -> Result<(), Error> {
        self.time_utc = reader.time()?;
        self.latitude_error_m = reader.f64()?;
        self.longitude_error_m = reader.f64()?;
        self.altitude_error_m = reader.f64()?;
        self.failed_satellite = reader.u8()?;
        self.missed_detection_probability = reader.f64()?;
        self.bias_estimate_m = reader.f64()?;
        self.bias_estimate_std_m = reader.f64()?;

        if reader.remaining() >= 2 {
            self.system_id = hex_field(reader.next_field()?)?;
            self.signal_id = hex_field(reader.next_field()?)?;
        }
        Ok(())
    }

    fn serialize(&self, writer: &mut FieldWriter) -> Result<(), Error> {
        writer.time(self.time_utc)?;
        writer.f64(self.latitude_error_m, 3);
        writer.f64(self.longitude_error_m, 3);
        writer.f64(self.altitude_error_m, 3);
        writer.uint(self.failed_satellite.map(u32::from), 2);
        writer.f64(self.missed_detection_probability, 3);
        writer.f64(self.bias_estimate_m, 3);
        writer.f64(self.bias_estimate_std_m, 3);

        if self.system_id.is_some() || self.signal_id.is_some() {
            match self.system_id {
                Some(id) => writer.field(&format!("{:X}", id)),
                None => writer.empty(),
            }
            match self.signal_id {
                Some(id) => writer.field(&format!("{:X}", id)),
                None => writer.empty(),
            }
        }
        Ok(())
    }
}
