use hifitime::Duration;

use crate::{
    codec::{FieldReader, FieldWriter},
    error::Error,
    message::{Body, MessageId, SentencePayload},
};

/// GST: pseudorange error statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gst {
    pub time_utc: Option<Duration>,
    /// RMS of the pseudorange residuals (m)
    pub rms_m: Option<f64>,
    /// Error ellipse semi-major axis standard deviation (m)
    pub semi_major_std_m: Option<f64>,
    /// Error ellipse semi-minor axis standard deviation (m)
    pub semi_minor_std_m: Option<f64>,
    /// Error ellipse orientation (degrees from true north)
    pub orientation_deg: Option<f64>,
    pub latitude_std_m: Option<f64>,
    pub longitude_std_m: Option<f64>,
    pub altitude_std_m: Option<f64>,
}

impl Body for Gst {
    fn name(&self) -> &'static str {
        "GST"
    }

    fn id(&self) -> MessageId {
        MessageId::Text("GST".to_string())
    }
}

impl SentencePayload for Gst {
    fn formatter(&self) -> &'static str {
        "GST"
    }

    fn deserialize(&mut self, reader: &mut FieldReader<'_>) -> Result<(), Error> {
        self.time_utc = reader.time()?;
        self.rms_m = reader.f64()?;
        self.semi_major_std_m = reader.f64()?;
        self.semi_minor_std_m = reader.f64()?;
        self.orientation_deg = reader.f64()?;
        self.latitude_std_m = reader.f64()?;
        self.longitude_std_m = reader.f64()?;
        self.altitude_std_m = reader.f64()?;
        Ok(())
    }

    fn serialize(&self, writer: &mut FieldWriter) -> Result<(), Error> {
        writer.time(self.time_utc)?;
        writer.f64(self.rms_m, 3);
        writer.f64(self.semi_major_std_m, 3);
        writer.f64(self.semi_minor_std_m, 3);
        writer.f64(self.orientation_deg, 1);
        writer.f64(self.latitude_std_m, 3);
        writer.f64(self.longitude_std_m, 3);
        writer.f64(self.altitude_std_m, 3);
        Ok(())
    }
}
