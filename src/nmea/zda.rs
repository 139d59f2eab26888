use hifitime::Duration;

use crate::{
    codec::{FieldReader, FieldWriter},
    error::Error,
    message::{Body, MessageId, SentencePayload},
};

/// ZDA: UTC time and date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Zda {
    pub time_utc: Option<Duration>,
    pub day: Option<u8>,
    pub month: Option<u8>,
    pub year: Option<u32>,
    /// Local zone hours offset
    pub local_zone_hours: Option<i8>,
    /// Local zone minutes offset
    pub local_zone_minutes: Option<u8>,
}

impl Body for Zda {
    fn name(&self) -> &'static str {
        "ZDA"
    }

    fn id(&self) -> MessageId {
        MessageId::Text("ZDA".to_string())
    }
}

impl SentencePayload for Zda {
    fn formatter(&self) -> &'static str {
        "ZDA"
    }

    fn deserialize(&mut self, reader: &mut FieldReader<'_>) -> Result<(), Error> {
        self.time_utc = reader.time()?;
        self.day = reader.u8()?;
        self.month = reader.u8()?;
        self.year = reader.u32()?;
        self.local_zone_hours = reader.i8()?;
        self.local_zone_minutes = reader.u8()?;
        Ok(())
    }

    fn serialize(&self, writer: &mut FieldWriter) -> Result<(), Error> {
        writer.time(self.time_utc)?;
        writer.uint(self.day.map(u32::from), 2);
        writer.uint(self.month.map(u32::from), 2);
        writer.uint(self.year, 4);
        writer.int(self.local_zone_hours.map(i32::from), 2);
        writer.uint(self.local_zone_minutes.map(u32::from), 2);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::Unit;

    #[test]
    fn zda() {
        let mut reader = FieldReader::new("160012.71,11,03,2004,-1,00");
        let mut zda = Zda::default();
        zda.deserialize(&mut reader).unwrap();
        assert_eq!(
            zda.time_utc,
            Some(Unit::Hour * 16 + Unit::Second * 12 + Unit::Millisecond * 710)
        );
        assert_eq!(zda.day, Some(11));
        assert_eq!(zda.month, Some(3));
        assert_eq!(zda.year, Some(2004));
        assert_eq!(zda.local_zone_hours, Some(-1));
        assert_eq!(zda.local_zone_minutes, Some(0));

        let mut writer = FieldWriter::new();
        zda.serialize(&mut writer).unwrap();
        assert_eq!(writer.into_string(), "160012.710,11,03,2004,-01,00");
    }
}
