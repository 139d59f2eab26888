use hifitime::{Duration, Unit};

use crate::{
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
    ubx::{message_id, CLASS_NAV},
};

/// NAV-CLOCK: receiver clock solution
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavClock {
    /// GPS time of week of the navigation epoch (ms)
    pub itow_ms: u32,
    /// Clock bias (ns)
    pub bias_ns: i32,
    /// Clock drift (ns/s)
    pub drift_ns_s: i32,
    /// Time accuracy estimate (ns)
    pub time_accuracy_ns: u32,
    /// Frequency accuracy estimate (ps/s)
    pub freq_accuracy_ps_s: u32,
}

impl NavClock {
    pub const ID: u32 = message_id(CLASS_NAV, 0x22);

    pub fn time_of_week(&self) -> Duration {
        Unit::Millisecond * self.itow_ms as i64
    }

    pub fn bias(&self) -> Duration {
        Unit::Nanosecond * self.bias_ns as i64
    }
}

impl Body for NavClock {
    fn name(&self) -> &'static str {
        "NAV-CLOCK"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::ID)
    }
}

impl BytePayload for NavClock {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.itow_ms = reader.u32_le()?;
        self.bias_ns = reader.i32_le()?;
        self.drift_ns_s = reader.i32_le()?;
        self.time_accuracy_ns = reader.u32_le()?;
        self.freq_accuracy_ps_s = reader.u32_le()?;
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        writer.u32_le(self.itow_ms);
        writer.i32_le(self.bias_ns);
        writer.i32_le(self.drift_ns_s);
        writer.u32_le(self.time_accuracy_ns);
        writer.u32_le(self.freq_accuracy_ps_s);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nav_clock() {
        let payload = [
            0x18, 0x2d, 0x0f, 0x1b, // 453_979_416 ms
            0x9c, 0xff, 0xff, 0xff, // -100 ns
            0x05, 0x00, 0x00, 0x00, // 5 ns/s
            0x10, 0x00, 0x00, 0x00, // 16 ns
            0xe8, 0x03, 0x00, 0x00, // 1000 ps/s
        ];

        let mut clock = NavClock::default();
        let mut reader = ByteReader::new(&payload);
        clock.deserialize(&mut reader).unwrap();
        assert!(reader.is_empty());

        assert_eq!(clock.itow_ms, 453_979_416);
        assert_eq!(clock.bias(), Unit::Nanosecond * -100);
        assert_eq!(clock.drift_ns_s, 5);
        assert_eq!(clock.time_accuracy_ns, 16);
        assert_eq!(clock.freq_accuracy_ps_s, 1000);

        let mut writer = ByteWriter::new();
        clock.serialize(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), payload);
    }
}
