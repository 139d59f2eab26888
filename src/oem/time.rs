use crate::{
    codec::{ByteReader, ByteWriter},
    error::Error,
    message::{BytePayload, Body, MessageId},
};

/// Receiver clock model status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockStatus {
    #[default]
    Valid,
    Converging,
    Iterating,
    Invalid,
    Other(u32),
}

impl From<u32> for ClockStatus {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Valid,
            1 => Self::Converging,
            2 => Self::Iterating,
            3 => Self::Invalid,
            other => Self::Other(other),
        }
    }
}

impl From<ClockStatus> for u32 {
    fn from(status: ClockStatus) -> u32 {
        match status {
            ClockStatus::Valid => 0,
            ClockStatus::Converging => 1,
            ClockStatus::Iterating => 2,
            ClockStatus::Invalid => 3,
            ClockStatus::Other(other) => other,
        }
    }
}

/// UTC parameters status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UtcStatus {
    #[default]
    Invalid,
    Valid,
    Warning,
    Other(u32),
}

impl From<u32> for UtcStatus {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Invalid,
            1 => Self::Valid,
            2 => Self::Warning,
            other => Self::Other(other),
        }
    }
}

impl From<UtcStatus> for u32 {
    fn from(status: UtcStatus) -> u32 {
        match status {
            UtcStatus::Invalid => 0,
            UtcStatus::Valid => 1,
            UtcStatus::Warning => 2,
            UtcStatus::Other(other) => other,
        }
    }
}

/// TIME: receiver time and UTC offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    pub clock_status: ClockStatus,
    /// Receiver clock offset to GPS time (s)
    pub offset_s: f64,
    /// Offset standard deviation (s)
    pub offset_std_s: f64,
    /// GPS - UTC offset (s)
    pub utc_offset_s: f64,
    pub utc_year: u32,
    pub utc_month: u8,
    pub utc_day: u8,
    pub utc_hour: u8,
    pub utc_minute: u8,
    /// Milliseconds within the minute
    pub utc_ms: u32,
    pub utc_status: UtcStatus,
}

impl Time {
    pub const ID: u32 = 101;
}

impl Body for Time {
    fn name(&self) -> &'static str {
        "TIME"
    }

    fn id(&self) -> MessageId {
        MessageId::Numeric(Self::ID)
    }
}

impl BytePayload for Time {
    fn deserialize(&mut self, reader: &mut ByteReader<'_>) -> Result<(), Error> {
        self.clock_status = reader.u32_le()?.into();
        self.offset_s = reader.f64_le()?;
        self.offset_std_s = reader.f64_le()?;
        self.utc_offset_s = reader.f64_le()?;
        self.utc_year = reader.u32_le()?;
        self.utc_month = reader.u8()?;
        self.utc_day = reader.u8()?;
        self.utc_hour = reader.u8()?;
        self.utc_minute = reader.u8()?;
        self.utc_ms = reader.u32_le()?;
        self.utc_status = reader.u32_le()?.into();
        Ok(())
    }

    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), Error> {
        writer.u32_le(self.clock_status.into());
        writer.f64_le(self.offset_s);
        writer.f64_le(self.offset_std_s);
        writer.f64_le(self.utc_offset_s);
        writer.u32_le(self.utc_year);
        writer.u8(self.utc_month);
        writer.u8(self.utc_day);
        writer.u8(self.utc_hour);
        writer.u8(self.utc_minute);
        writer.u32_le(self.utc_ms);
        writer.u32_le(self.utc_status.into());
        Ok(())
    }
}
