//! Comma separated sentence fields
use hifitime::Duration;

use crate::error::Error;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

/// Cursor over the comma separated fields of a sentence.
/// Empty fields are valid and decode to `None`.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    fields: Vec<&'a str>,
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            fields: content.split(',').collect(),
            pos: 0,
        }
    }

    /// Total number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields consumed so far
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.fields.len() - self.pos
    }

    pub fn next_field(&mut self) -> Result<&'a str, Error> {
        let field = self
            .fields
            .get(self.pos)
            .ok_or(Error::InvalidField("missing field"))?;
        self.pos += 1;
        Ok(field)
    }

    fn parse<T: std::str::FromStr>(&mut self, what: &'static str) -> Result<Option<T>, Error> {
        let field = self.next_field()?;
        if field.is_empty() {
            return Ok(None);
        }
        field.parse::<T>().map(Some).map_err(|_| Error::InvalidField(what))
    }

    pub fn f64(&mut self) -> Result<Option<f64>, Error> {
        self.parse("decimal number")
    }

    pub fn u32(&mut self) -> Result<Option<u32>, Error> {
        self.parse("unsigned integer")
    }

    pub fn u8(&mut self) -> Result<Option<u8>, Error> {
        self.parse("unsigned integer")
    }

    pub fn i8(&mut self) -> Result<Option<i8>, Error> {
        self.parse("signed integer")
    }

    /// `hhmmss[.s+]` time of day
    pub fn time(&mut self) -> Result<Option<Duration>, Error> {
        let field = self.next_field()?;
        if field.is_empty() {
            return Ok(None);
        }
        parse_time_of_day(field).map(Some)
    }
}

fn parse_time_of_day(field: &str) -> Result<Duration, Error> {
    const INVALID: Error = Error::InvalidField("time of day");

    let (hms, fraction) = match field.split_once('.') {
        Some((hms, fraction)) => (hms, fraction),
        None => (field, ""),
    };

    if hms.len() != 6 || !hms.bytes().all(|b| b.is_ascii_digit()) {
        return Err(INVALID);
    }
    if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(INVALID);
    }

    let hours = hms[0..2].parse::<i128>().map_err(|_| INVALID)?;
    let minutes = hms[2..4].parse::<i128>().map_err(|_| INVALID)?;
    let seconds = hms[4..6].parse::<i128>().map_err(|_| INVALID)?;

    if hours > 23 || minutes > 59 || seconds > 60 {
        return Err(INVALID);
    }

    let mut nanos = 0i128;
    for (i, digit) in fraction.bytes().enumerate() {
        nanos += (digit - b'0') as i128 * 10i128.pow(8 - i as u32);
    }

    let total = ((hours * 60 + minutes) * 60 + seconds) * NANOS_PER_SECOND + nanos;
    Ok(Duration::from_total_nanoseconds(total))
}

/// Sentence fields builder
#[derive(Debug, Clone, Default)]
pub struct FieldWriter {
    fields: Vec<String>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, value: &str) {
        self.fields.push(value.to_string());
    }

    pub fn empty(&mut self) {
        self.fields.push(String::new());
    }

    /// Decimal number with fixed number of decimals
    pub fn f64(&mut self, value: Option<f64>, decimals: usize) {
        match value {
            Some(value) => self.fields.push(format!("{:.*}", decimals, value)),
            None => self.empty(),
        }
    }

    /// Integer, zero padded to `digits`
    pub fn uint(&mut self, value: Option<u32>, digits: usize) {
        match value {
            Some(value) => self.fields.push(format!("{:0width$}", value, width = digits)),
            None => self.empty(),
        }
    }

    /// Signed integer, zero padded to `digits` (sign excluded)
    pub fn int(&mut self, value: Option<i32>, digits: usize) {
        match value {
            Some(value) if value < 0 => {
                self.fields
                    .push(format!("-{:0width$}", value.unsigned_abs(), width = digits))
            },
            Some(value) => self.fields.push(format!("{:0width$}", value, width = digits)),
            None => self.empty(),
        }
    }

    /// `hhmmss.sss` time of day
    pub fn time(&mut self, value: Option<Duration>) -> Result<(), Error> {
        let Some(value) = value else {
            self.empty();
            return Ok(());
        };

        let nanos = value.total_nanoseconds();
        if nanos < 0 {
            return Err(Error::InvalidField("negative time of day"));
        }

        let millis = (nanos + NANOS_PER_MILLI / 2) / NANOS_PER_MILLI;
        let (hours, rem) = (millis / 3_600_000, millis % 3_600_000);
        let (minutes, rem) = (rem / 60_000, rem % 60_000);
        let (seconds, millis) = (rem / 1000, rem % 1000);

        if hours > 23 {
            return Err(Error::InvalidField("time of day"));
        }

        self.fields.push(format!(
            "{:02}{:02}{:02}.{:03}",
            hours, minutes, seconds, millis
        ));
        Ok(())
    }

    /// Removes trailing empty fields
    pub fn trim_trailing_empty(&mut self, keep: usize) {
        while self.fields.len() > keep && self.fields.last().is_some_and(|f| f.is_empty()) {
            self.fields.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_string(self) -> String {
        self.fields.join(",")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::Unit;

    #[test]
    fn time_of_day() {
        let mut reader = FieldReader::new("015509.00,235959,,12");
        assert_eq!(
            reader.time(),
            Ok(Some(
                Unit::Hour * 1 + Unit::Minute * 55 + Unit::Second * 9
            ))
        );
        assert_eq!(
            reader.time(),
            Ok(Some(
                Unit::Hour * 23 + Unit::Minute * 59 + Unit::Second * 59
            ))
        );
        assert_eq!(reader.time(), Ok(None));
        assert_eq!(reader.time(), Err(Error::InvalidField("time of day")));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn time_formatting() {
        let mut writer = FieldWriter::new();
        writer
            .time(Some(
                Unit::Hour * 1 + Unit::Minute * 55 + Unit::Second * 9 + Unit::Millisecond * 900,
            ))
            .unwrap();
        writer.time(None).unwrap();
        writer.f64(Some(-0.0314), 3);
        writer.uint(Some(7), 2);
        writer.int(Some(-5), 2);
        assert_eq!(writer.into_string(), "015509.900,,-0.031,07,-05");
    }

    #[test]
    fn trailing_empty_fields() {
        let mut writer = FieldWriter::new();
        writer.field("a");
        writer.empty();
        writer.empty();
        writer.trim_trailing_empty(2);
        assert_eq!(writer.len(), 2);
    }
}
