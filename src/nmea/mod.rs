//! NMEA-0183 sentences
//!
//! Sentences are registered under their formatter ("GBS"), whatever the talker.
use crate::{
    checksum::{Checksum, NmeaXor},
    codec::FieldWriter,
    error::Error,
    message::SentencePayload,
    registry::Registry,
};

mod gbs;
mod gst;
mod zda;

pub use gbs::Gbs;
pub use gst::Gst;
pub use zda::Zda;

/// Interprets a single hexadecimal digit field (NMEA 4.10 system and signal ids)
pub(crate) fn hex_field(field: &str) -> Result<Option<u8>, Error> {
    if field.is_empty() {
        return Ok(None);
    }
    u8::from_str_radix(field, 16)
        .map(Some)
        .map_err(|_| Error::InvalidField("hexadecimal digit"))
}

/// GBS and ZDA
pub fn default_set() -> Registry<String, dyn SentencePayload> {
    let mut registry = Registry::<String, dyn SentencePayload>::new();
    registry.register("GBS".to_string(), || Box::new(Gbs::default()));
    registry.register("ZDA".to_string(), || Box::new(Zda::default()));
    registry
}

/// [default_set] plus GST
pub fn extended_set() -> Registry<String, dyn SentencePayload> {
    let mut extension = Registry::<String, dyn SentencePayload>::new();
    extension.register("GST".to_string(), || Box::new(Gst::default()));

    let mut registry = default_set();
    registry.extend(extension);
    registry
}

/// Encodes a complete `$` sentence, checksum and CR LF included.
/// `talker` is the 2 character talker identifier ("GP", "GN"..).
pub fn encode(talker: &str, payload: &dyn SentencePayload) -> Result<Vec<u8>, Error> {
    if talker.len() != 2 || !talker.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(Error::InvalidField("talker"));
    }

    let mut writer = FieldWriter::new();
    writer.field(&format!("{}{}", talker, payload.formatter()));
    payload.serialize(&mut writer)?;
    let content = writer.into_string();

    let checksum = NmeaXor::render(NmeaXor::compute(content.as_bytes()));

    let mut sentence = Vec::with_capacity(content.len() + 6);
    sentence.push(b'$');
    sentence.extend_from_slice(content.as_bytes());
    sentence.push(b'*');
    sentence.extend_from_slice(&checksum);
    sentence.extend_from_slice(b"\r\n");
    Ok(sentence)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_talker() {
        assert_eq!(
            encode("gp", &Zda::default()),
            Err(Error::InvalidField("talker"))
        );
        assert_eq!(
            encode("GPS", &Zda::default()),
            Err(Error::InvalidField("talker"))
        );
    }

    #[test]
    fn hex_fields() {
        assert_eq!(hex_field(""), Ok(None));
        assert_eq!(hex_field("A"), Ok(Some(10)));
        assert!(hex_field("G").is_err());
    }
}
