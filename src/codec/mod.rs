//! Field level codecs: bit packed (RTCM), byte aligned (UBX, OEM, ASTERIX)
//! and comma separated (NMEA) payloads.
mod bits;
mod bytes;
mod fields;

pub use bits::{get_signed, get_unsigned, set_signed, set_unsigned, BitReader, BitWriter};
pub use bytes::{ByteReader, ByteWriter};
pub use fields::{FieldReader, FieldWriter};
