//! Byte aligned payload access
use crate::error::Error;

/// Bounds checked cursor over byte aligned payloads.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Grabs the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.remaining() {
            return Err(Error::Truncated {
                needed: (len - self.remaining()) * 8,
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn i8(&mut self) -> Result<i8, Error> {
        Ok(self.u8()? as i8)
    }

    pub fn u16_le(&mut self) -> Result<u16, Error> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub fn u16_be(&mut self) -> Result<u16, Error> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// 24 bit big endian (ASTERIX time of day)
    pub fn u24_be(&mut self) -> Result<u32, Error> {
        let [b0, b1, b2] = self.array::<3>()?;
        Ok(u32::from_be_bytes([0, b0, b1, b2]))
    }

    pub fn u32_le(&mut self) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub fn i32_le(&mut self) -> Result<i32, Error> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    pub fn i16_be(&mut self) -> Result<i16, Error> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    pub fn f64_le(&mut self) -> Result<f64, Error> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    /// Fixed size, zero padded character field.
    pub fn string(&mut self, len: usize) -> Result<String, Error> {
        let raw = self.take(len)?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        Ok(raw[..end].iter().map(|b| char::from(*b)).collect())
    }
}

/// Growable byte aligned payload writer.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    pub fn u16_le(&mut self, value: u16) {
        self.bytes(&value.to_le_bytes());
    }

    pub fn u16_be(&mut self, value: u16) {
        self.bytes(&value.to_be_bytes());
    }

    pub fn u24_be(&mut self, value: u32) -> Result<(), Error> {
        if value > 0xff_ffff {
            return Err(Error::ValueOutOfRange { width: 24 });
        }
        self.bytes(&value.to_be_bytes()[1..]);
        Ok(())
    }

    pub fn u32_le(&mut self, value: u32) {
        self.bytes(&value.to_le_bytes());
    }

    pub fn i32_le(&mut self, value: i32) {
        self.bytes(&value.to_le_bytes());
    }

    pub fn i16_be(&mut self, value: i16) {
        self.bytes(&value.to_be_bytes());
    }

    pub fn f64_le(&mut self, value: f64) {
        self.bytes(&value.to_le_bytes());
    }

    /// Fixed size character field, zero padded.
    pub fn string(&mut self, value: &str, len: usize) -> Result<(), Error> {
        let raw = value.as_bytes();
        if raw.len() > len {
            return Err(Error::ValueOutOfRange { width: len * 8 });
        }
        self.bytes(raw);
        self.buf.resize(self.buf.len() + len - raw.len(), 0);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
