//! MSB first bit field access
use crate::error::Error;

/// Reads a `width` bits (1..=32) unsigned integer located at `offset` bits
/// from the start of `buf`, most significant bit first, and advances `offset`.
/// The caller guarantees `buf.len() * 8 >= offset + width`.
pub fn get_unsigned(buf: &[u8], offset: &mut usize, width: usize) -> u32 {
    debug_assert!((1..=32).contains(&width));
    let mut value = 0u64;
    let mut pos = *offset;
    let end = pos + width;

    // leading partial byte
    while pos < end && pos % 8 != 0 {
        value = (value << 1) | ((buf[pos / 8] >> (7 - pos % 8)) & 0x01) as u64;
        pos += 1;
    }
    // whole bytes
    while end - pos >= 8 {
        value = (value << 8) | buf[pos / 8] as u64;
        pos += 8;
    }
    // trailing partial byte
    while pos < end {
        value = (value << 1) | ((buf[pos / 8] >> (7 - pos % 8)) & 0x01) as u64;
        pos += 1;
    }

    *offset = end;
    value as u32
}

/// Two's complement counterpart of [get_unsigned].
pub fn get_signed(buf: &[u8], offset: &mut usize, width: usize) -> i32 {
    let raw = get_unsigned(buf, offset, width);
    if width == 32 {
        raw as i32
    } else {
        let shift = 32 - width;
        ((raw << shift) as i32) >> shift
    }
}

/// Writes the `width` (1..=32) least significant bits of `value` at `offset`, most
/// significant first, and advances `offset`. Other bits of `buf` are preserved.
/// The caller guarantees `buf.len() * 8 >= offset + width`.
pub fn set_unsigned(buf: &mut [u8], offset: &mut usize, width: usize, value: u32) {
    debug_assert!((1..=32).contains(&width));
    for i in 0..width {
        let pos = *offset + i;
        let mask = 0x80u8 >> (pos % 8);
        if (value >> (width - 1 - i)) & 0x01 != 0 {
            buf[pos / 8] |= mask;
        } else {
            buf[pos / 8] &= !mask;
        }
    }
    *offset += width;
}

/// Two's complement counterpart of [set_unsigned].
pub fn set_signed(buf: &mut [u8], offset: &mut usize, width: usize, value: i32) {
    set_unsigned(buf, offset, width, value as u32);
}

/// Bounds checked cursor over a bit packed payload.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Current position, in bits.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bits left to read.
    pub fn remaining(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.offset)
    }

    /// Bytes touched so far (trailing padding bits count as consumed).
    pub fn bytes_consumed(&self) -> usize {
        self.offset.div_ceil(8)
    }

    fn ensure(&self, width: usize) -> Result<(), Error> {
        let remaining = self.remaining();
        if width > remaining {
            Err(Error::Truncated {
                needed: width - remaining,
            })
        } else {
            Ok(())
        }
    }

    pub fn read_u32(&mut self, width: usize) -> Result<u32, Error> {
        self.ensure(width)?;
        Ok(get_unsigned(self.buf, &mut self.offset, width))
    }

    pub fn read_i32(&mut self, width: usize) -> Result<i32, Error> {
        self.ensure(width)?;
        Ok(get_signed(self.buf, &mut self.offset, width))
    }

    pub fn read_u8(&mut self, width: usize) -> Result<u8, Error> {
        debug_assert!(width <= 8);
        Ok(self.read_u32(width)? as u8)
    }

    pub fn read_u16(&mut self, width: usize) -> Result<u16, Error> {
        debug_assert!(width <= 16);
        Ok(self.read_u32(width)? as u16)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_u32(1)? == 1)
    }

    /// Reads fields wider than 32 bits (up to 64), as two consecutive reads.
    pub fn read_u64(&mut self, width: usize) -> Result<u64, Error> {
        if width <= 32 {
            return Ok(self.read_u32(width)? as u64);
        }
        self.ensure(width)?;
        let msb = get_unsigned(self.buf, &mut self.offset, width - 32) as u64;
        let lsb = get_unsigned(self.buf, &mut self.offset, 32) as u64;
        Ok((msb << 32) | lsb)
    }

    /// Signed counterpart of [Self::read_u64], used for 38 bit ECEF coordinates.
    pub fn read_i64(&mut self, width: usize) -> Result<i64, Error> {
        if width <= 32 {
            return Ok(self.read_i32(width)? as i64);
        }
        self.ensure(width)?;
        let msb = get_signed(self.buf, &mut self.offset, width - 32) as i64;
        let lsb = get_unsigned(self.buf, &mut self.offset, 32) as i64;
        Ok((msb << 32) | lsb)
    }

    /// Reads `len` 8 bit characters.
    pub fn read_string(&mut self, len: usize) -> Result<String, Error> {
        self.ensure(len * 8)?;
        let bytes = (0..len)
            .map(|_| get_unsigned(self.buf, &mut self.offset, 8) as u8)
            .collect::<Vec<_>>();
        Ok(bytes.into_iter().map(char::from).collect())
    }

    pub fn skip(&mut self, width: usize) -> Result<(), Error> {
        self.ensure(width)?;
        self.offset += width;
        Ok(())
    }
}

/// Growable bit packed payload writer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    offset: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    fn grow(&mut self, width: usize) {
        let needed = (self.offset + width).div_ceil(8);
        if needed > self.buf.len() {
            self.buf.resize(needed, 0);
        }
    }

    pub fn write_u32(&mut self, width: usize, value: u32) -> Result<(), Error> {
        if width < 32 && value >> width != 0 {
            return Err(Error::ValueOutOfRange { width });
        }
        self.grow(width);
        set_unsigned(&mut self.buf, &mut self.offset, width, value);
        Ok(())
    }

    pub fn write_i32(&mut self, width: usize, value: i32) -> Result<(), Error> {
        if width < 32 {
            let bound = 1i64 << (width - 1);
            if (value as i64) < -bound || (value as i64) >= bound {
                return Err(Error::ValueOutOfRange { width });
            }
        }
        self.grow(width);
        set_signed(&mut self.buf, &mut self.offset, width, value);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write_u32(1, value as u32)
    }

    pub fn write_u64(&mut self, width: usize, value: u64) -> Result<(), Error> {
        if width <= 32 {
            let value = u32::try_from(value).map_err(|_| Error::ValueOutOfRange { width })?;
            return self.write_u32(width, value);
        }
        if width < 64 && value >> width != 0 {
            return Err(Error::ValueOutOfRange { width });
        }
        self.write_u32(width - 32, (value >> 32) as u32)?;
        self.write_u32(32, value as u32)
    }

    pub fn write_i64(&mut self, width: usize, value: i64) -> Result<(), Error> {
        if width <= 32 {
            let value = i32::try_from(value).map_err(|_| Error::ValueOutOfRange { width })?;
            return self.write_i32(width, value);
        }
        let bound = 1i128 << (width - 1);
        if (value as i128) < -bound || (value as i128) >= bound {
            return Err(Error::ValueOutOfRange { width });
        }
        self.write_i32(width - 32, (value >> 32) as i32)?;
        self.write_u32(32, value as u32)
    }

    /// Writes 8 bit characters.
    pub fn write_str(&mut self, s: &str) -> Result<(), Error> {
        for c in s.chars() {
            let byte = u8::try_from(c as u32)
                .map_err(|_| Error::InvalidField("non latin-1 character"))?;
            self.write_u32(8, byte as u32)?;
        }
        Ok(())
    }

    /// Returns the payload, zero padded to the next byte boundary.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unaligned_unsigned() {
        let buf = [0b1010_1100, 0b0101_0011, 0xff];
        let mut offset = 2;
        assert_eq!(get_unsigned(&buf, &mut offset, 10), 0b10_1100_0101);
        assert_eq!(offset, 12);
        assert_eq!(get_unsigned(&buf, &mut offset, 12), 0b0011_1111_1111);
        assert_eq!(offset, 24);
    }

    #[test]
    fn sign_extension() {
        let buf = [0xff, 0xff, 0xff, 0xff];
        let mut offset = 0;
        assert_eq!(get_signed(&buf, &mut offset, 15), -1);
        assert_eq!(get_signed(&buf, &mut offset, 17), -1);

        let buf = [0x80, 0x00];
        let mut offset = 0;
        assert_eq!(get_signed(&buf, &mut offset, 15), -16384);
    }

    #[test]
    fn set_preserves_neighbours() {
        let mut buf = [0xff, 0xff];
        let mut offset = 3;
        set_unsigned(&mut buf, &mut offset, 6, 0);
        assert_eq!(buf, [0b1110_0000, 0b0111_1111]);
        assert_eq!(offset, 9);
    }

    #[test]
    fn reader_bounds() {
        let buf = [0x12, 0x34];
        let mut reader = BitReader::new(&buf);
        assert_eq!(reader.read_u32(12), Ok(0x123));
        assert_eq!(reader.read_u32(8), Err(Error::Truncated { needed: 4 }));
        assert_eq!(reader.read_u32(4), Ok(0x4));
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.bytes_consumed(), 2);
    }

    #[test]
    fn wide_fields() {
        let mut writer = BitWriter::new();
        writer.write_u32(3, 0b101).unwrap();
        writer.write_i64(38, -123_456_789_012).unwrap();
        writer.write_u64(64, 0x8000_0000_0000_0001).unwrap();
        writer.write_i64(38, 137_438_953_471).unwrap();

        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), (3 + 38 + 64 + 38usize).div_ceil(8));

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_u32(3), Ok(0b101));
        assert_eq!(reader.read_i64(38), Ok(-123_456_789_012));
        assert_eq!(reader.read_u64(64), Ok(0x8000_0000_0000_0001));
        assert_eq!(reader.read_i64(38), Ok(137_438_953_471));
    }

    #[test]
    fn writer_range_checks() {
        let mut writer = BitWriter::new();
        assert_eq!(
            writer.write_u32(4, 16),
            Err(Error::ValueOutOfRange { width: 4 })
        );
        assert_eq!(
            writer.write_i32(15, -16385),
            Err(Error::ValueOutOfRange { width: 15 })
        );
        assert!(writer.write_i32(15, -16384).is_ok());
        assert!(writer.write_i32(15, 16383).is_ok());
        assert_eq!(writer.position(), 30);
    }
}
