//! Utilities for producing binary input.
use std::io::{self, Write};

use crate::{binary::MAX_INT_BITS, BitSlice, Endianness};

pub mod text;

/// An in-memory writer for data that is not necessarily byte aligned.
///
/// Numbers are written with the same bit order conventions as the parsers in
/// [`binary`][crate::binary] read them, so a value written with a given width and endianness is
/// parsed back unchanged.
///
/// Writing whole bytes through the [`Write`] implementation never fails.
#[derive(Clone, Default, Debug)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of bits written so far.
    #[inline]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Appends a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.buf.push(0);
        }
        if bit {
            if let Some(last) = self.buf.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Appends the low `size` bits of `value` in the given byte order.
    ///
    /// Higher bits of `value` are ignored.
    pub fn write_bits(&mut self, value: u128, size: usize, endianness: Endianness) {
        assert!(
            size <= MAX_INT_BITS,
            "integer width must be at most {} bits, not {}",
            MAX_INT_BITS,
            size
        );
        match endianness {
            Endianness::Big => self.write_group(value, 0, size),
            Endianness::Little => {
                let mut offset = 0;
                while offset < size {
                    let len = (size - offset).min(8);
                    self.write_group(value, offset, len);
                    offset += len;
                }
            }
        }
    }

    /// Writes bits `offset..offset + len` of `value`, most significant first.
    fn write_group(&mut self, value: u128, offset: usize, len: usize) {
        for index in (offset..offset + len).rev() {
            self.write_bit((value >> index) & 1 == 1);
        }
    }

    /// Appends an unsigned integer of `size` bits.
    #[inline]
    pub fn write_uint(&mut self, value: u128, size: usize, endianness: Endianness) {
        self.write_bits(value, size, endianness)
    }

    /// Appends a two's complement integer of `size` bits.
    #[inline]
    pub fn write_int(&mut self, value: i128, size: usize, endianness: Endianness) {
        self.write_bits(value as u128, size, endianness)
    }

    /// Appends an IEEE 754 binary32 or binary64 float.
    pub fn write_float(&mut self, value: f64, size: usize, endianness: Endianness) {
        let raw = match size {
            32 => (value as f32).to_bits() as u128,
            64 => value.to_bits() as u128,
            _ => panic!("float width must be 32 or 64 bits, not {}", size),
        };
        self.write_bits(raw, size, endianness)
    }

    /// Appends whole bytes, starting at the current, possibly unaligned, position.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.bit_len % 8 == 0 {
            self.buf.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for &byte in bytes {
                self.write_group(byte as u128, 0, 8);
            }
        }
    }

    /// The bits written so far.
    pub fn as_bits(&self) -> BitSlice<'_> {
        BitSlice::from_bits(&self.buf, self.bit_len)
    }

    /// Returns the written data, with the last byte padded by zero bits.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Write for BitWriter {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_bytes(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::decode_uint;
    use crate::Endianness::{Big, Little};

    #[test]
    fn unaligned_writes() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3, Big);
        writer.write_bytes(&[0xff]);
        writer.write_bit(false);
        assert_eq!(writer.bit_len(), 12);
        assert_eq!(writer.as_bits(), BitSlice::from_bits(&[0xbf, 0xe0], 12));
        assert_eq!(writer.into_bytes(), vec![0xbf, 0xe0]);
    }

    #[test]
    fn little_endian_groups() {
        let mut writer = BitWriter::new();
        writer.write_uint(0xcab, 12, Little);
        assert_eq!(writer.as_bits(), BitSlice::from_bits(&[0xab, 0xc0], 12));
        assert_eq!(decode_uint(writer.as_bits(), Little), 0xcab);
    }

    #[test]
    fn signed_and_float() {
        let mut writer = BitWriter::new();
        writer.write_int(-85, 16, Big);
        writer.write_float(2.5, 32, Little);
        let mut expected = vec![0xff, 0xab];
        expected.extend_from_slice(&2.5f32.to_le_bytes());
        assert_eq!(writer.into_bytes(), expected);
    }

    #[test]
    fn io_write() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_all(b"A").unwrap();
        assert_eq!(writer.bit_len(), 9);
        assert_eq!(writer.into_bytes(), vec![0xa0, 0x80]);
    }
}
