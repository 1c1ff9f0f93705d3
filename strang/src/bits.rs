use std::{borrow::Cow, fmt};

/// A borrowed, bit-addressable view into a byte buffer.
///
/// This is used both for the not yet consumed input of a parse and for raw bit runs produced by
/// [`bits`][crate::binary::bits]. Bits are numbered from the most significant bit of the first
/// byte, i.e. the first bit of `[0b1000_0000]` is set.
///
/// Advancing a `BitSlice` only ever drops a prefix, so the view always stays a suffix of the
/// buffer it was created from. The buffer itself is never copied.
#[derive(Clone, Copy)]
pub struct BitSlice<'a> {
    bytes: &'a [u8],
    // Index of the first bit within `bytes[0]`, always `< 8` and `0` when `bytes` is empty
    head: usize,
    len: usize,
}

impl<'a> BitSlice<'a> {
    /// Creates a view covering all bits of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            head: 0,
            len: bytes.len() * 8,
        }
    }

    /// Creates a view covering the first `len` bits of `bytes`.
    ///
    /// This will panic if `bytes` contains fewer than `len` bits.
    pub fn from_bits(bytes: &'a [u8], len: usize) -> Self {
        assert!(
            len <= bytes.len() * 8,
            "bit length {} exceeds the {} bits of the buffer",
            len,
            bytes.len() * 8
        );
        Self {
            bytes,
            head: 0,
            len,
        }
    }

    /// Number of bits in view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether no bits are left.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether the first bit in view is the first bit of a byte.
    #[inline]
    pub fn is_byte_aligned(&self) -> bool {
        self.head == 0
    }

    /// Returns the bit at `index`, or `None` if `index` is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        let bit = self.head + index;
        Some(self.bytes[bit / 8] & (0x80 >> (bit % 8)) != 0)
    }

    /// Returns an iterator over the bits in view.
    pub fn iter(&self) -> impl Iterator<Item = bool> + 'a {
        let slice = *self;
        (0..slice.len).map(move |index| {
            let bit = slice.head + index;
            slice.bytes[bit / 8] & (0x80 >> (bit % 8)) != 0
        })
    }

    /// Splits off the first `n` bits.
    ///
    /// Returns the first `n` bits and the remaining bits, or `None` when fewer than `n` bits are
    /// in view.
    #[inline]
    pub fn split_at(&self, n: usize) -> Option<(BitSlice<'a>, BitSlice<'a>)> {
        if n > self.len {
            return None;
        }
        let prefix = BitSlice {
            bytes: self.bytes,
            head: self.head,
            len: n,
        };
        let end = self.head + n;
        let suffix = BitSlice {
            bytes: &self.bytes[end / 8..],
            head: end % 8,
            len: self.len - n,
        };
        Some((prefix, suffix))
    }

    /// Returns the whole bytes in view if the view starts at a byte boundary.
    ///
    /// A trailing partial byte is not included.
    #[inline]
    pub fn aligned_bytes(&self) -> Option<&'a [u8]> {
        self.is_byte_aligned().then(|| &self.bytes[..self.len / 8])
    }

    /// Returns the bits in view packed into bytes.
    ///
    /// This borrows from the underlying buffer when the view is byte aligned and covers whole
    /// bytes. Otherwise the bits are copied, with the unused low bits of a trailing partial byte
    /// set to zero.
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        if self.is_byte_aligned() && self.len % 8 == 0 {
            return Cow::Borrowed(&self.bytes[..self.len / 8]);
        }
        let mut packed = vec![0u8; (self.len + 7) / 8];
        for (index, bit) in self.iter().enumerate() {
            if bit {
                packed[index / 8] |= 0x80 >> (index % 8);
            }
        }
        Cow::Owned(packed)
    }

    /// Interprets the bits in view as an unsigned integer, first bit most significant.
    ///
    /// This will panic if more than 128 bits are in view.
    pub fn to_u128(&self) -> u128 {
        assert!(self.len <= 128, "{} bits do not fit into a u128", self.len);
        self.iter()
            .fold(0u128, |value, bit| (value << 1) | bit as u128)
    }
}

impl<'a> From<&'a [u8]> for BitSlice<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for BitSlice<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a str> for BitSlice<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<'a, 'b> PartialEq<BitSlice<'b>> for BitSlice<'a> {
    fn eq(&self, other: &BitSlice<'b>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<'a> Eq for BitSlice<'a> {}

impl<'a> fmt::Debug for BitSlice<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0b")?;
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
