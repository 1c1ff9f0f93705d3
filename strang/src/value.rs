use std::borrow::Cow;

use bstr::{BStr, BString, ByteSlice};

use crate::BitSlice;

/// A value produced by a parser.
///
/// Values borrow from the parsed input where possible.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    /// Placeholder for an absent optional value.
    Nil,
    /// A raw run of bits without numeric interpretation.
    Bits(BitSlice<'a>),
    /// A raw run of bytes without numeric interpretation.
    Bytes(Cow<'a, BStr>),
    /// An unsigned integer.
    UInt(u128),
    /// A signed integer.
    Int(i128),
    /// A floating point number. 32-bit floats are widened, which is exact.
    Float(f64),
    /// A single character.
    Char(char),
    /// A string.
    Str(Cow<'a, str>),
    /// The results of a group of parsers, in the order they were produced.
    List(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    /// Wraps packed bytes, borrowing when possible.
    pub fn bytes(bytes: Cow<'a, [u8]>) -> Self {
        Value::Bytes(match bytes {
            Cow::Borrowed(bytes) => Cow::Borrowed(bytes.as_bstr()),
            Cow::Owned(bytes) => Cow::Owned(BString::from(bytes)),
        })
    }

    /// Returns the contained bytes of a [`Value::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => {
                let bytes: &[u8] = bytes;
                Some(bytes)
            }
            _ => None,
        }
    }

    /// Returns the contained string of a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(&**text),
            _ => None,
        }
    }

    /// Returns the contained integer of a [`Value::UInt`].
    pub fn as_uint(&self) -> Option<u128> {
        match *self {
            Value::UInt(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the contained integer of a [`Value::Int`].
    pub fn as_int(&self) -> Option<i128> {
        match *self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the contained number of a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the contained values of a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(text: &'a str) -> Self {
        Value::Str(Cow::Borrowed(text))
    }
}

impl From<String> for Value<'_> {
    fn from(text: String) -> Self {
        Value::Str(Cow::Owned(text))
    }
}

impl From<char> for Value<'_> {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}
