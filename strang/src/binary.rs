//! Parsers for bit-level binary data.
//!
//! Every primitive consumes a fixed number of bits from the front of the input, advancing the
//! column by that number of bits. When fewer bits are left, it fails without consuming anything,
//! naming the expected width and the position where the input ended.
//!
//! Each primitive is available as a standalone parser (e.g. [`uint`]) and, through
//! [`BinaryParser`], as a method running it after another parser (e.g.
//! `bytes(2).uint(16, Endianness::Big)`).
//!
//! Widths are validated when the parser is built: a zero width, an integer wider than 128 bits or
//! a float that is neither 32 nor 64 bits wide is a programming error and panics.
use std::fmt;

use crate::{combinator::seq, BitSlice, Parser, State, Value};

/// Byte order used to interpret a run of bits as a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// The first bit consumed is the most significant bit.
    Big,
    /// The first (possibly partial) byte consumed holds the least significant bits.
    ///
    /// The run is split into bytes from the front. When the width is not a multiple of 8, the last
    /// group is shorter and holds the most significant bits. For widths of at most 8 bits this is
    /// the same as [`Big`][Endianness::Big].
    Little,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endianness::Big => "big-endian",
            Endianness::Little => "little-endian",
        })
    }
}

/// Maximal width of integers produced by [`uint`] and [`int`].
pub const MAX_INT_BITS: usize = u128::BITS as usize;

/// Parses a run of `n` bits as [`Value::Bits`].
pub fn bits<'a>(n: usize) -> impl Parser<'a> {
    assert!(n > 0, "bit count must be positive");
    move |state: State<'a>| read_bits(state, n)
}

/// Parses `n` bytes as [`Value::Bytes`].
///
/// The input does not need to be byte aligned, unaligned bytes are copied.
pub fn bytes<'a>(n: usize) -> impl Parser<'a> {
    assert!(n > 0, "byte count must be positive");
    assert!(n.checked_mul(8).is_some(), "byte count {} overflows the bit count", n);
    move |state: State<'a>| read_bytes(state, n)
}

/// Parses a `size` bit unsigned integer as [`Value::UInt`].
pub fn uint<'a>(size: usize, endianness: Endianness) -> impl Parser<'a> {
    check_int_width(size);
    move |state: State<'a>| read_uint(state, size, endianness)
}

/// Parses a `size` bit two's complement integer as [`Value::Int`].
///
/// The sign bit is the most significant bit after resolving the endianness.
pub fn int<'a>(size: usize, endianness: Endianness) -> impl Parser<'a> {
    check_int_width(size);
    move |state: State<'a>| read_int(state, size, endianness)
}

/// Parses a big-endian IEEE 754 binary32 or binary64 float as [`Value::Float`].
///
/// `size` must be 32 or 64. See [`float_with`] for little-endian floats.
pub fn float<'a>(size: usize) -> impl Parser<'a> {
    float_with(size, Endianness::Big)
}

/// Parses an IEEE 754 binary32 or binary64 float with the given byte order.
pub fn float_with<'a>(size: usize, endianness: Endianness) -> impl Parser<'a> {
    assert!(
        size == 32 || size == 64,
        "float width must be 32 or 64 bits, not {}",
        size
    );
    move |state: State<'a>| read_float(state, size, endianness)
}

#[inline]
fn check_int_width(size: usize) {
    assert!(
        (1..=MAX_INT_BITS).contains(&size),
        "integer width must be between 1 and {} bits, not {}",
        MAX_INT_BITS,
        size
    );
}

fn read_bits(mut state: State, n: usize) -> State {
    match state.take(n) {
        Some(run) => state.push(Value::Bits(run)),
        None => {
            let unit = if n == 1 { "bit" } else { "bits" };
            end_of_input(state, format_args!("{} {}", n, unit))
        }
    }
}

fn read_bytes(mut state: State, n: usize) -> State {
    match state.take(n * 8) {
        Some(run) => state.push(Value::bytes(run.to_bytes())),
        None => {
            let unit = if n == 1 { "byte" } else { "bytes" };
            end_of_input(state, format_args!("{} {}", n, unit))
        }
    }
}

fn read_uint(mut state: State, size: usize, endianness: Endianness) -> State {
    match state.take(size) {
        Some(run) => state.push(Value::UInt(decode_uint(run, endianness))),
        None => end_of_input(
            state,
            format_args!("{} bit, unsigned {} integer", size, endianness),
        ),
    }
}

fn read_int(mut state: State, size: usize, endianness: Endianness) -> State {
    match state.take(size) {
        Some(run) => state.push(Value::Int(decode_int(run, endianness))),
        None => end_of_input(
            state,
            format_args!("{} bit, signed {} integer", size, endianness),
        ),
    }
}

fn read_float(mut state: State, size: usize, endianness: Endianness) -> State {
    match state.take(size) {
        Some(run) => {
            let raw = decode_uint(run, endianness);
            let value = if size == 32 {
                f32::from_bits(raw as u32) as f64
            } else {
                f64::from_bits(raw as u64)
            };
            state.push(Value::Float(value))
        }
        None => end_of_input(state, format_args!("{} bit, {} float", size, endianness)),
    }
}

#[cold]
#[inline(never)]
fn end_of_input<'a>(state: State<'a>, expected: fmt::Arguments) -> State<'a> {
    let msg = format!(
        "Expected {} starting at position {}, but encountered end of input",
        expected,
        state.column + 1
    );
    state.fail(msg)
}

/// Interprets a run of at most 128 bits as an unsigned integer.
pub fn decode_uint(run: BitSlice, endianness: Endianness) -> u128 {
    match endianness {
        Endianness::Big => run.to_u128(),
        Endianness::Little => {
            let mut value = 0u128;
            let mut rest = run;
            let mut shift = 0;
            while !rest.is_empty() {
                let Some((group, tail)) = rest.split_at(rest.len().min(8)) else {
                    break;
                };
                value |= group.to_u128() << shift;
                shift += group.len();
                rest = tail;
            }
            value
        }
    }
}

/// Interprets a run of at most 128 bits as a two's complement integer.
pub fn decode_int(run: BitSlice, endianness: Endianness) -> i128 {
    let unused = MAX_INT_BITS - run.len();
    // Move the sign bit to the top and shift back arithmetically to extend it.
    ((decode_uint(run, endianness) << unused) as i128) >> unused
}

/// Runs binary primitives after another parser.
///
/// This is implemented for every [`Parser`], so primitives compose from left to right:
/// `bytes(4).uint(16, Endianness::Little).bits(3)`.
pub trait BinaryParser<'a>: Parser<'a> + Sized {
    /// Runs [`bits`] after this parser.
    fn bits(self, n: usize) -> impl Parser<'a> {
        seq(self, bits(n))
    }

    /// Runs [`bytes`] after this parser.
    fn bytes(self, n: usize) -> impl Parser<'a> {
        seq(self, bytes(n))
    }

    /// Runs [`uint`] after this parser.
    fn uint(self, size: usize, endianness: Endianness) -> impl Parser<'a> {
        seq(self, uint(size, endianness))
    }

    /// Runs [`int`] after this parser.
    fn int(self, size: usize, endianness: Endianness) -> impl Parser<'a> {
        seq(self, int(size, endianness))
    }

    /// Runs [`float`] after this parser.
    fn float(self, size: usize) -> impl Parser<'a> {
        seq(self, float(size))
    }

    /// Runs [`float_with`] after this parser.
    fn float_with(self, size: usize, endianness: Endianness) -> impl Parser<'a> {
        seq(self, float_with(size, endianness))
    }
}

impl<'a, P: Parser<'a>> BinaryParser<'a> for P {}
