use std::borrow::Cow;

use assert_matches::assert_matches;
use proptest::prelude::*;

use crate::binary::{bits, bytes, float, float_with, int, uint};
use crate::combinator::{either, seq};
use crate::text::{char, string};
use crate::write::{text::ascii_digits, BitWriter};
use crate::{parse, run, BinaryParser, BitSlice, Config, Endianness, Parser, State, Value};

fn endianness(little: bool) -> Endianness {
    if little {
        Endianness::Little
    } else {
        Endianness::Big
    }
}

/// Runs `parser` after skipping the first `skip` bits of `input`.
fn parse_after<'a>(input: BitSlice<'a>, skip: usize, parser: &impl Parser<'a>) -> State<'a> {
    let mut state = State::new(input);
    assert!(state.take(skip).is_some());
    parser.parse(state)
}

#[test]
fn two_single_bytes() {
    assert_eq!(
        parse(&[72, 105], &bytes(1).bytes(1)).unwrap(),
        vec![
            Value::bytes(Cow::Borrowed(&b"H"[..])),
            Value::bytes(Cow::Borrowed(&b"i"[..])),
        ]
    );
}

#[test]
fn uint_leaves_remaining_input() {
    let mut writer = BitWriter::new();
    writer.write_uint(85, 16, Endianness::Big);
    ascii_digits(&mut writer, -90);
    let input = writer.into_bytes();

    let state = run(&input[..], &uint(16, Endianness::Big), &Config::default());
    assert_eq!(state.input().aligned_bytes(), Some(&b"-90"[..]));
    assert_eq!(state.column(), 16);
    assert_eq!(state.finish().unwrap(), vec![Value::UInt(85)]);
}

#[test]
fn negative_big_endian_int() {
    let input = (-85i16).to_be_bytes();
    assert_eq!(
        parse(&input, &int(16, Endianness::Big)).unwrap(),
        vec![Value::Int(-85)]
    );
}

#[test]
fn float_scenarios() {
    let input = 2.5f32.to_be_bytes();
    assert_eq!(parse(&input, &float(32)).unwrap(), vec![Value::Float(2.5)]);

    let input = (-0.0f64).to_be_bytes();
    assert_matches!(
        parse(&input, &float(64)).unwrap().as_slice(),
        [Value::Float(value)] if *value == 0.0 && value.is_sign_negative()
    );
    let input = 0.0f32.to_le_bytes();
    assert_matches!(
        parse(&input, &float_with(32, Endianness::Little)).unwrap().as_slice(),
        [Value::Float(value)] if *value == 0.0 && value.is_sign_positive()
    );
}

#[test]
fn alternation_discards_partial_consumption() {
    let input = [0x5a, 0x80];
    // `a` consumes a byte and a bit before failing on the missing second byte.
    let a = bytes(1).bits(1).bytes(1);
    let b = bits(4).uint(4, Endianness::Big);

    let alone = b.parse(State::new(&input));
    let b = bits(4).uint(4, Endianness::Big);
    let alternated = either(a, b).parse(State::new(&input));

    assert!(alternated.is_ok());
    assert_eq!(alternated.column(), alone.column());
    assert_eq!(alternated.input(), alone.input());
    assert_eq!(alternated.finish().unwrap(), alone.finish().unwrap());
}

#[test]
fn int_extremes_round_trip() {
    for size in [1, 7, 16, 33, 64, 127, 128] {
        let min = i128::MIN >> (128 - size);
        let max = i128::MAX >> (128 - size);
        for little in [false, true] {
            int_round_trip_inner(size, min, little, 0);
            int_round_trip_inner(size, max, little, 3);
        }
    }
}

#[test]
fn failure_mid_sequence() {
    let parser = seq(string("ab"), char('c')).then(uint(8, Endianness::Big));
    let err = parse(b"abd", &parser).unwrap_err();
    assert_eq!(err.to_string(), "1:3: Expected 'c' at line 1, column 3, but found 'd'");
}

fn bits_consumes_exactly_inner(input: Vec<u8>, skip: usize, n: usize) {
    let view = BitSlice::new(&input);
    let skip = skip.min(view.len());
    let state = parse_after(view, skip, &bits(n));
    let available = view.len() - skip;
    if n <= available {
        assert!(state.is_ok());
        assert_eq!(state.column(), skip + n);
        assert_eq!(state.input().len(), available - n);
        assert_matches!(state.results().peek(), Some(Value::Bits(run)) if run.len() == n);
    } else {
        assert!(state.is_error());
        assert_eq!(state.column(), skip);
        assert_eq!(state.input().len(), available);
    }
}

fn bytes_match_bits_inner(input: Vec<u8>, skip: usize, n: usize) {
    let view = BitSlice::new(&input);
    let skip = skip.min(view.len());
    let as_bytes = parse_after(view, skip, &bytes(n));
    let as_bits = parse_after(view, skip, &bits(n * 8));
    assert_eq!(as_bytes.status(), as_bits.status());
    assert_eq!(as_bytes.column(), as_bits.column());
    if as_bytes.is_ok() {
        let Some(Value::Bits(run)) = as_bits.results().peek() else {
            panic!("bits produced {:?}", as_bits.results());
        };
        let produced = as_bytes.results().peek().and_then(Value::as_bytes);
        assert_eq!(produced, Some(&run.to_bytes()[..]));
    }
}

fn uint_round_trip_inner(size: usize, value: u128, little: bool, skip: usize) {
    let value = if size == 128 {
        value
    } else {
        value & ((1u128 << size) - 1)
    };
    let endianness = endianness(little);
    let mut writer = BitWriter::new();
    writer.write_bits(0, skip, Endianness::Big);
    writer.write_uint(value, size, endianness);

    let state = parse_after(writer.as_bits(), skip, &uint(size, endianness));
    assert!(state.input().is_empty());
    assert_eq!(state.finish().unwrap(), vec![Value::UInt(value)]);
}

fn int_round_trip_inner(size: usize, value: i128, little: bool, skip: usize) {
    let unused = 128 - size;
    // Wrap into the range representable with `size` bits.
    let value = (value << unused) >> unused;
    let endianness = endianness(little);
    let mut writer = BitWriter::new();
    writer.write_bits(u128::MAX, skip, Endianness::Big);
    writer.write_int(value, size, endianness);

    let state = parse_after(writer.as_bits(), skip, &int(size, endianness));
    assert_eq!(state.finish().unwrap(), vec![Value::Int(value)]);
}

fn endianness_matters_inner(size: usize, first_byte: u8) {
    let mut writer = BitWriter::new();
    writer.write_bytes(&[first_byte]);
    writer.write_bits(0, size - 8, Endianness::Big);

    let big = uint(size, Endianness::Big).parse(State::new(writer.as_bits()));
    let little = uint(size, Endianness::Little).parse(State::new(writer.as_bits()));
    assert_eq!(
        big.finish().unwrap(),
        vec![Value::UInt((first_byte as u128) << (size - 8))]
    );
    assert_eq!(little.finish().unwrap(), vec![Value::UInt(first_byte as u128)]);
}

fn small_widths_ignore_endianness_inner(size: usize, value: u8) {
    let input = [value];
    let big = uint(size, Endianness::Big).parse(State::new(&input));
    let little = uint(size, Endianness::Little).parse(State::new(&input));
    assert_eq!(big.finish().unwrap(), little.finish().unwrap());
}

fn float_round_trip_inner(value: f64, size: usize, little: bool) {
    let value = if size == 32 { value as f32 as f64 } else { value };
    let endianness = endianness(little);
    let mut writer = BitWriter::new();
    writer.write_float(value, size, endianness);

    let state = float_with(size, endianness).parse(State::new(writer.as_bits()));
    assert_matches!(
        state.finish().unwrap().as_slice(),
        [Value::Float(parsed)] if parsed.to_bits() == value.to_bits()
    );
}

proptest! {
    #[test]
    fn bits_consumes_exactly(
        input in prop::collection::vec(any::<u8>(), 0..24),
        skip in 0..8usize,
        n in 1..200usize
    ) {
        bits_consumes_exactly_inner(input, skip, n);
    }

    #[test]
    fn bytes_match_bits(
        input in prop::collection::vec(any::<u8>(), 0..24),
        skip in 0..8usize,
        n in 1..24usize
    ) {
        bytes_match_bits_inner(input, skip, n);
    }

    #[test]
    fn uint_round_trip(
        size in 1..=128usize,
        value in any::<u128>(),
        little in any::<bool>(),
        skip in 0..8usize
    ) {
        uint_round_trip_inner(size, value, little, skip);
    }

    #[test]
    fn int_round_trip(
        size in 1..=128usize,
        value in any::<i128>(),
        little in any::<bool>(),
        skip in 0..8usize
    ) {
        int_round_trip_inner(size, value, little, skip);
    }

    #[test]
    fn endianness_matters(size in 16..=128usize, first_byte in 1..=255u8) {
        endianness_matters_inner(size, first_byte);
    }

    #[test]
    fn small_widths_ignore_endianness(size in 1..=8usize, value in any::<u8>()) {
        small_widths_ignore_endianness_inner(size, value);
    }

    #[test]
    fn float_round_trip(
        value in any::<f64>().prop_filter("NaN has no unique encoding", |v| !v.is_nan()),
        wide in any::<bool>(),
        little in any::<bool>()
    ) {
        float_round_trip_inner(value, if wide { 64 } else { 32 }, little);
    }
}

#[test]
fn float_special_values() {
    for value in [0.0, -0.0, 2.5, -1.0e-3, f64::INFINITY, f64::NEG_INFINITY] {
        for size in [32, 64] {
            for little in [false, true] {
                float_round_trip_inner(value, size, little);
            }
        }
    }
}
