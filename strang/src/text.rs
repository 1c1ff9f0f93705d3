//! Parsers for text based formats.
//!
//! These read UTF-8 from byte aligned input. The column counts characters and a `'\n'` starts a
//! new line. When the input is not byte aligned, e.g. after [`bits`][crate::binary::bits], they
//! fail.
use std::{borrow::Cow, fmt};

use bstr::ByteSlice;
use num_traits::{
    ops::overflowing::{OverflowingAdd, OverflowingMul, OverflowingSub},
    FromPrimitive, Zero,
};

use crate::{Parser, State, Value};

/// Source location consisting of a line and column number.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct LineColumn {
    /// The source line.
    ///
    /// This follows the convention where the first line is line `1`.
    pub line: usize,
    /// The source column.
    ///
    /// This counts characters for text and bits for binary input, following the convention where
    /// the first column is column `1`.
    pub column: usize,
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What the input holds in place of an expected character.
enum Found {
    Char(char),
    End,
    Unaligned,
    InvalidUtf8,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(c) => write!(f, "found {:?}", c),
            Found::End => f.write_str("encountered end of input"),
            Found::Unaligned => f.write_str("the input is not byte aligned"),
            Found::InvalidUtf8 => f.write_str("found invalid UTF-8"),
        }
    }
}

/// Returns the not yet consumed input as bytes, if it is byte aligned.
#[inline]
fn remaining<'a>(state: &State<'a>) -> Option<&'a [u8]> {
    state.input.aligned_bytes()
}

/// Decodes the next character, returning it together with its encoding.
fn next_char<'a>(state: &State<'a>) -> Result<(char, &'a str), Found> {
    let bytes = remaining(state).ok_or(Found::Unaligned)?;
    if bytes.is_empty() {
        return Err(Found::End);
    }
    match bstr::decode_utf8(bytes) {
        (Some(c), len) => std::str::from_utf8(&bytes[..len])
            .map(|text| (c, text))
            .map_err(|_| Found::InvalidUtf8),
        (None, _) => Err(Found::InvalidUtf8),
    }
}

/// Consumes `text`, which must be a prefix of the remaining input.
fn advance<'a>(mut state: State<'a>, text: &str) -> State<'a> {
    if state.advance_text(text) {
        state
    } else {
        state.fail("internal error: consumed text does not follow")
    }
}

#[cold]
#[inline(never)]
fn unexpected<'a>(state: State<'a>, expected: &str, found: Found) -> State<'a> {
    let msg = format!(
        "Expected {} at line {}, column {}, but {}",
        expected,
        state.line,
        state.column + 1,
        found
    );
    state.fail(msg)
}

/// Parses a character matching `pred` as [`Value::Char`].
///
/// `description` names the expected character in failure messages.
pub fn satisfy<'a, F>(pred: F, description: impl Into<String>) -> impl Parser<'a>
where
    F: Fn(char) -> bool,
{
    let description = description.into();
    move |state: State<'a>| match next_char(&state) {
        Ok((c, text)) if pred(c) => advance(state, text).push(Value::Char(c)),
        Ok((c, _)) => unexpected(state, &description, Found::Char(c)),
        Err(found) => unexpected(state, &description, found),
    }
}

/// Parses the character `c`.
pub fn char<'a>(c: char) -> impl Parser<'a> {
    satisfy(move |found| found == c, format!("{:?}", c))
}

/// Parses any character.
pub fn any_char<'a>() -> impl Parser<'a> {
    satisfy(|_| true, "any character")
}

/// Parses a character contained in `chars`.
pub fn one_of<'a>(chars: &'a str) -> impl Parser<'a> {
    satisfy(move |c| chars.contains(c), format!("one of {:?}", chars))
}

/// Parses a character not contained in `chars`.
pub fn none_of<'a>(chars: &'a str) -> impl Parser<'a> {
    satisfy(move |c| !chars.contains(c), format!("none of {:?}", chars))
}

/// Parses an ASCII digit.
pub fn digit<'a>() -> impl Parser<'a> {
    satisfy(|c| c.is_ascii_digit(), "a digit")
}

/// Parses an alphabetic character.
pub fn letter<'a>() -> impl Parser<'a> {
    satisfy(char::is_alphabetic, "a letter")
}

/// Parses the fixed string `expected` as [`Value::Str`].
pub fn string<'a>(expected: &'a str) -> impl Parser<'a> {
    move |state: State<'a>| {
        let Some(bytes) = remaining(&state) else {
            return unexpected(state, &format!("{:?}", expected), Found::Unaligned);
        };
        if bytes.starts_with(expected.as_bytes()) {
            advance(state, expected).push(Value::Str(Cow::Borrowed(expected)))
        } else {
            let found = &bytes[..bytes.len().min(expected.len())];
            let msg = format!(
                "Expected {:?} at line {}, column {}, but found {:?}",
                expected,
                state.line,
                state.column + 1,
                found.as_bstr()
            );
            state.fail(msg)
        }
    }
}

/// Parses one or more alphanumeric characters or underscores as [`Value::Str`].
pub fn word<'a>() -> impl Parser<'a> {
    |state: State<'a>| {
        let text = match remaining(&state) {
            Some(bytes) => match bytes.to_str() {
                Ok(text) => text,
                Err(err) => std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
            },
            None => return unexpected(state, "a word", Found::Unaligned),
        };
        let len = text
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(text.len());
        if len == 0 {
            let found = match next_char(&state) {
                Ok((c, _)) => Found::Char(c),
                Err(found) => found,
            };
            return unexpected(state, "a word", found);
        }
        let text = &text[..len];
        advance(state, text).push(Value::Str(Cow::Borrowed(text)))
    }
}

/// Skips over tab and space characters.
///
/// This never fails and produces no value.
pub fn spaces<'a>() -> impl Parser<'a> {
    |state: State<'a>| {
        let Some(bytes) = remaining(&state) else {
            return state;
        };
        let len = tabs_or_spaces(bytes, 0);
        match std::str::from_utf8(&bytes[..len]) {
            Ok(text) => advance(state, text),
            Err(_) => state,
        }
    }
}

/// Parses a single newline, `"\n"` or `"\r\n"`, as [`Value::Char`] `'\n'`.
pub fn newline<'a>() -> impl Parser<'a> {
    |state: State<'a>| {
        let Some(bytes) = remaining(&state) else {
            return unexpected(state, "a newline", Found::Unaligned);
        };
        match newline_len(bytes, 0) {
            1 => advance(state, "\n").push(Value::Char('\n')),
            2 => advance(state, "\r\n").push(Value::Char('\n')),
            _ => {
                let found = match next_char(&state) {
                    Ok((c, _)) => Found::Char(c),
                    Err(found) => found,
                };
                unexpected(state, "a newline", found)
            }
        }
    }
}

/// Parses a decimal integer, optionally prefixed by `'-'`, as [`Value::Int`].
///
/// Integers that do not fit into an `i128` are a failure.
pub fn integer<'a>() -> impl Parser<'a> {
    |state: State<'a>| {
        let Some(bytes) = remaining(&state) else {
            return unexpected(state, "an integer", Found::Unaligned);
        };
        let (value, len) = signed_ascii_digits::<i128>(bytes, 0);
        let digits = &bytes[..len];
        if !digits.iter().any(u8::is_ascii_digit) {
            let found = match next_char(&state) {
                Ok((c, _)) => Found::Char(c),
                Err(found) => found,
            };
            return unexpected(state, "an integer", found);
        }
        let Ok(text) = std::str::from_utf8(digits) else {
            return unexpected(state, "an integer", Found::InvalidUtf8);
        };
        match value {
            Some(value) => advance(state, text).push(Value::Int(value)),
            None => {
                let msg = format!(
                    "Integer {} at line {}, column {} is out of range",
                    text,
                    state.line,
                    state.column + 1
                );
                state.fail(msg)
            }
        }
    }
}

/// Passes over ASCII digits, optionally prefixed by `'-'`, and parses them as decimal number.
///
/// Returns the parsed value (or `None` on overflow) and the offset past the digits. A lone `'-'`
/// not followed by a digit is not passed over. An explicit positive sign `'+'` is not handled.
pub fn signed_ascii_digits<I>(bytes: &[u8], mut offset: usize) -> (Option<I>, usize)
where
    I: Zero + FromPrimitive + OverflowingAdd + OverflowingSub + OverflowingMul,
{
    let mut value = I::zero();
    let mut overflow = false;
    let ten = I::from_u8(10);
    let negative = bytes.get(offset) == Some(&b'-')
        && matches!(bytes.get(offset + 1), Some(b'0'..=b'9'));
    if negative {
        offset += 1;
    }

    while let Some(&digit @ b'0'..=b'9') = bytes.get(offset) {
        offset += 1;

        let (Some(ten), Some(digit)) = (&ten, I::from_u8(digit - b'0')) else {
            overflow = true;
            continue;
        };

        let (new_value, overflowed) = value.overflowing_mul(ten);
        overflow |= overflowed;
        value = new_value;

        let (new_value, overflowed) = if negative {
            value.overflowing_sub(&digit)
        } else {
            value.overflowing_add(&digit)
        };
        overflow |= overflowed;
        value = new_value;
    }

    ((!overflow).then_some(value), offset)
}

/// Passes over tab and space characters.
///
/// Increments `offset` as long as it points to either a tab (`'\t'`) or a space (`' '`) character
/// and returns the resulting value.
#[inline]
pub fn tabs_or_spaces(bytes: &[u8], mut offset: usize) -> usize {
    while let Some(b' ') | Some(b'\t') = bytes.get(offset) {
        offset += 1;
    }
    offset
}

/// Returns the length of a newline at `offset`.
///
/// This is 1 for `"\n"`, 2 for `"\r\n"` and 0 otherwise.
#[inline]
pub fn newline_len(bytes: &[u8], offset: usize) -> usize {
    match bytes.get(offset) {
        Some(b'\n') => 1,
        Some(b'\r') if bytes.get(offset + 1) == Some(&b'\n') => 2,
        _ => 0,
    }
}
