use log::trace;

use crate::{combinator::eof, BitSlice, ParseError, Parser, State, Value};

/// Configuration options for running a parser.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Config {
    /// When set, a parse that succeeds without consuming the complete input fails instead.
    /// (Default: `false`)
    pub require_end: bool,
    /// The line number reported for the start of the input. (Default: `1`)
    pub first_line: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            require_end: false,
            first_line: 1,
        }
    }
}

impl Config {
    #[inline]
    /// Sets the [`require_end`][Self#structfield.require_end] field.
    pub fn require_end(mut self, value: bool) -> Self {
        self.require_end = value;
        self
    }

    #[inline]
    /// Sets the [`first_line`][Self#structfield.first_line] field.
    pub fn first_line(mut self, value: usize) -> Self {
        self.first_line = value;
        self
    }
}

/// Runs `parser` on `input` and returns the final state.
///
/// Unlike [`parse`], this gives access to the input left over after a successful parse.
pub fn run<'a>(
    input: impl Into<BitSlice<'a>>,
    parser: &impl Parser<'a>,
    config: &Config,
) -> State<'a> {
    let mut state = State::new(input);
    state.line = config.first_line;
    trace!("parsing {} bits of input", state.input.len());

    let mut state = parser.parse(state);
    if config.require_end {
        state = eof().parse(state);
    }

    match state.error() {
        None => trace!(
            "parse succeeded at {} with {} values",
            state.location(),
            state.results.len()
        ),
        Some(msg) => trace!("parse failed at {}: {}", state.location(), msg),
    }
    state
}

/// Runs `parser` on `input` using the default [`Config`].
///
/// Returns the produced values in the order they were produced.
pub fn parse<'a>(input: &'a [u8], parser: &impl Parser<'a>) -> Result<Vec<Value<'a>>, ParseError> {
    parse_with(input, parser, &Config::default())
}

/// Runs `parser` on `input` using the given [`Config`].
pub fn parse_with<'a>(
    input: &'a [u8],
    parser: &impl Parser<'a>,
    config: &Config,
) -> Result<Vec<Value<'a>>, ParseError> {
    run(input, parser, config).finish()
}

/// Runs `parser` on the UTF-8 encoded `input` using the default [`Config`].
pub fn parse_str<'a>(input: &'a str, parser: &impl Parser<'a>) -> Result<Vec<Value<'a>>, ParseError> {
    parse(input.as_bytes(), parser)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        binary::{bytes, uint},
        text::{newline, string},
        BinaryParser,
        Endianness::Big,
        LineColumn,
    };

    #[test]
    fn remaining_input_is_kept() {
        let state = run(&[0x00, 0x55, b'!'], &uint(16, Big), &Config::default());
        assert!(state.is_ok());
        assert_eq!(state.input().aligned_bytes(), Some(&b"!"[..]));
        assert_eq!(state.finish().unwrap(), vec![Value::UInt(0x55)]);
    }

    #[test]
    fn require_end() {
        let config = Config::default().require_end(true);
        let err = parse_with(b"Hi", &bytes(1), &config).unwrap_err();
        assert_eq!(err.location, LineColumn { line: 1, column: 9 });
        assert_eq!(
            err.msg,
            "Expected end of input at position 9, but the input continues"
        );
        assert_eq!(
            parse_with(b"Hi", &bytes(1).bytes(1), &config).unwrap(),
            vec![Value::bytes(b"H"[..].into()), Value::bytes(b"i"[..].into())]
        );
    }

    #[test]
    fn first_line_offsets_locations() {
        let config = Config::default().first_line(10);
        let parser = string("a").then(newline()).then(string("b"));
        let err = parse_with(b"a\nc", &parser, &config).unwrap_err();
        assert_eq!(err.location, LineColumn { line: 11, column: 1 });
        assert_eq!(
            err.to_string(),
            "11:1: Expected \"b\" at line 11, column 1, but found \"c\""
        );
    }

    #[test]
    fn failures_discard_partial_results() {
        let err = parse(&[0x01], &uint(8, Big).uint(8, Big)).unwrap_err();
        assert_matches!(err.msg.as_str(), msg if msg.ends_with("but encountered end of input"));
        assert_eq!(parse_str("ab", &string("ab")).unwrap(), vec![Value::from("ab")]);
    }
}
