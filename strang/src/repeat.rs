//! Repetition combinators.
//!
//! Each repetition pushes a single [`Value::List`] holding one value per successful iteration.
//! When an iteration produces several values they are grouped into a nested list, and an
//! iteration producing no value contributes nothing.
//!
//! A repetition stops at the first failing iteration and continues from the state after the last
//! successful one. Unbounded repetitions also stop after an iteration that succeeded without
//! consuming any input, as repeating it would never make progress.
use log::trace;

use crate::{combinator::either, combinator::ignore, Parser, State, Value};

/// Applies `parser` between `min` and `max` times, leaving the values of each iteration on the
/// stack.
fn repeat<'a>(
    parser: &impl Parser<'a>,
    min: usize,
    max: Option<usize>,
    mut state: State<'a>,
) -> State<'a> {
    let mut count = 0;
    while max.map_or(true, |max| count < max) {
        let remaining = state.input.len();
        let mark = state.results.len();
        let attempt = parser.parse(state.clone());
        if attempt.is_error() {
            if count < min {
                return attempt;
            }
            trace!(
                "repetition stopped after {} iterations at {}: {}",
                count,
                attempt.location(),
                attempt.error().unwrap_or_default()
            );
            return state;
        }
        let attempt = attempt.collapse(mark);
        if max.is_none() && attempt.input.len() == remaining {
            if count < min {
                state = attempt;
                count += 1;
                continue;
            }
            trace!(
                "repetition stopped after {} iterations at {}: no input consumed",
                count,
                state.location()
            );
            return state;
        }
        state = attempt;
        count += 1;
    }
    trace!("repetition reached {} iterations", count);
    state
}

/// Applies `parser` as often as it succeeds, possibly never.
pub fn many<'a>(parser: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mark = state.results.len();
        repeat(&parser, 0, None, state).group(mark)
    }
}

/// Applies `parser` as often as it succeeds, failing unless it succeeds at least once.
pub fn many1<'a>(parser: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mark = state.results.len();
        repeat(&parser, 1, None, state).group(mark)
    }
}

/// Applies `parser` exactly `n` times.
pub fn times<'a>(parser: impl Parser<'a>, n: usize) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mark = state.results.len();
        repeat(&parser, n, Some(n), state).group(mark)
    }
}

/// Applies `parser` one or more times, separated by `separator`.
///
/// The values of `separator` are discarded. A separator that is not followed by another
/// `parser` is not consumed.
pub fn sep_by1<'a>(parser: impl Parser<'a>, separator: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mark = state.results.len();
        let first = parser.parse(state).collapse(mark);
        if first.is_error() {
            return first;
        }
        let item = |state: State<'a>| {
            let mark = state.results.len();
            let mut state = separator.parse(state);
            if state.is_ok() {
                state.results.truncate(mark);
            }
            parser.parse(state)
        };
        repeat(&item, 0, None, first).group(mark)
    }
}

/// Applies `parser` zero or more times, separated by `separator`.
///
/// See [`sep_by1`].
pub fn sep_by<'a>(parser: impl Parser<'a>, separator: impl Parser<'a>) -> impl Parser<'a> {
    either(sep_by1(parser, separator), |state: State<'a>| {
        state.push(Value::List(vec![]))
    })
}

/// Applies `parser` as often as it succeeds, discarding its values.
pub fn skip_many<'a>(parser: impl Parser<'a>) -> impl Parser<'a> {
    ignore(many(parser))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        binary::uint,
        combinator::{eof, option, seq},
        text::{char, digit, spaces},
        Endianness::Big,
    };

    fn run<'a>(input: &'a str, parser: &impl Parser<'a>) -> State<'a> {
        parser.parse(State::new(input))
    }

    fn chars(text: &str) -> Value<'static> {
        Value::List(text.chars().map(Value::Char).collect())
    }

    #[test]
    fn many_restores_last_success() {
        let state = run("123x", &many(digit()));
        assert!(state.is_ok());
        assert_eq!(state.column(), 3);
        assert_eq!(state.finish().unwrap(), vec![chars("123")]);

        assert_eq!(run("x", &many(digit())).finish().unwrap(), vec![chars("")]);
    }

    #[test]
    fn many_drops_partial_iteration() {
        // The third iteration consumes '1' before failing on the missing digit.
        let state = run("12341", &many(seq(digit(), digit())));
        assert_eq!(state.column(), 4);
        assert_eq!(
            state.finish().unwrap(),
            vec![Value::List(vec![chars("12"), chars("34")])]
        );
    }

    #[test]
    fn many1_requires_a_success() {
        let state = run("x", &many1(digit()));
        assert_matches!(state.error(), Some(msg) if msg.contains("a digit"));
        assert_eq!(run("7", &many1(digit())).finish().unwrap(), vec![chars("7")]);
    }

    #[test]
    fn zero_width_iterations_stop() {
        let state = run("abc", &many(option(digit())));
        assert!(state.is_ok());
        assert_eq!(state.column(), 0);
        assert_eq!(state.finish().unwrap(), vec![chars("")]);

        let state = run("abc", &many1(spaces()));
        assert!(state.is_ok());
        assert_eq!(state.finish().unwrap(), vec![Value::List(vec![])]);

        let state = run("abc", &many1(option(digit())));
        assert_eq!(state.finish().unwrap(), vec![Value::List(vec![Value::Nil])]);
    }

    #[test]
    fn nested_zero_width_repetitions_terminate() {
        assert_eq!(
            run("12x", &many(many(digit()))).finish().unwrap(),
            vec![Value::List(vec![chars("12")])]
        );
        assert_eq!(run("", &many(eof())).finish().unwrap(), vec![chars("")]);
        let state = run("a", &sep_by(spaces(), spaces()));
        assert!(state.is_ok());
        assert_eq!(state.column(), 0);
    }

    #[test]
    fn times_is_exact() {
        let state = uint(8, Big).parse(State::new(&[3u8, 1, 2, 3, 4]));
        let state = times(uint(8, Big), 3).parse(state);
        assert_eq!(state.input().len(), 8);
        assert_eq!(
            state.finish().unwrap(),
            vec![
                Value::UInt(3),
                Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)])
            ]
        );
        assert!(run("12", &times(digit(), 3)).is_error());
        assert_eq!(run("", &times(digit(), 0)).finish().unwrap(), vec![chars("")]);
    }

    #[test]
    fn separated_lists() {
        let parser = sep_by(digit(), char(','));
        let state = run("1,2,3,", &parser);
        assert_eq!(state.column(), 5);
        assert_eq!(state.finish().unwrap(), vec![chars("123")]);
        assert_eq!(run("", &parser).finish().unwrap(), vec![chars("")]);
        assert!(run("", &sep_by1(digit(), char(','))).is_error());
    }

    #[test]
    fn skip_many_pushes_nothing() {
        let state = run("   7", &seq(skip_many(char(' ')), digit()));
        assert_eq!(state.finish().unwrap(), vec![Value::Char('7')]);
    }
}
