//! Combinators for sequencing, transforming and choosing between parsers.
//!
//! All combinators here follow the [`Parser`] contract: a failed state passes through unchanged,
//! and only the alternation combinators ([`either`], [`choice`], [`option`]) ever move the input
//! position backwards, by restoring the state they were given.
//!
//! When every alternative fails, the failure of the last alternative is reported.
use log::trace;

use crate::{BoxedParser, Parser, State, Value};

/// Runs `first` and then `second` on the resulting state.
///
/// Both parsers push their values; nothing is grouped.
pub fn seq<'a>(first: impl Parser<'a>, second: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| second.parse(first.parse(state))
}

/// Runs all `parsers` in order, replacing their values by a single [`Value::List`].
pub fn sequence<'a>(parsers: Vec<BoxedParser<'a>>) -> impl Parser<'a> {
    pipe(parsers, Value::List)
}

/// Runs all `parsers` in order, replacing their values by the result of `f`.
///
/// `f` receives the values in the order they were produced.
pub fn pipe<'a, F>(parsers: Vec<BoxedParser<'a>>, f: F) -> impl Parser<'a>
where
    F: Fn(Vec<Value<'a>>) -> Value<'a>,
{
    move |state: State<'a>| {
        let mark = state.results.len();
        let mut state = parsers.iter().fold(state, |state, parser| parser.parse(state));
        if state.is_ok() {
            let values = state.results.split_off(mark);
            state.results.push(f(values));
        }
        state
    }
}

/// Replaces the most recently produced value of `parser` by the result of `f`.
///
/// Input, position and status are left untouched. If `parser` produced no value, `f` is not
/// called.
pub fn map<'a, F>(parser: impl Parser<'a>, f: F) -> impl Parser<'a>
where
    F: Fn(Value<'a>) -> Value<'a>,
{
    move |state: State<'a>| {
        let mark = state.results.len();
        let mut state = parser.parse(state);
        if state.is_ok() && state.results.len() > mark {
            if let Some(value) = state.results.pop() {
                state.results.push(f(value));
            }
        }
        state
    }
}

/// Runs `parser`, discarding the values it produced.
pub fn ignore<'a>(parser: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mark = state.results.len();
        let mut state = parser.parse(state);
        if state.is_ok() {
            state.results.truncate(mark);
        }
        state
    }
}

/// Tries `first`, and if it fails, `second` on the original state.
///
/// Everything `first` did, consumed input and produced values included, is discarded before
/// `second` runs.
pub fn either<'a>(first: impl Parser<'a>, second: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let attempt = first.parse(state.clone());
        if attempt.is_ok() {
            return attempt;
        }
        backtrack(&attempt, &state);
        second.parse(state)
    }
}

/// Tries each of `parsers` on the original state until one succeeds.
///
/// Fails with the failure of the last parser when all of them fail.
pub fn choice<'a>(parsers: Vec<BoxedParser<'a>>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mut last = None;
        for parser in &parsers {
            let attempt = parser.parse(state.clone());
            if attempt.is_ok() {
                return attempt;
            }
            backtrack(&attempt, &state);
            last = Some(attempt);
        }
        match last {
            Some(failure) => failure,
            None => {
                let msg = format!(
                    "Expected one of no alternatives starting at position {}",
                    state.column + 1
                );
                state.fail(msg)
            }
        }
    }
}

#[inline]
fn backtrack(failure: &State, restored: &State) {
    trace!(
        "alternative failed at {}: {}; retrying from {}",
        failure.location(),
        failure.error().unwrap_or_default(),
        restored.location()
    );
}

/// Runs `parser`, producing [`Value::Nil`] on the original state if it fails.
pub fn option<'a>(parser: impl Parser<'a>) -> impl Parser<'a> {
    either(parser, |state: State<'a>| state.push(Value::Nil))
}

/// Runs `first` and `second`, keeping only the values of `first`.
pub fn pair_left<'a>(first: impl Parser<'a>, second: impl Parser<'a>) -> impl Parser<'a> {
    seq(first, ignore(second))
}

/// Runs `first` and `second`, keeping only the values of `second`.
pub fn pair_right<'a>(first: impl Parser<'a>, second: impl Parser<'a>) -> impl Parser<'a> {
    seq(ignore(first), second)
}

/// Runs `first` and `second`, grouping their values into a single [`Value::List`].
pub fn pair_both<'a>(first: impl Parser<'a>, second: impl Parser<'a>) -> impl Parser<'a> {
    move |state: State<'a>| {
        let mark = state.results.len();
        second.parse(first.parse(state)).group(mark)
    }
}

/// Runs `open`, `parser` and `close`, keeping only the values of `parser`.
pub fn between<'a>(
    open: impl Parser<'a>,
    parser: impl Parser<'a>,
    close: impl Parser<'a>,
) -> impl Parser<'a> {
    pair_right(open, pair_left(parser, close))
}

/// Replaces the failure message of `parser` by one naming what was expected.
///
/// The message refers to the position where `parser` started, while the failure location stays
/// where `parser` gave up.
pub fn label<'a>(parser: impl Parser<'a>, name: impl Into<String>) -> impl Parser<'a> {
    let name = name.into();
    move |state: State<'a>| {
        let start = state.column;
        let mut state = parser.parse(state);
        if state.is_error() {
            state.error = Some(format!("Expected {} starting at position {}", name, start + 1));
        }
        state
    }
}

/// Defers building a parser until it runs.
///
/// This allows recursive grammars, where a parser refers to itself.
pub fn lazy<'a, P, F>(f: F) -> impl Parser<'a>
where
    P: Parser<'a>,
    F: Fn() -> P,
{
    move |state: State<'a>| f().parse(state)
}

/// Succeeds without consuming input or producing values, only at the end of the input.
pub fn eof<'a>() -> impl Parser<'a> {
    |state: State<'a>| {
        if state.input.is_empty() {
            state
        } else {
            let msg = format!(
                "Expected end of input at position {}, but the input continues",
                state.column + 1
            );
            state.fail(msg)
        }
    }
}

/// Always fails with `msg`.
pub fn fail<'a>(msg: impl Into<String>) -> impl Parser<'a> {
    let msg = msg.into();
    move |state: State<'a>| state.fail(msg.as_str())
}
