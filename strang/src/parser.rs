use crate::{combinator, State, Value};

/// A parser transforms a [`State`] into a new `State`.
///
/// Any `Fn(State<'a>) -> State<'a>` closure is a parser. Parsers only implement
/// [`step`][Parser::step], which is never called on a failed state: [`parse`][Parser::parse]
/// passes failed states through unchanged, which makes a failure short-circuit every parser
/// after it.
///
/// On success `step` returns a state with the input advanced past the consumed input and the
/// produced values pushed. On failure it returns a state marked as failed via
/// [`State::fail`], with the input left at the point of failure. Parsers never roll back on their
/// own, only alternatives (see [`either`][crate::combinator::either]) restore an earlier state.
pub trait Parser<'a> {
    /// Runs the parser on a state that has not failed.
    fn step(&self, state: State<'a>) -> State<'a>;

    /// Runs the parser, passing failed states through unchanged.
    #[inline]
    fn parse(&self, state: State<'a>) -> State<'a> {
        if state.is_error() {
            state
        } else {
            self.step(state)
        }
    }

    /// Runs `next` after this parser. See [`seq`][crate::combinator::seq].
    fn then<P>(self, next: P) -> impl Parser<'a>
    where
        Self: Sized,
        P: Parser<'a>,
    {
        combinator::seq(self, next)
    }

    /// Tries `other` when this parser fails. See [`either`][crate::combinator::either].
    fn or<P>(self, other: P) -> impl Parser<'a>
    where
        Self: Sized,
        P: Parser<'a>,
    {
        combinator::either(self, other)
    }

    /// Replaces the most recently produced value. See [`map`][crate::combinator::map].
    fn map<F>(self, f: F) -> impl Parser<'a>
    where
        Self: Sized,
        F: Fn(Value<'a>) -> Value<'a>,
    {
        combinator::map(self, f)
    }

    /// Names what this parser expects in failure messages. See
    /// [`label`][crate::combinator::label].
    fn label(self, name: impl Into<String>) -> impl Parser<'a>
    where
        Self: Sized,
    {
        combinator::label(self, name)
    }

    /// Erases the type of this parser.
    fn boxed(self) -> BoxedParser<'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

/// A type erased parser.
///
/// Used where parsers of different types are combined, e.g. by
/// [`choice`][crate::combinator::choice].
pub type BoxedParser<'a> = Box<dyn Parser<'a> + 'a>;

impl<'a, F> Parser<'a> for F
where
    F: Fn(State<'a>) -> State<'a>,
{
    #[inline]
    fn step(&self, state: State<'a>) -> State<'a> {
        self(state)
    }
}

impl<'a> Parser<'a> for Box<dyn Parser<'a> + 'a> {
    #[inline]
    fn step(&self, state: State<'a>) -> State<'a> {
        (**self).step(state)
    }

    #[inline]
    fn parse(&self, state: State<'a>) -> State<'a> {
        (**self).parse(state)
    }
}
