use crate::{text::LineColumn, BitSlice, ParseError, Stack, Value};

/// Whether a [`State`] is still being parsed or has failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// All parsers so far succeeded.
    Ok,
    /// A parser failed. The state is passed through unchanged from here on.
    Error,
}

/// The record threaded through every parser.
///
/// A parser takes a `State` by value and returns the derived state. Snapshotting a state for
/// backtracking is a cheap [`clone`][Clone::clone]: the input is a borrowed view and the results
/// are a persistent [`Stack`].
///
/// `line` and `column` only serve diagnostics. The column counts characters for text parsers and
/// bits for binary parsers, starting at `0`.
#[derive(Clone, Debug)]
pub struct State<'a> {
    pub(crate) status: Status,
    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) input: BitSlice<'a>,
    pub(crate) results: Stack<Value<'a>>,
    pub(crate) error: Option<String>,
}

impl<'a> State<'a> {
    /// Creates the initial state for parsing `input`.
    pub fn new(input: impl Into<BitSlice<'a>>) -> Self {
        Self {
            status: Status::Ok,
            line: 1,
            column: 0,
            input: input.into(),
            results: Stack::new(),
            error: None,
        }
    }

    /// The status of the state.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns whether no parser failed so far.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Returns whether a parser failed.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// The current line, starting at `1`.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The current column, starting at `0`.
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The not yet consumed input.
    #[inline]
    pub fn input(&self) -> BitSlice<'a> {
        self.input
    }

    /// The values produced so far, most recent first.
    #[inline]
    pub fn results(&self) -> &Stack<Value<'a>> {
        &self.results
    }

    /// The failure message of a failed state.
    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The current source location, with both line and column starting at `1`.
    pub fn location(&self) -> LineColumn {
        LineColumn {
            line: self.line,
            column: self.column + 1,
        }
    }

    /// Marks the state as failed with the given message.
    ///
    /// The input is left at the point of failure. Calling this on an already failed state keeps
    /// the original failure.
    pub fn fail(mut self, msg: impl Into<String>) -> Self {
        if self.is_ok() {
            self.status = Status::Error;
            self.error = Some(msg.into());
        }
        self
    }

    /// Pushes a produced value.
    #[inline]
    pub fn push(mut self, value: Value<'a>) -> Self {
        self.results.push(value);
        self
    }

    /// Consumes `n` bits of input, advancing the column by `n`.
    ///
    /// Returns the consumed bits. Nothing is consumed when fewer than `n` bits are left. This is
    /// the building block of binary parsers:
    /// ```rust
    /// use strang::{parse, Parser, State, Value};
    ///
    /// fn nibble<'a>() -> impl Parser<'a> {
    ///     |mut state: State<'a>| match state.take(4) {
    ///         Some(run) => state.push(Value::UInt(run.to_u128())),
    ///         None => state.fail("Expected a nibble"),
    ///     }
    /// }
    ///
    /// let values = parse(&[0xa5], &nibble().then(nibble()))?;
    /// assert_eq!(values, vec![Value::UInt(0xa), Value::UInt(5)]);
    /// assert!(parse(&[], &nibble()).is_err());
    /// # Ok::<(), strang::ParseError>(())
    /// ```
    #[inline]
    pub fn take(&mut self, n: usize) -> Option<BitSlice<'a>> {
        let (taken, rest) = self.input.split_at(n)?;
        self.input = rest;
        self.column += n;
        Some(taken)
    }

    /// Consumes `text` if the input is byte aligned and starts with it.
    ///
    /// Unlike [`take`][Self::take], this advances the column by characters, and each `'\n'`
    /// starts a new line. Returns `false` without consuming anything when `text` does not follow.
    /// This is the building block of text parsers:
    /// ```rust
    /// use strang::{Parser, State, Value};
    ///
    /// fn keyword<'a>(word: &'a str) -> impl Parser<'a> {
    ///     move |mut state: State<'a>| {
    ///         if state.advance_text(word) {
    ///             state.push(Value::from(word))
    ///         } else {
    ///             state.fail(format!("Expected {:?}", word))
    ///         }
    ///     }
    /// }
    ///
    /// let state = keyword("let\n").then(keyword("x")).parse(State::new("let\nxs"));
    /// assert_eq!((state.line(), state.column()), (2, 1));
    /// assert!(keyword("y").parse(State::new("x")).is_error());
    /// ```
    pub fn advance_text(&mut self, text: &str) -> bool {
        let follows = self
            .input
            .aligned_bytes()
            .is_some_and(|bytes| bytes.starts_with(text.as_bytes()));
        if !follows {
            return false;
        }
        let Some((_, rest)) = self.input.split_at(text.len() * 8) else {
            return false;
        };
        self.input = rest;
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        true
    }

    /// Replaces the values produced since the stack had `mark` entries by a single list.
    pub(crate) fn group(mut self, mark: usize) -> Self {
        if self.is_ok() {
            let values = self.results.split_off(mark);
            self.results.push(Value::List(values));
        }
        self
    }

    /// Turns the values produced since `mark` into a single value, leaving a lone value as is.
    pub(crate) fn collapse(mut self, mark: usize) -> Self {
        if self.is_ok() && self.results.len() > mark + 1 {
            self = self.group(mark);
        }
        self
    }

    /// Unwraps the final state into the produced values or the failure.
    pub fn finish(self) -> Result<Vec<Value<'a>>, ParseError> {
        match self.status {
            Status::Ok => Ok(self.results.into_vec()),
            Status::Error => Err(ParseError {
                location: self.location(),
                msg: self.error.unwrap_or_default(),
            }),
        }
    }
}
