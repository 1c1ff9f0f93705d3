//! Strang is a library of composable parsers for binary and text based formats.
//!
//! A parser is a function from a parse [`State`] to a new `State`. The state holds the not yet
//! consumed input as a view of bits, a stack of the [`Value`]s produced so far, the current
//! position for error messages and whether parsing failed so far. Larger parsers are built by
//! combining smaller ones:
//!
//! * _Bit-level_: The input is addressed bit by bit. Binary primitives such as
//!   [`uint`][binary::uint] consume any number of bits, so fields need not be byte aligned. Text
//!   parsers work on the same input, as long as it is byte aligned at that point.
//!
//! * _Short-circuiting_: Once a parser fails, every following parser passes the failed state
//!   through unchanged. Only alternatives (see [`either`][combinator::either]) recover from a
//!   failure, by running the next alternative on the state from before the failed one. This makes
//!   sequencing as simple as calling one parser after another.
//!
//! * _Cheap backtracking_: Input is borrowed and produced values live on a persistent
//!   [`Stack`], so keeping a state around to restore it later costs a clone of a few words.
//!
//! * _Error reporting_: A failed parse reports a single [`ParseError`] with the location where
//!   the failing parser gave up and a message naming what it expected.
//!
//! ## Using Strang
//!
//! Parsers are values implementing [`Parser`]. Every closure taking and returning a `State` is a
//! parser, and the functions in [`binary`], [`text`], [`combinator`] and [`repeat`] build the
//! common ones. The driver functions [`parse`], [`parse_with`] and [`run`] run a parser on some
//! input:
//! ```rust
//! use strang::{binary::uint, parse, BinaryParser, Endianness, Value};
//!
//! // A length byte followed by a 12-bit little-endian field and 4 bits of padding.
//! let parser = uint(8, Endianness::Big)
//!     .uint(12, Endianness::Little)
//!     .bits(4);
//! let values = parse(&[0x02, 0xab, 0xc0], &parser)?;
//! assert_eq!(values[0], Value::UInt(2));
//! assert_eq!(values[1], Value::UInt(0xcab));
//! # Ok::<(), strang::ParseError>(())
//! ```
//!
//! Parsers for text based formats are combined in the same way:
//! ```rust
//! use strang::{combinator::between, parse_str, repeat::sep_by, text::{char, integer}, Value};
//!
//! let list = between(char('['), sep_by(integer(), char(',')), char(']'));
//! let values = parse_str("[1,-2,3]", &list)?;
//! assert_eq!(
//!     values,
//!     vec![Value::List(vec![Value::Int(1), Value::Int(-2), Value::Int(3)])]
//! );
//!
//! let err = parse_str("[1,x]", &list).unwrap_err();
//! assert_eq!(err.to_string(), "1:3: Expected ']' at line 1, column 3, but found ','");
//! # Ok::<(), strang::ParseError>(())
//! ```

#![warn(missing_docs)]
mod bits;
mod driver;
mod error;
mod parser;
mod state;
mod value;

pub mod binary;
pub mod combinator;
pub mod repeat;
pub mod stack;
pub mod text;
pub mod write;

pub use binary::{BinaryParser, Endianness};
pub use bits::BitSlice;
pub use driver::{parse, parse_str, parse_with, run, Config};
pub use error::ParseError;
pub use parser::{BoxedParser, Parser};
pub use stack::Stack;
pub use state::{State, Status};
pub use text::LineColumn;
pub use value::Value;

#[cfg(test)]
mod tests;
