use thiserror::Error;

use crate::text::LineColumn;

/// A failed parse.
///
/// This is the only kind of failure. It is produced by the driver from the final state when a
/// parser failed and no enclosing alternative recovered from it.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{location}: {msg}")]
pub struct ParseError {
    /// Where the failing parser gave up.
    pub location: LineColumn,
    /// The failure message.
    pub msg: String,
}
