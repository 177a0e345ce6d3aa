mod code;
mod logger;
mod position;

use once_cell::unsync::OnceCell;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// Line and column information at a byte offset into a [`Code`].
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A wrapper around source bytes with a lazily-computed line-break index, so
/// a [`ParseError`](crate::ParseError) can report a human-readable position
/// without rescanning the source on every lookup.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Leveled debug output for the [`Machine`](crate::Machine)'s step trace.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
