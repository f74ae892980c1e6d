use thiserror::Error;

/// Errors that can occur when operating on the tuple.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TupleError {
    /// Only natural numbers (excluding zero) can be stored.
    #[error("invalid value {0}: only natural numbers greater than zero are allowed")]
    InvalidValue(i32),

    #[error("index {index} out of range for length {len}")]
    InvalidIndex { index: usize, len: usize },
}
