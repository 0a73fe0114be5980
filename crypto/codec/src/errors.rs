//! Codec errors

use thiserror::Error;

/// Codec result type
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced by word compression
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Input is not a whole number of words
    #[error("Buffer length {len} is not a multiple of {word_bytes} bytes")]
    Unaligned { len: usize, word_bytes: usize },

    /// Input exceeds the fixed word budget
    #[error("Payload needs {words} words, capacity is {max}")]
    CapacityExceeded { words: usize, max: usize },
}
