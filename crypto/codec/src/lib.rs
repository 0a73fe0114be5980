//! Punt Word Codec
//!
//! Converts byte buffers to and from the fixed-capacity sequence of
//! 128-bit words the confidential-compute cipher operates on.
//!
//! # Layout
//!
//! - A word is an unsigned 128-bit integer packed as 16 little-endian bytes
//! - Plaintext is zero-padded to a 16-byte multiple before compression
//! - At most [`MAX_WORDS`] words fit in one encrypted payload

mod errors;
mod words;

pub use errors::{CodecError, CodecResult};
pub use words::{compress, decompress, pad, trim};

/// Bytes per 128-bit word.
pub const WORD_BYTES: usize = 16;

/// Maximum number of words one payload may occupy.
pub const MAX_WORDS: usize = 18;

/// Maximum plaintext size in bytes after padding.
pub const MAX_PLAINTEXT_BYTES: usize = MAX_WORDS * WORD_BYTES;
