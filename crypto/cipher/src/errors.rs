//! Cipher errors

use thiserror::Error;

/// Cipher result type
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors that can occur during cipher operations
#[derive(Error, Debug)]
pub enum CipherError {
    /// Secure random generator failure
    #[error("Random generator failure: {0}")]
    Rng(String),
}
