//! Error types for password hashing.

use thiserror::Error;

/// Password hashing errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The hashing primitive rejected the input or parameters.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Password longer than bcrypt can represent.
    #[error("Password too long: {0} bytes (bcrypt accepts at most {1})")]
    PasswordTooLong(usize, usize),

    /// Cost or memory parameter out of range.
    #[error("Invalid cost parameter: {0}")]
    InvalidCost(String),

    /// Unknown algorithm name.
    #[error("Unknown hash algorithm: {0} (expected bcrypt or argon2id)")]
    UnknownAlgorithm(String),

    /// Stored hash is not a bcrypt or argon2 string.
    #[error("Unrecognized password hash format")]
    UnrecognizedHash,

    /// Verification could not be carried out (malformed hash).
    #[error("Password verification failed: {0}")]
    Verification(String),
}

/// Result type for hashing operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
