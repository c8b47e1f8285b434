//! # atelier-crypto
//!
//! Password hashing for atelier.
//!
//! ## Algorithms
//!
//! - **bcrypt** (default, cost 10): the format the application backend verifies
//! - **Argon2id**: memory-hard alternative, PHC string format
//!
//! ## Example
//!
//! ```rust
//! use atelier_crypto::{verify_password, HashAlgorithm, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashAlgorithm::Bcrypt)
//!     .with_bcrypt_cost(4)
//!     .unwrap();
//! let hash = hasher.hash("correct horse").unwrap();
//! assert!(verify_password("correct horse", &hash).unwrap());
//! ```

pub mod error;
pub mod password;

pub use error::{CryptoError, CryptoResult};
pub use password::{
    hash_password, verify_password, Argon2Params, HashAlgorithm, PasswordHasher,
    DEFAULT_BCRYPT_COST,
};
