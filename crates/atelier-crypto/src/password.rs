//! Salted, deliberately slow password hashing.
//!
//! Hashes are self-describing strings, so verification needs nothing but
//! the stored value:
//!
//! - bcrypt: `$2b$10$<22-char salt><31-char hash>`
//! - Argon2id: `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`
//!
//! bcrypt at cost 10 is the default; it is what the application backend
//! verifies at login.

use std::fmt;
use std::str::FromStr;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Default bcrypt cost.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest bcrypt cost accepted.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest bcrypt cost accepted.
pub const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt only looks at the first 72 bytes; longer input is rejected
/// instead of silently truncated.
pub const MAX_BCRYPT_PASSWORD_BYTES: usize = 72;

const SALT_LEN: usize = 16;

/// Hash algorithm used for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Bcrypt,
    Argon2id,
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bcrypt" => Ok(Self::Bcrypt),
            "argon2id" | "argon2" => Ok(Self::Argon2id),
            _ => Err(CryptoError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bcrypt => write!(f, "bcrypt"),
            Self::Argon2id => write!(f, "argon2id"),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory in KiB (default: 19456 = 19 MiB).
    pub memory_kib: u32,
    /// Time iterations (default: 2).
    pub iterations: u32,
    /// Parallelism degree (default: 1).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Produces password hashes with a fixed algorithm and cost.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    algorithm: HashAlgorithm,
    bcrypt_cost: Option<u32>,
    argon2: Argon2Params,
}

impl PasswordHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Set the bcrypt cost (log2 rounds).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> CryptoResult<Self> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(CryptoError::InvalidCost(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, cost
            )));
        }
        self.bcrypt_cost = Some(cost);
        Ok(self)
    }

    /// Set the Argon2id parameters. Validated on first use.
    pub fn with_argon2_params(mut self, params: Argon2Params) -> Self {
        self.argon2 = params;
        self
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> CryptoResult<String> {
        match self.algorithm {
            HashAlgorithm::Bcrypt => self.hash_bcrypt(plaintext),
            HashAlgorithm::Argon2id => self.hash_argon2(plaintext),
        }
    }

    fn hash_bcrypt(&self, plaintext: &str) -> CryptoResult<String> {
        if plaintext.len() > MAX_BCRYPT_PASSWORD_BYTES {
            return Err(CryptoError::PasswordTooLong(
                plaintext.len(),
                MAX_BCRYPT_PASSWORD_BYTES,
            ));
        }
        bcrypt::hash(plaintext, self.bcrypt_cost()).map_err(|e| CryptoError::Hashing(e.to_string()))
    }

    fn hash_argon2(&self, plaintext: &str) -> CryptoResult<String> {
        let params = Params::new(
            self.argon2.memory_kib,
            self.argon2.iterations,
            self.argon2.parallelism,
            None,
        )
        .map_err(|e| CryptoError::InvalidCost(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| CryptoError::Hashing(e.to_string()))?;

        let hash = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }
}

/// Hash with the default algorithm and cost.
pub fn hash_password(plaintext: &str) -> CryptoResult<String> {
    PasswordHasher::default().hash(plaintext)
}

/// Check `plaintext` against a stored bcrypt or Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; errors only when the stored value is not
/// a usable hash.
pub fn verify_password(plaintext: &str, hash: &str) -> CryptoResult<bool> {
    if hash.starts_with("$argon2") {
        let parsed = PasswordHash::new(hash).map_err(|e| CryptoError::Verification(e.to_string()))?;
        return match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::Verification(e.to_string())),
        };
    }

    if hash.starts_with("$2") {
        return bcrypt::verify(plaintext, hash).map_err(|e| CryptoError::Verification(e.to_string()));
    }

    Err(CryptoError::UnrecognizedHash)
}
