use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier as _;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Algorithm tag stored next to every hash produced by [`PasswordHasher`].
pub const ALGORITHM: &str = "argon2id";

/// Argon2id hasher with pinned cost parameters.
///
/// Hashes are PHC strings, so the cost they were made with travels with them
/// and raising the parameters later does not invalidate stored digests.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Hasher using the argon2 crate's recommended costs (19 MiB, 2 passes, 1 lane).
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// Only argon2id digests are accepted. The cost is read from the digest
    /// itself, and a mismatch costs the same as a match.
    ///
    /// # Errors
    /// * `VerificationFailed` - The digest is malformed or not argon2id
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        if parsed.algorithm.as_str() != ALGORITHM {
            return Err(PasswordError::VerificationFailed(format!(
                "Unsupported algorithm: {}",
                parsed.algorithm
            )));
        }

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
