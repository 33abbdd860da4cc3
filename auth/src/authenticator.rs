use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenGenerator;

/// Fixed input for the decoy hash. Its value is irrelevant; only the cost of
/// verifying against it matters.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Authentication coordinator combining password hashing, a decoy hash for
/// unknown accounts, and opaque token generation.
///
/// Provides high-level operations so services never touch Argon2 or the RNG
/// directly.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
    decoy_hash: String,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Hashes the decoy password once so that [`Authenticator::verify_decoy`]
    /// runs with the same parameters as a real verification.
    ///
    /// # Errors
    /// * `HashingFailed` - The decoy hash could not be computed
    pub fn new() -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::new();
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            token_generator: TokenGenerator::new(),
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// PHC string hash
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored PHC hash
    ///
    /// # Returns
    /// True if the password matches
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is malformed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Run a full verification against the decoy hash and discard the result.
    ///
    /// Called on every failure path where no stored hash exists, so that an
    /// unknown account costs as much as a wrong password.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.password_hasher.verify(password, &self.decoy_hash);
    }

    /// Generate a fresh opaque session token.
    pub fn generate_token(&self) -> String {
        self.token_generator.generate()
    }
}
