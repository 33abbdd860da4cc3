use serde::Deserialize;

use super::errors::PasswordStrengthError;

/// Minimum-strength rules applied before a password is ever hashed.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 8;
    pub const DEFAULT_MAX_LENGTH: usize = 128;

    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Check a candidate password against the policy.
    ///
    /// # Errors
    /// * `Blank` - Password is empty or whitespace only
    /// * `TooShort` - Fewer than `min_length` characters
    /// * `TooLong` - More than `max_length` characters
    pub fn check(&self, password: &str) -> Result<(), PasswordStrengthError> {
        if password.trim().is_empty() {
            return Err(PasswordStrengthError::Blank);
        }

        let length = password.chars().count();
        if length < self.min_length {
            Err(PasswordStrengthError::TooShort {
                min: self.min_length,
                actual: length,
            })
        } else if length > self.max_length {
            Err(PasswordStrengthError::TooLong {
                max: self.max_length,
                actual: length,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH, Self::DEFAULT_MAX_LENGTH)
    }
}
