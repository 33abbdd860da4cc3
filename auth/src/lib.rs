//! Authentication primitives library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id) and a minimum-strength policy
//! - Opaque session token generation
//! - A coordinator with a decoy hash for enumeration-resistant failure paths
//!
//! Services own their account model and persistence; this crate only does the
//! cryptography.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Password Policy
//! ```
//! use auth::{PasswordPolicy, PasswordStrengthError};
//!
//! let policy = PasswordPolicy::default();
//! assert!(policy.check("long enough").is_ok());
//! assert!(matches!(policy.check("short"), Err(PasswordStrengthError::TooShort { .. })));
//! ```
//!
//! ## Complete Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new().unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, then hand out an opaque token
//! assert!(auth.verify_password("password123", &hash).unwrap());
//! let token = auth.generate_token();
//! assert_eq!(token.len(), 64);
//!
//! // Unknown account: pay the same verification cost, then fail
//! auth.verify_decoy("password123");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use password::PasswordStrengthError;
pub use token::TokenGenerator;
