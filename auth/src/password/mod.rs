pub mod argon2;
pub mod errors;
pub mod policy;

pub use argon2::PasswordHasher;
pub use argon2::ALGORITHM;
pub use errors::PasswordError;
pub use errors::PasswordStrengthError;
pub use policy::PasswordPolicy;
