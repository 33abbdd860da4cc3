use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per token before hex encoding (32 bytes = 64 hex chars).
pub const TOKEN_BYTES: usize = 32;

/// Opaque session token generator.
///
/// Tokens carry no structure or claims; their only property is that they
/// cannot be guessed. Validity is decided by whoever stores them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draw a fresh token from the operating system CSPRNG.
    ///
    /// # Returns
    /// Lowercase hex string of `2 * TOKEN_BYTES` characters
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_shape() {
        let token = TokenGenerator::new().generate();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let generator = TokenGenerator::new();
        let tokens: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
