use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::credential::errors::HandleError;
use crate::credential::errors::UnknownVariant;

/// Durable account entry holding the password hash and status.
///
/// Owned by the credential store. Never physically deleted; deactivation goes
/// through [`AccountStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: AccountId,
    pub handle: Handle,
    pub kind: AccountKind,
    pub password: PasswordDigest,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Account unique identifier type. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    ///
    /// # Returns
    /// AccountId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized login handle.
///
/// Trimmed and lower-cased on construction, so two handles compare equal
/// exactly when they collide for uniqueness purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    const MAX_LENGTH: usize = 254;

    /// Normalize and validate a raw handle.
    ///
    /// # Arguments
    /// * `raw` - Handle as typed by the user (username or email)
    ///
    /// # Returns
    /// Normalized Handle value object
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 254 characters
    /// * `InvalidCharacters` - Contains inner whitespace or control characters
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        let normalized = raw.trim().to_lowercase();
        let length = normalized.chars().count();

        if length == 0 {
            return Err(HandleError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if normalized
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(HandleError::InvalidCharacters);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who an account belongs to: a person or an organisation.
///
/// Fixed at registration. Sessions carry the kind of their account so that
/// kind-restricted operations need no extra lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    User,
    Company,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::User => "user",
            AccountKind::Company => "company",
        }
    }
}

impl FromStr for AccountKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AccountKind::User),
            "company" => Ok(AccountKind::Company),
            other => Err(UnknownVariant::Kind(other.to_string())),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Locked,
    PendingVerification,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Locked => "locked",
            AccountStatus::PendingVerification => "pending_verification",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "locked" => Ok(AccountStatus::Locked),
            "pending_verification" => Ok(AccountStatus::PendingVerification),
            other => Err(UnknownVariant::Status(other.to_string())),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Password hashing algorithm tag stored alongside each hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Argon2id,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Argon2id => auth::password::ALGORITHM,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == auth::password::ALGORITHM {
            Ok(HashAlgorithm::Argon2id)
        } else {
            Err(UnknownVariant::Algorithm(s.to_string()))
        }
    }
}

/// Salted password hash plus the algorithm that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub algorithm: HashAlgorithm,
    pub hash: String,
}

impl PasswordDigest {
    pub fn argon2id(hash: String) -> Self {
        Self {
            algorithm: HashAlgorithm::Argon2id,
            hash,
        }
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("algorithm", &self.algorithm)
            .field("hash", &"<redacted>")
            .finish()
    }
}

/// Public view of an account, safe to hand to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub handle: Handle,
    pub kind: AccountKind,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&CredentialRecord> for Account {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            handle: record.handle.clone(),
            kind: record.kind,
            status: record.status,
            created_at: record.created_at,
            last_login_at: record.last_login_at,
        }
    }
}

/// Opaque, unguessable session token value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix suitable for logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.redacted()).finish()
    }
}

/// One authenticated context.
///
/// `expires_at > issued_at` always holds. Only the `revoked` flag ever changes
/// after issuance; expiry is computed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: SessionToken,
    pub account_id: AccountId,
    pub kind: AccountKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Session {
    /// True once `now` is strictly past the expiry timestamp.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_handle_is_normalized() {
        let handle = Handle::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(handle.as_str(), "alice@example.com");
        assert_eq!(handle, Handle::parse("alice@example.com").unwrap());
    }

    #[test]
    fn test_handle_rejects_empty() {
        assert_eq!(Handle::parse("   "), Err(HandleError::Empty));
    }

    #[test]
    fn test_handle_rejects_inner_whitespace() {
        assert_eq!(
            Handle::parse("alice smith"),
            Err(HandleError::InvalidCharacters)
        );
        assert_eq!(
            Handle::parse("alice\u{0}"),
            Err(HandleError::InvalidCharacters)
        );
    }

    #[test]
    fn test_handle_rejects_too_long() {
        let raw = "a".repeat(255);
        assert_eq!(
            Handle::parse(&raw),
            Err(HandleError::TooLong {
                max: 254,
                actual: 255
            })
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Locked,
            AccountStatus::PendingVerification,
        ] {
            assert_eq!(status.as_str().parse::<AccountStatus>(), Ok(status));
        }
        assert!("deleted".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn test_kind_parses_stored_tags() {
        assert_eq!("company".parse::<AccountKind>(), Ok(AccountKind::Company));
        assert_eq!("user".parse::<AccountKind>(), Ok(AccountKind::User));
        assert_eq!(
            "admin".parse::<AccountKind>(),
            Err(UnknownVariant::Kind("admin".to_string()))
        );
        assert_eq!(AccountKind::default(), AccountKind::User);
    }

    #[test]
    fn test_algorithm_tag() {
        assert_eq!(HashAlgorithm::Argon2id.as_str(), "argon2id");
        assert!("bcrypt".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_session_expiry_is_strict() {
        let issued_at = Utc::now();
        let session = Session {
            token: SessionToken::new("abc"),
            account_id: AccountId::new(),
            kind: AccountKind::User,
            issued_at,
            expires_at: issued_at + Duration::seconds(10),
            revoked: false,
        };

        assert!(!session.is_expired_at(session.expires_at));
        assert!(session.is_expired_at(session.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let digest = PasswordDigest::argon2id("$argon2id$secret".to_string());
        let token = SessionToken::new("0123456789abcdef");

        assert!(!format!("{:?}", digest).contains("secret"));
        assert!(!format!("{:?}", token).contains("89abcdef"));
    }
}
