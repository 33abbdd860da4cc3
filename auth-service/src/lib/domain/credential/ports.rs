use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::credential::errors::AuthError;
use crate::credential::errors::StoreError;
use crate::credential::models::Account;
use crate::credential::models::AccountId;
use crate::credential::models::AccountKind;
use crate::credential::models::AccountStatus;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Handle;
use crate::credential::models::PasswordDigest;
use crate::credential::models::Session;
use crate::credential::models::SessionToken;

/// Port for authentication operations exposed to request-handling layers.
///
/// Callers map the returned outcomes onto their own transport responses.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new `user` account.
    ///
    /// Same as [`AuthServicePort::register_as`] with [`AccountKind::User`].
    ///
    /// # Arguments
    /// * `handle` - Raw login handle (normalized before use)
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Created credential record, status `active`
    ///
    /// # Errors
    /// * `InvalidHandle` - Handle fails validation (no store call made)
    /// * `WeakPassword` - Password fails the strength policy (no store call made)
    /// * `AlreadyExists` - Handle collides with an existing account
    /// * `StoreUnavailable` - Store could not be reached
    async fn register(&self, handle: &str, password: &str) -> Result<CredentialRecord, AuthError>;

    /// Register a new account of the given kind.
    ///
    /// Handles are unique across kinds.
    ///
    /// # Errors
    /// Same as [`AuthServicePort::register`].
    async fn register_as(
        &self,
        handle: &str,
        password: &str,
        kind: AccountKind,
    ) -> Result<CredentialRecord, AuthError>;

    /// Verify credentials and open a session.
    ///
    /// Unknown handles and wrong passwords are indistinguishable to the caller.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown handle or wrong password
    /// * `AccountLocked` - Account is locked (password not checked)
    /// * `StoreUnavailable` - Store could not be reached
    async fn authenticate(&self, handle: &str, password: &str) -> Result<Session, AuthError>;

    /// Verify credentials for an account of one specific kind.
    ///
    /// An account of another kind is treated exactly like an unknown handle.
    ///
    /// # Errors
    /// Same as [`AuthServicePort::authenticate`].
    async fn authenticate_as(
        &self,
        handle: &str,
        password: &str,
        kind: AccountKind,
    ) -> Result<Session, AuthError>;

    /// Resolve a token to its owning account.
    ///
    /// # Errors
    /// * `InvalidToken` - Token unknown or revoked
    /// * `Expired` - Token past its expiry
    /// * `StoreUnavailable` - Store could not be reached
    async fn validate_session(&self, token: &SessionToken) -> Result<AccountId, AuthError>;

    /// Revoke a session.
    ///
    /// # Errors
    /// * `InvalidToken` - Token unknown
    /// * `StoreUnavailable` - Store could not be reached
    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError>;

    /// Replace a password after re-verifying the current one.
    ///
    /// All sessions of the account are revoked on success.
    ///
    /// # Errors
    /// * `WeakPassword` - New password fails the strength policy
    /// * `NotFound` - Account does not exist
    /// * `AccountLocked` - Account is locked
    /// * `InvalidCredentials` - Old password does not match
    /// * `StoreUnavailable` - Store could not be reached
    async fn change_password(
        &self,
        account_id: &AccountId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Move an account to another lifecycle state.
    ///
    /// Locking revokes all sessions of the account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `StoreUnavailable` - Store could not be reached
    async fn set_account_status(
        &self,
        account_id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), AuthError>;

    /// Public view of the account behind a valid session.
    ///
    /// # Errors
    /// Same as [`AuthServicePort::validate_session`], plus `NotFound`.
    async fn current_account(&self, token: &SessionToken) -> Result<Account, AuthError>;

    /// Resolve a token whose account must be of `kind`.
    ///
    /// # Errors
    /// Same as [`AuthServicePort::validate_session`], plus:
    /// * `WrongAccountKind` - Session is valid but belongs to another kind
    async fn require_kind(
        &self,
        token: &SessionToken,
        kind: AccountKind,
    ) -> Result<AccountId, AuthError>;
}

/// Persistence operations for credentials and sessions.
///
/// Every implementation must behave identically for every operation: handle
/// matching is exact on the normalized [`Handle`], `create` is atomic with
/// at-most-one winner per handle, and no failed call leaves a partial write.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Retrieve a credential record by normalized handle.
    ///
    /// # Errors
    /// * `NotFound` - No account with this handle
    /// * `Unavailable` - Backend failure
    async fn find_by_handle(&self, handle: &Handle) -> Result<CredentialRecord, StoreError>;

    /// Retrieve a credential record by identifier.
    ///
    /// # Errors
    /// * `NotFound` - No account with this id
    /// * `Unavailable` - Backend failure
    async fn find_by_id(&self, account_id: &AccountId) -> Result<CredentialRecord, StoreError>;

    /// Create a new `active` account.
    ///
    /// # Arguments
    /// * `handle` - Normalized handle
    /// * `kind` - Account kind, fixed for the account's lifetime
    /// * `password` - Already-hashed password
    ///
    /// # Returns
    /// Created record with a freshly assigned id
    ///
    /// # Errors
    /// * `AlreadyExists` - Handle is taken, whatever its kind
    /// * `Unavailable` - Backend failure
    async fn create(
        &self,
        handle: Handle,
        kind: AccountKind,
        password: PasswordDigest,
    ) -> Result<CredentialRecord, StoreError>;

    /// Replace the stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - No account with this id
    /// * `Unavailable` - Backend failure
    async fn update_password(
        &self,
        account_id: &AccountId,
        password: PasswordDigest,
    ) -> Result<(), StoreError>;

    /// Replace the account status.
    ///
    /// # Errors
    /// * `NotFound` - No account with this id
    /// * `Unavailable` - Backend failure
    async fn set_status(&self, account_id: &AccountId, status: AccountStatus)
        -> Result<(), StoreError>;

    /// Store the last-successful-authentication timestamp.
    ///
    /// # Errors
    /// * `NotFound` - No account with this id
    /// * `Unavailable` - Backend failure
    async fn record_login(&self, account_id: &AccountId, at: DateTime<Utc>)
        -> Result<(), StoreError>;

    /// Create and store a new session expiring `ttl` from now.
    ///
    /// The status check and the insert are one atomic step: once `set_status`
    /// to `locked` has returned, no new session can be issued for the account.
    ///
    /// # Arguments
    /// * `account_id` - Owning account
    /// * `ttl` - Positive lifetime
    ///
    /// # Errors
    /// * `NotFound` - No account with this id (nothing is stored)
    /// * `AccountLocked` - Account is locked (nothing is stored)
    /// * `TtlOutOfRange` - `ttl` is not positive or the expiry is not representable
    /// * `Unavailable` - Backend failure
    async fn issue_token(&self, account_id: &AccountId, ttl: Duration)
        -> Result<Session, StoreError>;

    /// Retrieve a session by token value, whatever its state.
    ///
    /// # Errors
    /// * `NotFound` - Unknown token
    /// * `Unavailable` - Backend failure
    async fn find_token(&self, token: &SessionToken) -> Result<Session, StoreError>;

    /// Flip the revoked flag of a session. Revoking twice succeeds.
    ///
    /// # Errors
    /// * `NotFound` - Unknown token
    /// * `Unavailable` - Backend failure
    async fn revoke_token(&self, token: &SessionToken) -> Result<(), StoreError>;

    /// Revoke every unrevoked session of one account.
    ///
    /// # Returns
    /// Number of sessions newly revoked
    ///
    /// # Errors
    /// * `Unavailable` - Backend failure
    async fn revoke_account_tokens(&self, account_id: &AccountId) -> Result<u64, StoreError>;
}
