use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordPolicy;
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
use crate::credential::ports::AuthServicePort;
use crate::credential::ports::CredentialStore;

/// Issuance and password rules applied by [`AuthService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    pub password: PasswordPolicy,
    pub session_ttl: Duration,
}

impl AuthPolicy {
    pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 3600;
    /// One year.
    pub const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 3600;

    /// Whether the session lifetime is positive and at most one year.
    pub fn session_ttl_in_range(&self) -> bool {
        self.session_ttl > Duration::zero()
            && self.session_ttl <= Duration::seconds(Self::MAX_SESSION_TTL_SECONDS)
    }
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            password: PasswordPolicy::default(),
            session_ttl: Duration::seconds(Self::DEFAULT_SESSION_TTL_SECONDS),
        }
    }
}

/// Domain service implementation for authentication.
///
/// Programs only against [`CredentialStore`]; the concrete store is injected
/// and never inspected. `S` may be a trait object, so a store chosen at
/// runtime from configuration works the same as a concrete type.
pub struct AuthService<S>
where
    S: CredentialStore + ?Sized,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    policy: AuthPolicy,
}

impl<S> AuthService<S>
where
    S: CredentialStore + ?Sized,
{
    /// Create a new auth service with injected store.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `policy` - Password and session rules
    ///
    /// # Errors
    /// * `TtlOutOfRange` - Session lifetime is not within one second to one year
    /// * `Hashing` - The decoy hash could not be prepared
    pub fn new(store: Arc<S>, policy: AuthPolicy) -> Result<Self, AuthError> {
        if !policy.session_ttl_in_range() {
            return Err(AuthError::TtlOutOfRange);
        }

        Ok(Self {
            store,
            authenticator: Arc::new(Authenticator::new()?),
            policy,
        })
    }

    async fn hash_password(&self, password: &str) -> Result<PasswordDigest, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_owned();

        let hash = tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;

        Ok(PasswordDigest::argon2id(hash))
    }

    async fn verify_password(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_owned();
        let hash = digest.hash.clone();

        let matches =
            tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &hash))
                .await
                .map_err(|e| AuthError::Hashing(e.to_string()))??;

        Ok(matches)
    }

    /// Spend one verification on the decoy hash, then report bad credentials.
    async fn reject_unknown(&self, password: &str) -> AuthError {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_owned();

        if let Err(e) =
            tokio::task::spawn_blocking(move || authenticator.verify_decoy(&password)).await
        {
            tracing::error!(error = %e, "Decoy verification task failed");
        }

        AuthError::InvalidCredentials
    }

    async fn load_session(&self, token: &SessionToken) -> Result<Session, AuthError> {
        let session = match self.store.find_token(token).await {
            Ok(session) => session,
            Err(StoreError::NotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        if session.revoked {
            return Err(AuthError::InvalidToken);
        }
        if session.is_expired_at(Utc::now()) {
            return Err(AuthError::Expired);
        }

        Ok(session)
    }

    /// Shared body of `authenticate` and `authenticate_as`.
    async fn sign_in(
        &self,
        handle: &str,
        password: &str,
        kind: Option<AccountKind>,
    ) -> Result<Session, AuthError> {
        let handle = match Handle::parse(handle) {
            Ok(handle) => handle,
            Err(_) => return Err(self.reject_unknown(password).await),
        };

        let record = match self.store.find_by_handle(&handle).await {
            Ok(record) => record,
            Err(StoreError::NotFound) => {
                tracing::debug!("Authentication failed for unknown handle");
                return Err(self.reject_unknown(password).await);
            }
            Err(e) => return Err(e.into()),
        };

        if kind.is_some_and(|kind| kind != record.kind) {
            tracing::debug!(account_id = %record.id, "Authentication failed: account kind mismatch");
            return Err(self.reject_unknown(password).await);
        }

        if record.status == AccountStatus::Locked {
            tracing::info!(account_id = %record.id, "Authentication refused for locked account");
            return Err(AuthError::AccountLocked);
        }

        if !self.verify_password(password, &record.password).await? {
            tracing::info!(account_id = %record.id, "Authentication failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self
            .store
            .issue_token(&record.id, self.policy.session_ttl)
            .await?;

        if let Err(e) = self.store.record_login(&record.id, session.issued_at).await {
            // The caller only sees the error, so the session must not stay live.
            if let Err(revoke_err) = self.store.revoke_token(&session.token).await {
                tracing::error!(
                    account_id = %record.id,
                    token = %session.token.redacted(),
                    error = %revoke_err,
                    "Failed to revoke session after login bookkeeping failed"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            account_id = %record.id,
            kind = %record.kind,
            token = %session.token.redacted(),
            expires_at = %session.expires_at,
            "Session issued"
        );

        Ok(session)
    }
}

#[async_trait]
impl<S> AuthServicePort for AuthService<S>
where
    S: CredentialStore + ?Sized,
{
    async fn register(&self, handle: &str, password: &str) -> Result<CredentialRecord, AuthError> {
        self.register_as(handle, password, AccountKind::User).await
    }

    async fn register_as(
        &self,
        handle: &str,
        password: &str,
        kind: AccountKind,
    ) -> Result<CredentialRecord, AuthError> {
        let handle = Handle::parse(handle)?;
        self.policy.password.check(password)?;

        let digest = self.hash_password(password).await?;
        let record = self.store.create(handle, kind, digest).await?;

        tracing::info!(
            account_id = %record.id,
            kind = %kind,
            backend = self.store.backend(),
            "Account registered"
        );

        Ok(record)
    }

    async fn authenticate(&self, handle: &str, password: &str) -> Result<Session, AuthError> {
        self.sign_in(handle, password, None).await
    }

    async fn authenticate_as(
        &self,
        handle: &str,
        password: &str,
        kind: AccountKind,
    ) -> Result<Session, AuthError> {
        self.sign_in(handle, password, Some(kind)).await
    }

    async fn validate_session(&self, token: &SessionToken) -> Result<AccountId, AuthError> {
        self.load_session(token)
            .await
            .map(|session| session.account_id)
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
        match self.store.revoke_token(token).await {
            Ok(()) => {
                tracing::info!(token = %token.redacted(), "Session revoked");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(AuthError::InvalidToken),
            Err(e) => Err(e.into()),
        }
    }

    async fn change_password(
        &self,
        account_id: &AccountId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.policy.password.check(new_password)?;

        let record = self.store.find_by_id(account_id).await?;

        if record.status == AccountStatus::Locked {
            return Err(AuthError::AccountLocked);
        }

        if !self.verify_password(old_password, &record.password).await? {
            tracing::info!(account_id = %account_id, "Password change refused: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let digest = self.hash_password(new_password).await?;
        // A failure between these two calls leaves the old password in force.
        let revoked = self.store.revoke_account_tokens(account_id).await?;
        self.store.update_password(account_id, digest).await?;

        tracing::info!(
            account_id = %account_id,
            revoked_sessions = revoked,
            "Password changed"
        );

        Ok(())
    }

    async fn set_account_status(
        &self,
        account_id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), AuthError> {
        self.store.set_status(account_id, status).await?;

        let revoked = if status == AccountStatus::Locked {
            self.store.revoke_account_tokens(account_id).await?
        } else {
            0
        };

        tracing::info!(
            account_id = %account_id,
            status = %status,
            revoked_sessions = revoked,
            "Account status changed"
        );

        Ok(())
    }

    async fn current_account(&self, token: &SessionToken) -> Result<Account, AuthError> {
        let session = self.load_session(token).await?;
        let record = self.store.find_by_id(&session.account_id).await?;

        Ok(Account::from(&record))
    }

    async fn require_kind(
        &self,
        token: &SessionToken,
        kind: AccountKind,
    ) -> Result<AccountId, AuthError> {
        let session = self.load_session(token).await?;

        if session.kind != kind {
            return Err(AuthError::WrongAccountKind {
                required: kind,
                actual: session.kind,
            });
        }

        Ok(session.account_id)
    }
}
