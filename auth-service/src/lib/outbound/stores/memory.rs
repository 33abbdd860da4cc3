use std::collections::HashMap;

use async_trait::async_trait;
use auth::TokenGenerator;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::credential::errors::StoreError;
use crate::credential::models::AccountId;
use crate::credential::models::AccountKind;
use crate::credential::models::AccountStatus;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Handle;
use crate::credential::models::PasswordDigest;
use crate::credential::models::Session;
use crate::credential::models::SessionToken;
use crate::credential::ports::CredentialStore;
use crate::outbound::stores::session_expiry;

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, CredentialRecord>,
    handles: HashMap<Handle, AccountId>,
    sessions: HashMap<SessionToken, Session>,
}

impl State {
    fn account_mut(&mut self, account_id: &AccountId) -> Result<&mut CredentialRecord, StoreError> {
        self.accounts.get_mut(account_id).ok_or(StoreError::NotFound)
    }
}

/// Process-local implementation of CredentialStore.
///
/// One lock guards all state, so every write (including the uniqueness check
/// in `create` and the collision check in `issue_token`) runs in a single
/// critical section. No I/O is performed and `Unavailable` is never returned.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
    tokens: TokenGenerator,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    /// Drop every account and session.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.accounts.clear();
        state.handles.clear();
        state.sessions.clear();
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_by_handle(&self, handle: &Handle) -> Result<CredentialRecord, StoreError> {
        let state = self.state.read().await;
        state
            .handles
            .get(handle)
            .and_then(|id| state.accounts.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, account_id: &AccountId) -> Result<CredentialRecord, StoreError> {
        self.state
            .read()
            .await
            .accounts
            .get(account_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(
        &self,
        handle: Handle,
        kind: AccountKind,
        password: PasswordDigest,
    ) -> Result<CredentialRecord, StoreError> {
        let mut state = self.state.write().await;

        if state.handles.contains_key(&handle) {
            return Err(StoreError::AlreadyExists);
        }

        let record = CredentialRecord {
            id: AccountId::new(),
            handle: handle.clone(),
            kind,
            password,
            status: AccountStatus::Active,
            created_at: Utc::now(),
            last_login_at: None,
        };

        state.handles.insert(handle, record.id);
        state.accounts.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update_password(
        &self,
        account_id: &AccountId,
        password: PasswordDigest,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.account_mut(account_id)?.password = password;
        Ok(())
    }

    async fn set_status(
        &self,
        account_id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.account_mut(account_id)?.status = status;
        Ok(())
    }

    async fn record_login(
        &self,
        account_id: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.account_mut(account_id)?.last_login_at = Some(at);
        Ok(())
    }

    async fn issue_token(
        &self,
        account_id: &AccountId,
        ttl: Duration,
    ) -> Result<Session, StoreError> {
        let mut state = self.state.write().await;

        let kind = match state.accounts.get(account_id) {
            None => return Err(StoreError::NotFound),
            Some(record) if record.status == AccountStatus::Locked => {
                return Err(StoreError::AccountLocked)
            }
            Some(record) => record.kind,
        };

        let issued_at = Utc::now();
        let expires_at = session_expiry(issued_at, ttl)?;

        let token = loop {
            let candidate = SessionToken::new(self.tokens.generate());
            if !state.sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = Session {
            token: token.clone(),
            account_id: *account_id,
            kind,
            issued_at,
            expires_at,
            revoked: false,
        };
        state.sessions.insert(token, session.clone());

        Ok(session)
    }

    async fn find_token(&self, token: &SessionToken) -> Result<Session, StoreError> {
        self.state
            .read()
            .await
            .sessions
            .get(token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn revoke_token(&self, token: &SessionToken) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let session = state.sessions.get_mut(token).ok_or(StoreError::NotFound)?;
        session.revoked = true;
        Ok(())
    }

    async fn revoke_account_tokens(&self, account_id: &AccountId) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let mut revoked = 0;

        for session in state
            .sessions
            .values_mut()
            .filter(|s| s.account_id == *account_id && !s.revoked)
        {
            session.revoked = true;
            revoked += 1;
        }

        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn digest() -> PasswordDigest {
        PasswordDigest::argon2id("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string())
    }

    fn handle(raw: &str) -> Handle {
        Handle::parse(raw).expect("Invalid handle")
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = InMemoryCredentialStore::new();

        let created = store
            .create(handle("alice"), AccountKind::User, digest())
            .await
            .unwrap();
        let by_handle = store.find_by_handle(&handle("ALICE")).await.unwrap();
        let by_id = store.find_by_id(&created.id).await.unwrap();

        assert_eq!(by_handle, created);
        assert_eq!(by_id, created);
        assert_eq!(created.status, AccountStatus::Active);
        assert!(created.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_colliding_handle() {
        let store = InMemoryCredentialStore::new();

        store
            .create(handle("Alice"), AccountKind::User, digest())
            .await
            .unwrap();
        let result = store
            .create(handle("alice"), AccountKind::Company, digest())
            .await;

        assert_eq!(result, Err(StoreError::AlreadyExists));
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_have_one_winner() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                let raw = if i % 2 == 0 { "Bob" } else { "bob" };
                tokio::spawn(async move {
                    store
                        .create(handle(raw), AccountKind::User, digest())
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::AlreadyExists) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
    }

    #[tokio::test]
    async fn test_updates_on_unknown_account() {
        let store = InMemoryCredentialStore::new();
        let unknown = AccountId::new();

        assert_eq!(
            store.update_password(&unknown, digest()).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(
            store.set_status(&unknown, AccountStatus::Locked).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(
            store.record_login(&unknown, Utc::now()).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(
            store.issue_token(&unknown, Duration::seconds(60)).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_issue_find_revoke_token() {
        let store = InMemoryCredentialStore::new();
        let account = store
            .create(handle("carol"), AccountKind::User, digest())
            .await
            .unwrap();

        let session = store
            .issue_token(&account.id, Duration::seconds(60))
            .await
            .unwrap();
        assert_eq!(session.expires_at - session.issued_at, Duration::seconds(60));
        assert!(!session.revoked);

        store.revoke_token(&session.token).await.unwrap();
        store.revoke_token(&session.token).await.unwrap();

        let found = store.find_token(&session.token).await.unwrap();
        assert!(found.revoked);
        assert_eq!(
            store.revoke_token(&SessionToken::new("unknown")).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_revoke_account_tokens_only_touches_that_account() {
        let store = InMemoryCredentialStore::new();
        let dave = store
            .create(handle("dave"), AccountKind::User, digest())
            .await
            .unwrap();
        let erin = store
            .create(handle("erin"), AccountKind::User, digest())
            .await
            .unwrap();

        for _ in 0..3 {
            store.issue_token(&dave.id, Duration::seconds(60)).await.unwrap();
        }
        let erin_session = store.issue_token(&erin.id, Duration::seconds(60)).await.unwrap();

        assert_eq!(store.revoke_account_tokens(&dave.id).await, Ok(3));
        assert_eq!(store.revoke_account_tokens(&dave.id).await, Ok(0));
        assert!(!store.find_token(&erin_session.token).await.unwrap().revoked);
    }

    #[tokio::test]
    async fn test_issue_token_refuses_locked_account() {
        let store = InMemoryCredentialStore::new();
        let account = store
            .create(handle("grace"), AccountKind::Company, digest())
            .await
            .unwrap();

        let session = store
            .issue_token(&account.id, Duration::seconds(60))
            .await
            .unwrap();
        assert_eq!(session.kind, AccountKind::Company);

        store
            .set_status(&account.id, AccountStatus::Locked)
            .await
            .unwrap();

        assert_eq!(
            store.issue_token(&account.id, Duration::seconds(60)).await,
            Err(StoreError::AccountLocked)
        );
        assert_eq!(store.revoke_account_tokens(&account.id).await, Ok(1));
    }

    #[tokio::test]
    async fn test_issue_token_rejects_unrepresentable_ttl() {
        let store = InMemoryCredentialStore::new();
        let account = store
            .create(handle("heidi"), AccountKind::User, digest())
            .await
            .unwrap();

        assert_eq!(
            store
                .issue_token(&account.id, Duration::seconds(100_000_000_000_000))
                .await,
            Err(StoreError::TtlOutOfRange)
        );
        assert_eq!(store.revoke_account_tokens(&account.id).await, Ok(0));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryCredentialStore::new();
        store
            .create(handle("frank"), AccountKind::User, digest())
            .await
            .unwrap();

        store.clear().await;

        assert_eq!(store.account_count().await, 0);
        assert_eq!(
            store.find_by_handle(&handle("frank")).await,
            Err(StoreError::NotFound)
        );
    }
}
