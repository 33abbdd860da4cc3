pub mod memory;
pub mod postgres;

use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

pub use memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;

use crate::config::Config;
use crate::config::StoreBackend;
use crate::credential::errors::StoreError;
use crate::credential::ports::CredentialStore;

/// Build the credential store selected by configuration.
///
/// PostgreSQL stores are migrated before being returned.
///
/// # Errors
/// * `Unavailable` - Database section missing, unreachable, or migration failed
pub async fn connect(config: &Config) -> Result<Arc<dyn CredentialStore>, StoreError> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!(backend = "memory", "Using in-memory credential store");
            Ok(Arc::new(InMemoryCredentialStore::new()))
        }
        StoreBackend::Postgres => {
            let database = config.database.as_ref().ok_or_else(|| {
                tracing::error!("store.backend is postgres but no [database] section is set");
                StoreError::Unavailable {
                    operation: "connect",
                }
            })?;

            let store = PostgresCredentialStore::connect(database).await?;
            store.migrate().await?;

            tracing::info!(backend = "postgres", "Using PostgreSQL credential store");
            Ok(Arc::new(store))
        }
    }
}

/// Expiry of a session issued at `issued_at` for `ttl`.
///
/// # Errors
/// * `TtlOutOfRange` - `ttl` is not positive or the sum overflows
pub(crate) fn session_expiry(
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<DateTime<Utc>, StoreError> {
    if ttl <= Duration::zero() {
        return Err(StoreError::TtlOutOfRange);
    }

    issued_at
        .checked_add_signed(ttl)
        .ok_or(StoreError::TtlOutOfRange)
}
