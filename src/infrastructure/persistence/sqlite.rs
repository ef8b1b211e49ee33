use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::core::user_tokens::CredentialStore;
use crate::errors::RelayError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed token store.
///
/// Each operation opens its own connection on the blocking pool and drops it
/// before returning, so no handle outlives a request.
#[derive(Debug, Clone)]
pub struct SqliteTokenStore {
    db_path: PathBuf,
}

impl SqliteTokenStore {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, RelayError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.db_path.clone();
        tokio::task::spawn_blocking(move || -> Result<T, RelayError> {
            let conn = open(&path)?;
            Ok(op(&conn)?)
        })
        .await
        .map_err(|e| RelayError::StorageUnavailable(format!("sqlite task: {e}")))?
    }
}

fn open(path: &Path) -> Result<Connection, RelayError> {
    let conn = Connection::open(path).map_err(|e| {
        RelayError::StorageUnavailable(format!("open {}: {e}", path.display()))
    })?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

#[async_trait]
impl CredentialStore for SqliteTokenStore {
    async fn initialize(&self) -> Result<(), RelayError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RelayError::StorageUnavailable(format!("create {}: {e}", parent.display()))
            })?;
        }

        self.with_connection(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS user_tokens (
                    user_id TEXT PRIMARY KEY,
                    access_token TEXT NOT NULL
                );",
            )
        })
        .await?;
        debug!(path = %self.db_path.display(), "user_tokens table ready");
        Ok(())
    }

    async fn upsert(&self, slack_user_id: &str, access_token: &str) -> Result<(), RelayError> {
        let user_id = slack_user_id.to_string();
        let token = access_token.to_string();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO user_tokens (user_id, access_token) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET access_token = excluded.access_token",
                params![user_id, token],
            )
        })
        .await?;
        Ok(())
    }

    async fn lookup(&self, slack_user_id: &str) -> Result<Option<String>, RelayError> {
        let user_id = slack_user_id.to_string();
        self.with_connection(move |conn| {
            conn.query_row(
                "SELECT access_token FROM user_tokens WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_before_initialize_is_storage_error_not_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTokenStore::new(dir.path().join("tokens.db"));

        let err = store.lookup("U1").await.unwrap_err();
        assert!(matches!(err, RelayError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_initialize_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.db");
        let store = SqliteTokenStore::new(&path);

        store.initialize().await.unwrap();
        assert!(path.exists());
    }
}
