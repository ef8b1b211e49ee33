//! Per-user OAuth token storage.
//!
//! One record per Slack user id; the latest authorization overwrites any
//! earlier token for that user.

use std::sync::Arc;

use async_trait::async_trait;

use super::config::{AppConfig, TokenStoreConfig};
use crate::errors::RelayError;
use crate::infrastructure::aws::SsmTokenStore;
use crate::infrastructure::persistence::SqliteTokenStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create whatever backing structure the store needs. Safe to call on
    /// every start.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backing store cannot be reached.
    async fn initialize(&self) -> Result<(), RelayError>;

    /// Insert the token for `slack_user_id`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the write does not complete.
    async fn upsert(&self, slack_user_id: &str, access_token: &str) -> Result<(), RelayError>;

    /// `Ok(None)` means the user has not authorized the app yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the read does not complete.
    async fn lookup(&self, slack_user_id: &str) -> Result<Option<String>, RelayError>;
}

/// Build the configured store. Does not call [`CredentialStore::initialize`].
pub async fn open_token_store(config: &AppConfig) -> Arc<dyn CredentialStore> {
    match &config.token_store {
        TokenStoreConfig::Sqlite { path } => Arc::new(SqliteTokenStore::new(path.clone())),
        TokenStoreConfig::Ssm { param_prefix } => {
            let shared = aws_config::from_env().load().await;
            Arc::new(SsmTokenStore::new(
                aws_sdk_ssm::Client::new(&shared),
                param_prefix.clone(),
            ))
        }
    }
}
