use std::sync::Arc;

use reqwest::Client as HttpClient;

use super::signature::SignatureVerifier;
use crate::core::config::AppConfig;
use crate::core::user_tokens::{CredentialStore, open_token_store};
use crate::errors::RelayError;
use crate::slack::client::http_client;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub verifier: SignatureVerifier,
    pub store: Arc<dyn CredentialStore>,
    pub http: HttpClient,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when the verifier cannot be built from `config`.
    pub fn new(config: AppConfig, store: Arc<dyn CredentialStore>) -> Result<Self, RelayError> {
        let verifier = SignatureVerifier::from_config(&config).map_err(RelayError::ConfigError)?;
        Ok(Self {
            config,
            verifier,
            store,
            http: http_client(),
        })
    }

    /// Open and initialize the configured token store, then build the state.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the store cannot be initialized.
    pub async fn bootstrap(config: AppConfig) -> Result<Self, RelayError> {
        let store = open_token_store(&config).await;
        store.initialize().await?;
        Self::new(config, store)
    }
}
