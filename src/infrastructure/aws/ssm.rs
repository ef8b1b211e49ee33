use async_trait::async_trait;
use aws_sdk_ssm::{Client as SsmClient, types::ParameterType};
use tracing::{debug, warn};

use crate::core::user_tokens::CredentialStore;
use crate::errors::RelayError;

/// Token store backed by SSM Parameter Store, one `SecureString` per user.
#[derive(Debug, Clone)]
pub struct SsmTokenStore {
    client: SsmClient,
    param_prefix: String,
}

impl SsmTokenStore {
    #[must_use]
    pub fn new(client: SsmClient, param_prefix: impl Into<String>) -> Self {
        Self {
            client,
            param_prefix: param_prefix.into(),
        }
    }

    fn key_for_user(&self, slack_user_id: &str) -> String {
        key_for_user(&self.param_prefix, slack_user_id)
    }
}

pub(crate) fn key_for_user(prefix: &str, slack_user_id: &str) -> String {
    let mut p = prefix.to_string();
    if !p.ends_with('/') {
        p.push('/');
    }
    format!("{p}{slack_user_id}")
}

#[async_trait]
impl CredentialStore for SsmTokenStore {
    async fn initialize(&self) -> Result<(), RelayError> {
        // Parameters are created on first write; only the prefix needs checking.
        if !self.param_prefix.starts_with('/') {
            return Err(RelayError::ConfigError(format!(
                "USER_TOKEN_PARAM_PREFIX must start with '/', got '{}'",
                self.param_prefix
            )));
        }
        debug!(prefix = %self.param_prefix, "SSM token store ready");
        Ok(())
    }

    async fn upsert(&self, slack_user_id: &str, access_token: &str) -> Result<(), RelayError> {
        self.client
            .put_parameter()
            .name(self.key_for_user(slack_user_id))
            .value(access_token)
            .r#type(ParameterType::SecureString)
            .overwrite(true)
            .send()
            .await?;
        Ok(())
    }

    async fn lookup(&self, slack_user_id: &str) -> Result<Option<String>, RelayError> {
        let result = self
            .client
            .get_parameter()
            .name(self.key_for_user(slack_user_id))
            .with_decryption(true)
            .send()
            .await;

        match result {
            Ok(resp) => Ok(resp
                .parameter
                .and_then(|param| param.value)
                .filter(|v| !v.is_empty())),
            Err(e) => {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found())
                {
                    return Ok(None);
                }
                warn!(user_id = %slack_user_id, "SSM get_parameter failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::key_for_user;

    #[test]
    fn test_key_for_user_adds_separator() {
        assert_eq!(key_for_user("/relay/tokens", "U1"), "/relay/tokens/U1");
        assert_eq!(key_for_user("/relay/tokens/", "U1"), "/relay/tokens/U1");
    }
}
