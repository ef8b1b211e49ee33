use std::env;
use std::path::PathBuf;

use crate::slack::client::SLACK_API_BASE;

pub const DEFAULT_TOKEN_DB_PATH: &str = "slack_tokens.db";
pub const DEFAULT_USER_TOKEN_PARAM_PREFIX: &str = "/slack-relay/user_tokens/";

/// Whether inbound Slack requests must carry a valid signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMode {
    Enforce,
    /// Accept every request unverified. Local testing only.
    Disabled,
}

/// Where per-user access tokens are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreConfig {
    Sqlite { path: PathBuf },
    Ssm { param_prefix: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_signing_secret: Option<String>,
    pub verification_mode: VerificationMode,
    pub slack_client_id: String,
    pub slack_client_secret: String,
    pub slack_redirect_url: Option<String>,
    pub default_channel_id: Option<String>,
    pub token_store: TokenStoreConfig,
    /// Slack Web API root, without a trailing slash.
    pub slack_api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| format!("{key}: not set"));

        let verification_mode = match var("SLACK_SIGNATURE_VERIFICATION")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("enforce") => VerificationMode::Enforce,
            Some("disabled") => VerificationMode::Disabled,
            Some(other) => {
                return Err(format!(
                    "SLACK_SIGNATURE_VERIFICATION: expected 'enforce' or 'disabled', got '{other}'"
                ));
            }
        };

        let slack_signing_secret = var("SLACK_SIGNING_SECRET");
        if verification_mode == VerificationMode::Enforce && slack_signing_secret.is_none() {
            return Err(
                "SLACK_SIGNING_SECRET: not set (set SLACK_SIGNATURE_VERIFICATION=disabled to run unverified)"
                    .to_string(),
            );
        }

        let token_store = match var("TOKEN_STORE").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("sqlite") => TokenStoreConfig::Sqlite {
                path: PathBuf::from(
                    var("TOKEN_DB_PATH").unwrap_or_else(|| DEFAULT_TOKEN_DB_PATH.to_string()),
                ),
            },
            Some("ssm") => TokenStoreConfig::Ssm {
                param_prefix: var("USER_TOKEN_PARAM_PREFIX")
                    .unwrap_or_else(|| DEFAULT_USER_TOKEN_PARAM_PREFIX.to_string()),
            },
            Some(other) => {
                return Err(format!(
                    "TOKEN_STORE: expected 'sqlite' or 'ssm', got '{other}'"
                ));
            }
        };

        Ok(Self {
            slack_signing_secret,
            verification_mode,
            slack_client_id: required("SLACK_CLIENT_ID")?,
            slack_client_secret: required("SLACK_CLIENT_SECRET")?,
            slack_redirect_url: var("SLACK_REDIRECT_URL"),
            default_channel_id: var("SLACK_CHANNEL_ID"),
            token_store,
            slack_api_base: var("SLACK_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| SLACK_API_BASE.to_string()),
        })
    }
}

/// Settings for the scheduled greeting post, which runs with the bot token
/// and needs none of the OAuth app settings.
#[derive(Debug, Clone)]
pub struct GreetConfig {
    pub slack_bot_token: String,
    pub channel_id: String,
}

impl GreetConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("SLACK_BOT_TOKEN").filter(|v| !v.is_empty());
        let channel = lookup("SLACK_CHANNEL_ID").filter(|v| !v.is_empty());
        match (token, channel) {
            (Some(slack_bot_token), Some(channel_id)) => Ok(Self {
                slack_bot_token,
                channel_id,
            }),
            _ => Err("Missing SLACK_BOT_TOKEN or SLACK_CHANNEL_ID".to_string()),
        }
    }
}
