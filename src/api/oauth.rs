use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::models::OAuthGrant;
use crate::core::user_tokens::CredentialStore;
use crate::errors::RelayError;

/// Bot scopes requested at install time.
const BOT_SCOPES: &[&str] = &["commands"];
/// Scopes granted to the per-user token; posting as the user is all we do.
const USER_SCOPES: &[&str] = &["chat:write"];

fn redirect_url(config: &AppConfig) -> Result<&str, RelayError> {
    config.slack_redirect_url.as_deref().ok_or_else(|| {
        RelayError::ConfigError("SLACK_REDIRECT_URL is not set".to_string())
    })
}

/// # Errors
/// Returns `ConfigError` when `SLACK_REDIRECT_URL` is not configured.
pub fn build_authorize_url(config: &AppConfig, state: &str) -> Result<String, RelayError> {
    let client_id = utf8_percent_encode(&config.slack_client_id, NON_ALPHANUMERIC);
    let scopes = BOT_SCOPES.join(",");
    let user_scopes = USER_SCOPES.join(",");
    let redirect_uri = utf8_percent_encode(redirect_url(config)?, NON_ALPHANUMERIC);
    let state = utf8_percent_encode(state, NON_ALPHANUMERIC);
    Ok(format!(
        "https://slack.com/oauth/v2/authorize?client_id={client_id}&scope={scopes}&user_scope={user_scopes}&redirect_uri={redirect_uri}&state={state}"
    ))
}

/// Pull the user id and user token out of an `oauth.v2.access` response.
///
/// # Errors
/// Returns `UpstreamCallFailed` when Slack reports `ok: false`, and
/// `ParseError` when either field is missing.
pub fn parse_access_response(body: &Value) -> Result<OAuthGrant, RelayError> {
    if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        let err = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(RelayError::UpstreamCallFailed(format!("oauth error: {err}")));
    }

    let authed_user = body.get("authed_user");
    let field = |name: &str| {
        authed_user
            .and_then(|u| u.get(name))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| RelayError::ParseError(format!("oauth: missing authed_user.{name}")))
    };

    Ok(OAuthGrant {
        user_id: field("id")?,
        access_token: field("access_token")?,
    })
}

/// Exchange the OAuth code for a user token.
///
/// # Errors
/// Returns an error if the HTTP call fails or Slack does not issue a user token.
pub async fn exchange_code(
    config: &AppConfig,
    http: &HttpClient,
    code: &str,
) -> Result<OAuthGrant, RelayError> {
    let payload = [
        ("code", code),
        ("client_id", config.slack_client_id.as_str()),
        ("client_secret", config.slack_client_secret.as_str()),
        ("redirect_uri", redirect_url(config)?),
    ];

    let resp = http
        .post(format!("{}/oauth.v2.access", config.slack_api_base))
        .form(&payload)
        .send()
        .await
        .map_err(|e| RelayError::HttpError(format!("oauth.v2.access request: {e}")))?;

    let body: Value = resp
        .json()
        .await
        .map_err(|e| RelayError::UpstreamCallFailed(format!("oauth.v2.access parse: {e}")))?;

    parse_access_response(&body)
}

/// Exchange the OAuth code for a user token and persist it.
///
/// # Errors
/// Returns an error if the exchange fails or the token cannot be persisted.
pub async fn handle_callback(
    config: &AppConfig,
    store: &dyn CredentialStore,
    http: &HttpClient,
    code: &str,
) -> Result<String, RelayError> {
    let grant = exchange_code(config, http, code).await?;
    store.upsert(&grant.user_id, &grant.access_token).await?;
    info!(user_id = %grant.user_id, "Stored user token");
    Ok(grant.user_id)
}
