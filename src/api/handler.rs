//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Health and greeting routes
//! - The install page and OAuth routes (not signed by Slack)
//! - Signature verification for every Slack-signed route
//! - Event callbacks (delegated to `event_handler`)
//! - Slash commands (delegated to `slash_handler`)

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use super::{event_handler, helpers, oauth, parsing, slash_handler};
use super::state::AppState;
use crate::errors::{RelayError, SignatureError};
use crate::views;

/// Lambda entry point. `state` is built once at cold start.
///
/// # Errors
///
/// Never fails on bad requests; those become error responses.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler(
    state: &AppState,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    Ok(route(state, &event.payload).await)
}

/// Route one API Gateway / function URL event to its handler.
pub async fn route(state: &AppState, payload: &Value) -> Value {
    let method = parsing::request_method(payload);
    let raw_path = parsing::request_path(payload).unwrap_or("/");
    info!(method = %method, raw_path = %raw_path, "Request");
    let path = raw_path.trim_end_matches('/');

    // ========================================================================
    // Unsigned routes
    // ========================================================================

    match (method.as_str(), path) {
        ("GET", "") => {
            return helpers::ok_json(&json!({"status": "ok", "message": "Slack relay running"}));
        }
        ("GET", p) if p.ends_with("/greet") => {
            return helpers::ok_json(&json!({"message": "Good morning everyone"}));
        }
        ("GET", p) if p.ends_with("/install") => return handle_install(state),
        ("GET", p) if p.ends_with("/auth/slack/start") => return handle_oauth_start(state),
        ("GET", p) if p.ends_with("/auth/slack/callback") => {
            return handle_oauth_callback(state, payload).await;
        }
        _ => {}
    }

    // ========================================================================
    // Slack-signed routes
    // ========================================================================

    let is_events = path.ends_with("/slack/events");
    let is_commands = path.ends_with("/slack/commands");
    if method != "POST" || !(is_events || is_commands) {
        return helpers::err_response(404, "Not found");
    }

    // An undecodable body is still checked against the signature headers, so
    // an unsigned request is a 401 whatever its body looks like.
    let body = parsing::raw_body(payload);
    if let Err(reason) = verify_request(state, payload, body.as_deref().unwrap_or_default()) {
        return helpers::err_response(401, &reason.to_string());
    }

    let body = match body {
        Ok(b) => b,
        Err(e) => {
            error!("Unreadable request body: {}", e);
            return helpers::err_response(400, &e.to_string());
        }
    };

    if is_events {
        let Ok(json_body) = serde_json::from_slice::<Value>(&body) else {
            return helpers::err_response(400, "Events payload is not JSON");
        };
        return event_handler::handle_event_callback(&json_body);
    }

    match slash_handler::handle_slash_command(state, &body).await {
        Ok(response) => response,
        Err(e @ RelayError::StorageUnavailable(_)) => {
            error!("Token lookup failed: {}", e);
            helpers::err_response(500, "Token storage unavailable")
        }
        Err(e) => {
            error!("Failed to handle slash command: {}", e);
            helpers::err_response(400, &format!("Parse Error: {e}"))
        }
    }
}

fn verify_request(state: &AppState, payload: &Value, body: &[u8]) -> Result<(), SignatureError> {
    let empty = Value::Null;
    let headers = payload.get("headers").unwrap_or(&empty);
    let timestamp = parsing::get_header_value(headers, "X-Slack-Request-Timestamp");
    let signature = parsing::get_header_value(headers, "X-Slack-Signature");
    let now = chrono::Utc::now().timestamp();

    state.verifier.verify(timestamp, signature, body, now)
}

// ============================================================================
// Install page and OAuth
// ============================================================================

fn new_state() -> String {
    Uuid::new_v4().to_string()
}

fn handle_install(state: &AppState) -> Value {
    match oauth::build_authorize_url(&state.config, &new_state()) {
        Ok(url) => helpers::html(200, &views::install_page(&url)),
        Err(e) => {
            error!("Install page unavailable: {}", e);
            helpers::html(500, &views::oauth_failure_page("OAuth is not configured."))
        }
    }
}

fn handle_oauth_start(state: &AppState) -> Value {
    match oauth::build_authorize_url(&state.config, &new_state()) {
        Ok(url) => helpers::redirect(&url),
        Err(e) => {
            error!("OAuth failed: {}", e);
            helpers::err_response(
                500,
                "OAuth configuration error: SLACK_REDIRECT_URL is not set. Please contact your administrator.",
            )
        }
    }
}

async fn handle_oauth_callback(state: &AppState, payload: &Value) -> Value {
    if let Some(denied) = parsing::query_param(payload, "error") {
        info!(error = %denied, "User did not authorize");
        return helpers::html(400, &views::oauth_failure_page(&format!("Slack said: {denied}")));
    }

    // state is not round-tripped; the callback trusts any code Slack hands back.
    let Some(code) = parsing::query_param(payload, "code").filter(|c| !c.is_empty()) else {
        return helpers::html(400, &views::oauth_failure_page("Missing authorization code."));
    };

    match oauth::handle_callback(&state.config, state.store.as_ref(), &state.http, &code).await {
        Ok(user_id) => helpers::html(200, &views::oauth_success_page(&user_id)),
        Err(e @ RelayError::StorageUnavailable(_)) => {
            error!("OAuth callback could not store token: {}", e);
            helpers::html(500, &views::oauth_failure_page("Could not save your authorization."))
        }
        Err(e @ RelayError::ConfigError(_)) => {
            error!("OAuth callback failed: {}", e);
            helpers::html(500, &views::oauth_failure_page("OAuth is not configured."))
        }
        Err(e) => {
            error!("OAuth callback failed: {}", e);
            helpers::html(400, &views::oauth_failure_page(&e.to_string()))
        }
    }
}
