//! Handler for the `/relay` slash command.
//!
//! `/relay [#channel] message` posts `message` as the invoking user.

use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::helpers::ok_ephemeral;
use super::oauth::build_authorize_url;
use super::parsing::{parse_relay_text, parse_slack_event};
use super::state::AppState;
use crate::errors::RelayError;
use crate::slack::SlackClient;

pub const USAGE: &str = "Usage: `/relay [#channel] your message`";

/// Handle a verified slash command body.
///
/// # Errors
///
/// Returns `ParseError` for a malformed body and `StorageUnavailable` when the
/// token store cannot be read. Everything else becomes an ephemeral reply.
pub async fn handle_slash_command(state: &AppState, body: &[u8]) -> Result<Value, RelayError> {
    let slack_event = parse_slack_event(body)?;
    if slack_event.user_id.is_empty() {
        return Err(RelayError::ParseError("missing user_id".to_string()));
    }

    let command = parse_relay_text(&slack_event.text);
    if command.text.is_empty() {
        return Ok(ok_ephemeral(USAGE));
    }

    let Some(token) = state.store.lookup(&slack_event.user_id).await? else {
        info!(user_id = %slack_event.user_id, "No stored token, prompting for authorization");
        return Ok(not_authorized_reply(state, &slack_event.user_id));
    };

    let destination = command
        .channel_id
        .clone()
        .or_else(|| state.config.default_channel_id.clone())
        .unwrap_or_else(|| slack_event.channel_id.clone());
    if destination.is_empty() {
        return Ok(ok_ephemeral(USAGE));
    }

    let client = SlackClient::with_http(token, state.http.clone())
        .with_base_url(&state.config.slack_api_base);
    let posted = client
        .post_message(&destination, &command.text)
        .await
        .and_then(|resp| resp.into_result());

    match posted {
        Ok(resp) => {
            let channel = resp.channel.unwrap_or(destination);
            info!(user_id = %slack_event.user_id, channel = %channel, "Relayed message");
            Ok(ok_ephemeral(&format!("Posted to <#{channel}>.")))
        }
        Err(e) => {
            warn!(user_id = %slack_event.user_id, channel = %destination, error = %e, "Relay failed");
            Ok(ok_ephemeral(&format!("Couldn't post your message: {e}")))
        }
    }
}

fn not_authorized_reply(state: &AppState, user_id: &str) -> Value {
    let reason = RelayError::NotAuthorized(user_id.to_string());
    match build_authorize_url(&state.config, &Uuid::new_v4().to_string()) {
        Ok(url) => ok_ephemeral(&format!(
            "{reason}. <{url}|Authorize Slack Relay> first, then try again."
        )),
        Err(e) => {
            error!("Cannot build authorize link: {}", e);
            ok_ephemeral(&format!(
                "{reason}, and the authorization link is not configured. Please contact your administrator."
            ))
        }
    }
}
