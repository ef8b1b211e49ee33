//! Handler for Slack Events API callbacks.
//!
//! The relay does not react to events; it answers the one-time
//! `url_verification` handshake and acknowledges everything else so Slack
//! does not retry.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::helpers::{err_response, ok_json};

/// Handle a verified Events API body.
#[must_use]
pub fn handle_event_callback(body: &Value) -> Value {
    let body_type = body.get("type").and_then(Value::as_str).unwrap_or("");

    match body_type {
        "url_verification" => {
            let Some(challenge) = body.get("challenge").and_then(Value::as_str) else {
                warn!("url_verification without challenge");
                return err_response(400, "Missing challenge");
            };
            info!("Answering url_verification challenge");
            ok_json(&json!({ "challenge": challenge }))
        }
        "event_callback" => {
            let event_type = body
                .get("event")
                .and_then(|e| e.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            info!(event_type = %event_type, "Slack event received");
            ok_json(&json!({ "ok": true }))
        }
        other => {
            info!(body_type = %other, "Ignoring Slack payload");
            ok_json(&json!({ "ok": true }))
        }
    }
}
