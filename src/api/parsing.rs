use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::models::RelayCommand;
use crate::errors::RelayError;
use crate::slack::command_parser::{SlackCommandEvent, parse_form_data};

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn parse_slack_event(body: &[u8]) -> Result<SlackCommandEvent, RelayError> {
    let form = std::str::from_utf8(body)
        .map_err(|e| RelayError::ParseError(format!("Body is not UTF-8: {e}")))?;
    parse_form_data(form)
        .map_err(|e| RelayError::ParseError(format!("Failed to parse form data: {e}")))
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Request path from a function-URL (`rawPath`) or REST API (`path`) event.
pub fn request_path(payload: &Value) -> Option<&str> {
    payload
        .get("rawPath")
        .and_then(Value::as_str)
        .or_else(|| payload.get("path").and_then(Value::as_str))
}

/// HTTP method from either event shape. Defaults to `GET`.
pub fn request_method(payload: &Value) -> String {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| payload.get("httpMethod").and_then(Value::as_str))
        .unwrap_or("GET")
        .to_ascii_uppercase()
}

/// A single query parameter, decoded.
pub fn query_param(payload: &Value, name: &str) -> Option<String> {
    if let Some(raw) = payload.get("rawQueryString").and_then(Value::as_str) {
        if let Some(v) = url::form_urlencoded::parse(raw.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
        {
            return Some(v);
        }
    }
    v_str(payload, &["queryStringParameters", name]).map(str::to_string)
}

/// The body exactly as Slack sent it.
///
/// API Gateway may hand the body over base64-encoded; the signature covers
/// the decoded bytes, so decode before verifying.
pub fn raw_body(payload: &Value) -> Result<Vec<u8>, RelayError> {
    let body = match payload.get("body") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => s,
        Some(_) => return Err(RelayError::ParseError("Invalid body format".to_string())),
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if encoded {
        STANDARD
            .decode(body)
            .map_err(|e| RelayError::ParseError(format!("Invalid base64 body: {e}")))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

/// Split `/relay` text into an optional leading channel and the message.
///
/// Accepts Slack's escaped mention `<#C123|general>` (or `<#C123>`) and a bare
/// `#C123` id. A plain `#general` name is left in the text; Slack only
/// resolves names to ids when "escape channels" is enabled on the command.
pub fn parse_relay_text(text: &str) -> RelayCommand {
    static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\s*(?:<#([CG][A-Z0-9]+)(?:\|[^>]*)?>|#([CG][A-Z0-9]{6,}))(?:\s+|$)")
            .expect("static regex compile")
    });

    if let Some(cap) = CHANNEL_RE.captures(text) {
        let channel = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str().to_string());
        let rest = &text[cap.get(0).map_or(0, |m| m.end())..];
        return RelayCommand {
            channel_id: channel,
            text: rest.trim().to_string(),
        };
    }

    RelayCommand {
        channel_id: None,
        text: text.trim().to_string(),
    }
}
