use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fields Slack sends with a slash command invocation.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SlackCommandEvent {
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// Decodes one `application/x-www-form-urlencoded` component.
///
/// `+` is a space; a literal plus arrives as `%2B` and survives.
///
/// # Examples
///
/// ```
/// use slack_relay::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("1%2B1").unwrap(), "1+1");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, String> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Parses a form-encoded body into key/value pairs. Later duplicates win.
///
/// # Errors
///
/// Returns an error if a key or value is not valid UTF-8 after decoding.
pub fn parse_form_pairs(form_data: &str) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();
    for pair in form_data.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key =
            decode_url_component(raw_key).map_err(|e| format!("Failed to decode key: {e}"))?;
        let value = decode_url_component(raw_value)
            .map_err(|e| format!("Failed to decode value: {e}"))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Parses the raw body of a slash command request.
///
/// Missing fields default to empty strings; callers decide which ones matter.
///
/// # Examples
///
/// ```
/// use slack_relay::slack::command_parser::parse_form_data;
///
/// let form_data = "team_id=T123&channel_id=C123&channel_name=general&\
///                  user_id=U123&command=%2Frelay&text=hi+there&\
///                  response_url=https%3A%2F%2Fhooks.slack.com%2F";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/relay");
/// assert_eq!(event.text, "hi there");
/// ```
///
/// # Errors
///
/// Returns an error if the body is not valid form encoding.
pub fn parse_form_data(form_data: &str) -> Result<SlackCommandEvent, String> {
    let mut map = parse_form_pairs(form_data)?;
    let mut take = |key: &str| map.remove(key).unwrap_or_default();

    Ok(SlackCommandEvent {
        team_id: take("team_id"),
        team_domain: take("team_domain"),
        channel_id: take("channel_id"),
        channel_name: take("channel_name"),
        user_id: take("user_id"),
        user_name: take("user_name"),
        command: take("command"),
        text: take("text"),
        response_url: take("response_url"),
        trigger_id: take("trigger_id"),
    })
}
