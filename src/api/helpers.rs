//! Response builders shared by the API handlers.
//!
//! Responses use the API Gateway proxy shape: `statusCode`, optional
//! `headers`, and a string `body`.

use serde_json::{Value, json};

use crate::slack::response_builder::create_ephemeral_payload;

/// Returns a 200 OK response with the given JSON body.
#[must_use]
pub fn ok_json(body: &Value) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "application/json" },
        "body": body.to_string()
    })
}

/// Returns a 200 OK response with an ephemeral Slack message.
#[must_use]
pub fn ok_ephemeral(text: &str) -> Value {
    ok_json(&create_ephemeral_payload(text))
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": message }).to_string()
    })
}

/// Returns a 302 redirect response.
#[must_use]
pub fn redirect(url: &str) -> Value {
    json!({
        "statusCode": 302,
        "headers": { "Location": url },
        "body": ""
    })
}

/// Returns an HTML response.
#[must_use]
pub fn html(status_code: u16, body: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "text/html; charset=utf-8" },
        "body": body
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_response_shape() {
        let resp = err_response(401, "Invalid Slack signature");
        assert_eq!(resp["statusCode"], 401);
        let body: Value = serde_json::from_str(resp["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["error"], "Invalid Slack signature");
    }

    #[test]
    fn test_redirect_sets_location() {
        let resp = redirect("https://slack.com/oauth/v2/authorize");
        assert_eq!(resp["statusCode"], 302);
        assert_eq!(resp["headers"]["Location"], "https://slack.com/oauth/v2/authorize");
    }
}
