use std::sync::Arc;

use serde_json::{Value, json};
use slack_relay::api::signature::compute_signature;
use slack_relay::api::{AppState, route};
use slack_relay::core::config::{AppConfig, TokenStoreConfig, VerificationMode};
use slack_relay::core::user_tokens::CredentialStore;
use slack_relay::infrastructure::persistence::SqliteTokenStore;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "flow-signing-secret";

async fn state_against(server: &MockServer) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        slack_signing_secret: Some(SECRET.to_string()),
        verification_mode: VerificationMode::Enforce,
        slack_client_id: "123.456".to_string(),
        slack_client_secret: "client-secret".to_string(),
        slack_redirect_url: Some("https://relay.example.com/auth/slack/callback".to_string()),
        default_channel_id: None,
        token_store: TokenStoreConfig::Sqlite {
            path: dir.path().join("tokens.db"),
        },
        slack_api_base: server.uri(),
    };
    let store: Arc<dyn CredentialStore> =
        Arc::new(SqliteTokenStore::new(dir.path().join("tokens.db")));
    store.initialize().await.unwrap();
    (dir, AppState::new(config, store).unwrap())
}

fn relay_command(user_id: &str, text: &str) -> Value {
    let body = format!(
        "team_id=T1&channel_id=C0INVOKED&user_id={user_id}&command=%2Frelay&text={text}"
    );
    let timestamp = chrono::Utc::now().timestamp().to_string();
    json!({
        "rawPath": "/slack/commands",
        "requestContext": {"http": {"method": "POST"}},
        "headers": {
            "x-slack-request-timestamp": timestamp,
            "x-slack-signature": compute_signature(SECRET, &timestamp, body.as_bytes()),
        },
        "body": body,
        "isBase64Encoded": false
    })
}

fn callback(code: &str) -> Value {
    json!({
        "rawPath": "/auth/slack/callback",
        "rawQueryString": format!("code={code}&state=s"),
        "requestContext": {"http": {"method": "GET"}}
    })
}

fn reply_text(resp: &Value) -> String {
    let body: Value = serde_json::from_str(resp["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["response_type"], "ephemeral");
    body["text"].as_str().unwrap().to_string()
}

fn grant(user_id: &str, token: &str) -> Value {
    json!({
        "ok": true,
        "access_token": "xoxb-bot",
        "authed_user": {"id": user_id, "access_token": token, "scope": "chat:write"}
    })
}

#[tokio::test]
async fn test_command_posts_as_user_with_stored_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(header("authorization", "Bearer xoxp-user-1"))
        .and(body_partial_json(json!({"channel": "C1", "text": "hi"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "channel": "C1", "ts": "1700000000.000100"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, state) = state_against(&mock_server).await;
    state.store.upsert("U1", "xoxp-user-1").await.unwrap();

    // `<#C1|x> hi`
    let resp = route(&state, &relay_command("U1", "%3C%23C1%7Cx%3E+hi")).await;

    assert_eq!(resp["statusCode"], 200);
    assert_eq!(reply_text(&resp), "Posted to <#C1>.");
}

#[tokio::test]
async fn test_command_surfaces_slack_error_code() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": false, "error": "not_in_channel"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, state) = state_against(&mock_server).await;
    state.store.upsert("U1", "xoxp-user-1").await.unwrap();

    let resp = route(&state, &relay_command("U1", "%3C%23C1%7Cx%3E+hi")).await;

    assert_eq!(resp["statusCode"], 200);
    assert!(reply_text(&resp).contains("not_in_channel"));
}

#[tokio::test]
async fn test_unauthorized_user_never_reaches_slack() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (_dir, state) = state_against(&mock_server).await;

    let resp = route(&state, &relay_command("U-new", "hello")).await;
    assert!(reply_text(&resp).contains("has not authorized"));
}

#[tokio::test]
async fn test_callback_stores_grant_and_later_grant_overwrites() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth.v2.access"))
        .and(body_string_contains("code=first"))
        .and(body_string_contains("client_id=123.456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("U1", "xoxp-first")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth.v2.access"))
        .and(body_string_contains("code=second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("U1", "xoxp-second")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, state) = state_against(&mock_server).await;

    let resp = route(&state, &callback("first")).await;
    assert_eq!(resp["statusCode"], 200);
    assert!(resp["body"].as_str().unwrap().contains("U1"));
    assert_eq!(
        state.store.lookup("U1").await.unwrap().as_deref(),
        Some("xoxp-first")
    );

    let resp = route(&state, &callback("second")).await;
    assert_eq!(resp["statusCode"], 200);
    assert_eq!(
        state.store.lookup("U1").await.unwrap().as_deref(),
        Some("xoxp-second")
    );
}

#[tokio::test]
async fn test_rejected_exchange_stores_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth.v2.access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "invalid_code"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, state) = state_against(&mock_server).await;

    let resp = route(&state, &callback("stale")).await;

    assert_eq!(resp["statusCode"], 400);
    assert!(resp["body"].as_str().unwrap().contains("invalid_code"));
    assert_eq!(state.store.lookup("U1").await.unwrap(), None);
}
