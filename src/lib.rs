/// Slack Relay - post into Slack channels as yourself with a slash command.
///
/// Users authorize the app once through Slack OAuth; the issued user token is
/// stored against their Slack user id. Afterwards `/relay [#channel] text`
/// posts `text` as that user.
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda (function URL or API Gateway) for the HTTP surface
/// - Slack request signing to authenticate every inbound webhook
/// - SQLite or SSM Parameter Store for per-user tokens
/// - reqwest for the Slack Web API
///
/// # Example
///
/// ```no_run
/// use slack_relay::api::{AppState, route};
/// use slack_relay::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     slack_relay::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let state = AppState::bootstrap(config).await?;
///
///     let health = route(&state, &serde_json::json!({"rawPath": "/"})).await;
///     assert_eq!(health["statusCode"], 200);
///     Ok(())
/// }
/// ```
pub mod api;
pub mod core;
pub mod errors;
pub mod infrastructure;
pub mod slack;
pub mod views;

pub use errors::{RelayError, SignatureError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. Calling it more than once is harmless; later
/// calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// slack_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
