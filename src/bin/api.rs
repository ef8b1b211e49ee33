use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use slack_relay::api::{AppState, function_handler};
use slack_relay::core::config::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    slack_relay::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let state = Arc::new(AppState::bootstrap(config).await.map_err(|e| {
        error!("Startup failed: {}", e);
        Error::from(e)
    })?);
    info!(
        verification_enforced = state.verifier.is_enforcing(),
        "Slack relay ready"
    );

    run(service_fn(move |event: LambdaEvent<Value>| {
        let state = Arc::clone(&state);
        async move { function_handler(&state, event).await }
    }))
    .await
}
