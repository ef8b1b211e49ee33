//! Posts the morning greeting with the bot token. Meant for a scheduled job.

use anyhow::{Context, Result, anyhow};
use slack_relay::core::config::GreetConfig;
use slack_relay::slack::SlackClient;
use tracing::info;

const GREETING: &str = "Good morning everyone ☀️";

#[tokio::main]
async fn main() -> Result<()> {
    slack_relay::setup_logging();

    let config = GreetConfig::from_env().map_err(|e| anyhow!(e))?;
    let client = SlackClient::new(config.slack_bot_token);

    let resp = client
        .post_message(&config.channel_id, GREETING)
        .await
        .context("chat.postMessage")?;
    println!("{}", serde_json::json!({
        "ok": resp.ok,
        "channel": resp.channel,
        "ts": resp.ts,
        "error": resp.error,
    }));

    let resp = resp.into_result()?;
    info!(channel = ?resp.channel, "Greeting posted");
    Ok(())
}
