//! Slack request signing (`X-Slack-Signature`, version `v0`).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{error, warn};

use crate::core::config::{AppConfig, VerificationMode};
use crate::errors::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum distance in seconds between the request timestamp and now.
pub const REPLAY_WINDOW_SECS: i64 = 300;

const VERSION: &str = "v0";

/// Verify one signed Slack request.
///
/// `body` must be the raw bytes Slack sent; re-serialized JSON or re-encoded
/// form data will not match.
///
/// # Errors
///
/// Returns the first failed check: missing headers, a timestamp outside the
/// replay window, or a signature that does not match.
pub fn verify_slack_signature(
    signing_secret: &str,
    timestamp: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        return Err(SignatureError::MissingHeaders);
    };

    let Ok(ts) = timestamp.trim().parse::<i64>() else {
        return Err(SignatureError::StaleRequest);
    };
    if now.abs_diff(ts) > REPLAY_WINDOW_SECS.unsigned_abs() {
        return Err(SignatureError::StaleRequest);
    }

    // Decoding the supplied value lets the MAC do the comparison, which is
    // constant-time over the digest bytes. Only the lowercase form Slack
    // sends is accepted.
    let supplied = signature
        .strip_prefix("v0=")
        .filter(|hex_sig| is_lower_hex(hex_sig))
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or(SignatureError::InvalidSignature)?;

    signing_mac(signing_secret, timestamp, body)
        .verify_slice(&supplied)
        .map_err(|_| SignatureError::InvalidSignature)
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Compute the `v0=<hex>` signature Slack would send for this request.
#[must_use]
pub fn compute_signature(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = signing_mac(signing_secret, timestamp, body).finalize();
    format!("{VERSION}={}", hex::encode(digest.into_bytes()))
}

fn signing_mac(signing_secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}

/// Gate every Slack-signed route goes through.
#[derive(Clone)]
pub struct SignatureVerifier {
    mode: Mode,
}

#[derive(Clone)]
enum Mode {
    Enforce { signing_secret: String },
    Disabled,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            Mode::Enforce { .. } => "enforce",
            Mode::Disabled => "disabled",
        };
        f.debug_struct("SignatureVerifier").field("mode", &mode).finish()
    }
}

impl SignatureVerifier {
    #[must_use]
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            mode: Mode::Enforce {
                signing_secret: signing_secret.into(),
            },
        }
    }

    /// A verifier that accepts everything. Logs a warning on construction.
    #[must_use]
    pub fn disabled() -> Self {
        warn!("Slack signature verification is DISABLED; every request will be trusted");
        Self {
            mode: Mode::Disabled,
        }
    }

    /// # Errors
    ///
    /// Fails when verification is enforced but no signing secret is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        match (config.verification_mode, &config.slack_signing_secret) {
            (VerificationMode::Disabled, _) => Ok(Self::disabled()),
            (VerificationMode::Enforce, Some(secret)) => Ok(Self::new(secret.clone())),
            (VerificationMode::Enforce, None) => {
                Err("SLACK_SIGNING_SECRET is required when verification is enforced".to_string())
            }
        }
    }

    #[must_use]
    pub fn is_enforcing(&self) -> bool {
        matches!(self.mode, Mode::Enforce { .. })
    }

    /// # Errors
    ///
    /// See [`verify_slack_signature`].
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now: i64,
    ) -> Result<(), SignatureError> {
        match &self.mode {
            Mode::Enforce { signing_secret } => {
                verify_slack_signature(signing_secret, timestamp, signature, body, now).inspect_err(
                    |reason| error!(%reason, "Slack signature verification failed"),
                )
            }
            Mode::Disabled => {
                warn!("Accepting request without signature verification");
                Ok(())
            }
        }
    }
}
