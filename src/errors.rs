use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to parse Slack request: {0}")]
    ParseError(String),

    #[error("User {0} has not authorized the app")]
    NotAuthorized(String),

    #[error("Token storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Slack API call failed: {0}")]
    UpstreamCallFailed(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Reasons an inbound webhook is rejected before its body is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing X-Slack-Signature or X-Slack-Request-Timestamp header")]
    MissingHeaders,

    #[error("request timestamp outside the replay window")]
    StaleRequest,

    #[error("signature does not match request body")]
    InvalidSignature,
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::HttpError(error.to_string())
    }
}

impl From<rusqlite::Error> for RelayError {
    fn from(error: rusqlite::Error) -> Self {
        RelayError::StorageUnavailable(error.to_string())
    }
}

impl<E> From<aws_sdk_ssm::error::SdkError<E>> for RelayError
where
    E: std::error::Error + 'static,
{
    fn from(error: aws_sdk_ssm::error::SdkError<E>) -> Self {
        RelayError::StorageUnavailable(aws_sdk_ssm::error::DisplayErrorContext(&error).to_string())
    }
}
