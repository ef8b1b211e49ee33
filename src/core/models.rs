/// Result of a successful `oauth.v2.access` exchange for a user token.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthGrant {
    pub user_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for OAuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthGrant")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// A `/relay` invocation after the text has been split into destination and
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayCommand {
    /// Channel named in the command text, if any.
    pub channel_id: Option<String>,
    pub text: String,
}
