//! Session credential types.

use serde::{Deserialize, Serialize};

/// An access/refresh token pair issued by the backend.
///
/// Both tokens travel in response headers (`Authorization` and
/// `Refresh-Token`) on login and reissue; neither appears in a body.
/// The pair is ephemeral in memory — persistence is handled by the
/// client's token store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token attached to authenticated requests.
    pub access_token: String,
    /// Long-lived refresh token exchanged for a new pair on expiry.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns true if both tokens are present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}
