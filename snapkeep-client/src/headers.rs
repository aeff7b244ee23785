//! Auth header names and formatting.
//!
//! The backend carries tokens in headers, never bodies: requests attach
//! `Authorization: Bearer <access>` (and `Refresh-Token: Bearer <refresh>`
//! on reissue), and login/reissue responses return the new pair in the
//! same two headers. The `Bearer` convention lives here and nowhere else.

/// Request/response header carrying the access token.
pub const AUTHORIZATION: &str = "Authorization";

/// Request/response header carrying the refresh token.
pub const REFRESH_TOKEN: &str = "Refresh-Token";

/// Formats a token as a `Bearer` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Strips an optional `Bearer ` prefix from a header value.
///
/// Response headers have been observed both with and without the prefix;
/// the stored token is always the bare value.
pub fn strip_bearer(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value)
}
