//! Error types for the snapkeep HTTP pipeline.
//!
//! [`NetworkError`] is the closed transport/HTTP taxonomy: every non-2xx
//! status and every transport failure maps onto exactly one variant, and
//! the mapping is identical for every endpoint family. Codec and storage
//! failures are deliberately separate types — they never enter the
//! refresh/retry path.

use thiserror::Error;

// ============================================================================
// Network Error
// ============================================================================

/// Closed taxonomy of transport and HTTP errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The request URL could not be constructed.
    #[error("Failed to build request URL: {0}")]
    UrlBuild(String),

    /// HTTP 400.
    #[error("Bad request")]
    BadRequest,

    /// HTTP 401. The only status the executor recovers from internally.
    #[error("Unauthorized")]
    Unauthorized,

    /// HTTP 403.
    #[error("Forbidden")]
    Forbidden,

    /// HTTP 404.
    #[error("Not found")]
    NotFound,

    /// HTTP 429.
    #[error("Too many requests")]
    TooManyRequests,

    /// HTTP 500.
    #[error("Server error")]
    ServerError,

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Any other non-2xx status.
    #[error("Unexpected status {0}")]
    Unexpected(u16),
}

impl NetworkError {
    /// Classifies an HTTP status code.
    ///
    /// Returns `None` for 2xx (not an error); every other code maps to
    /// exactly one variant. The table is total and deterministic:
    /// 400, 401, 403, 404, 429 and 500 get their named variants, anything
    /// else becomes [`NetworkError::Unexpected`].
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            429 => Some(Self::TooManyRequests),
            500 => Some(Self::ServerError),
            other => Some(Self::Unexpected(other)),
        }
    }

    /// Returns true if this error is the 401 variant.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

// ============================================================================
// Codec Errors
// ============================================================================

/// Error producing a request body.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// A parameter value cannot be represented in the selected encoding.
    #[error("Parameter '{0}' is not representable in this encoding")]
    NotRepresentable(String),

    /// JSON encoding failed.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error decoding a response body into its typed shape.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// The body did not match the statically expected shape.
    #[error("Response shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),

    /// An expected response header was absent.
    #[error("Response missing required header: {0}")]
    MissingHeader(&'static str),
}

// ============================================================================
// Store Error
// ============================================================================

/// Error accessing the secure token store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Access to the credential store was denied.
    #[error("Access denied to credential store")]
    AccessDenied,

    /// The credential store is unavailable on this platform.
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    /// Platform-specific failure.
    #[error("Credential store error: {0}")]
    Platform(String),
}

impl From<keyring::Error> for StoreError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoStorageAccess(_) => StoreError::AccessDenied,
            keyring::Error::PlatformFailure(e) => StoreError::Platform(e.to_string()),
            e => StoreError::Unavailable(e.to_string()),
        }
    }
}

// ============================================================================
// Api Error
// ============================================================================

/// Umbrella error returned by the executor's public surface.
///
/// Callers distinguish "needs login" ([`NetworkError::Unauthorized`] after
/// the single internal retry is exhausted) from transient/server failures
/// by matching on the [`ApiError::Network`] variant.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or HTTP error.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Request body could not be produced.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] SerializeError),

    /// Response body could not be decoded.
    #[error("Deserialization failed: {0}")]
    Deserialize(#[from] DeserializeError),

    /// Token store access failed.
    #[error("Token store error: {0}")]
    Store(#[from] StoreError),

    /// Core model error.
    #[error("Core error: {0}")]
    Core(#[from] snapkeep_core::CoreError),
}

impl ApiError {
    /// Returns true if the caller should route the user back to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Network(NetworkError::Unauthorized))
    }
}

// ============================================================================
// Tests
// ============================================================================
