//! Single-flight token refresh.
//!
//! All 401 recovery funnels through one [`RefreshCoordinator`]. However
//! many requests hit 401 concurrently, at most one reissue call is in
//! flight at a time: the first caller starts it, every later caller
//! attaches to the same shared future and observes the same outcome.
//! The underlying refresh runs on a spawned task, so a caller that gives
//! up waiting cannot abort a refresh other callers depend on.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::config::Environment;
use crate::descriptor::Method;
use crate::error::NetworkError;
use crate::headers::{bearer, strip_bearer, AUTHORIZATION, REFRESH_TOKEN};
use crate::token_store::{TokenKind, TokenStore};
use crate::transport::{HttpTransport, WireRequest};
use snapkeep_core::TokenPair;

/// Path of the token reissue endpoint.
pub(crate) const REISSUE_PATH: &str = "/token/reissue";

// ============================================================================
// Refresh Outcome
// ============================================================================

/// Result of a refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new token pair was obtained and stored.
    Renewed,
    /// No new tokens; the session is over.
    Denied(DenyReason),
}

impl RefreshOutcome {
    /// Returns true if a new token pair was stored.
    pub fn is_renewed(&self) -> bool {
        matches!(self, Self::Renewed)
    }
}

/// Why a refresh produced no new tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// There was no stored refresh token to present. No network call
    /// was made and stored state is untouched.
    NoRefreshToken,
    /// The reissue call failed or returned an unusable response. All
    /// stored credentials have been wiped.
    Rejected,
}

// ============================================================================
// Refresh Coordinator
// ============================================================================

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Serializes token refresh attempts across the whole client.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn HttpTransport>,
    reissue_url: Url,
    inflight: Mutex<Option<SharedRefresh>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator for the given environment.
    pub fn new(
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn HttpTransport>,
        environment: Environment,
    ) -> Result<Self, NetworkError> {
        let reissue_url = Url::parse(environment.base_url())
            .and_then(|base| base.join(REISSUE_PATH))
            .map_err(|e| NetworkError::UrlBuild(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                store,
                transport,
                reissue_url,
                inflight: Mutex::new(None),
            }),
        })
    }

    /// Attempts to obtain a fresh token pair, coalescing concurrent calls.
    ///
    /// Returns [`RefreshOutcome::Renewed`] once the new pair is stored.
    /// On [`DenyReason::Rejected`] every stored credential has already
    /// been wiped, so the caller can fail closed and surface login.
    pub async fn ensure_valid_token(&self) -> RefreshOutcome {
        let shared = {
            let mut slot = self.inner.inflight.lock().await;

            if let Some(existing) = slot.as_ref() {
                debug!("Refresh already in flight, attaching");
                existing.clone()
            } else {
                let refresh_token = match self.inner.store.read(TokenKind::Refresh).await {
                    Ok(Some(token)) if !token.is_empty() => token,
                    Ok(_) => {
                        debug!("No stored refresh token, skipping reissue");
                        return RefreshOutcome::Denied(DenyReason::NoRefreshToken);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read refresh token");
                        return RefreshOutcome::Denied(DenyReason::NoRefreshToken);
                    }
                };

                // The refresh runs detached so waiter cancellation cannot
                // kill it. The task clears the in-flight slot itself,
                // strictly before any waiter observes the outcome.
                let inner = Arc::clone(&self.inner);
                let handle = tokio::spawn(async move {
                    let outcome = inner.run_refresh(&refresh_token).await;
                    *inner.inflight.lock().await = None;
                    outcome
                });

                let shared: SharedRefresh = async move {
                    handle
                        .await
                        .unwrap_or(RefreshOutcome::Denied(DenyReason::Rejected))
                }
                .boxed()
                .shared();

                *slot = Some(shared.clone());
                shared
            }
        };

        shared.await
    }
}

impl Inner {
    /// Performs one reissue round trip and updates the store.
    async fn run_refresh(&self, refresh_token: &str) -> RefreshOutcome {
        debug!("Requesting token reissue");

        let request = WireRequest {
            method: Method::Post,
            url: self.reissue_url.clone(),
            headers: vec![(REFRESH_TOKEN.to_string(), bearer(refresh_token))],
            body: None,
        };

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token reissue transport failure");
                return self.deny().await;
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "Token reissue rejected");
            return self.deny().await;
        }

        let pair = match (response.header(AUTHORIZATION), response.header(REFRESH_TOKEN)) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                TokenPair::new(strip_bearer(access), strip_bearer(refresh))
            }
            _ => {
                warn!("Token reissue response missing token headers");
                return self.deny().await;
            }
        };

        if let Err(e) = self.store.replace_pair(&pair).await {
            warn!(error = %e, "Failed to store reissued tokens");
            return self.deny().await;
        }

        debug!("Token pair renewed");
        RefreshOutcome::Renewed
    }

    /// Fail-closed path: a failed refresh invalidates the whole session.
    async fn deny(&self) -> RefreshOutcome {
        if let Err(e) = self.store.wipe().await {
            warn!(error = %e, "Failed to wipe credentials after rejected refresh");
        }
        RefreshOutcome::Denied(DenyReason::Rejected)
    }
}

// ============================================================================
// Tests
// ============================================================================
