//! Request execution with transparent 401 recovery.
//!
//! [`ApiClient`] turns a [`RequestDescriptor`] into a wire request,
//! sends it, classifies the status, and decodes the body. A 401 on an
//! authenticated request triggers exactly one refresh-and-retry cycle
//! through the [`RefreshCoordinator`]; if the retry also fails the error
//! surfaces unchanged. Requests that do not require auth never enter
//! the recovery path.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::codec::encode_body;
use crate::config::{ClientSettings, Environment};
use crate::descriptor::RequestDescriptor;
use crate::endpoints;
use crate::error::{ApiError, DeserializeError, NetworkError};
use crate::headers::{bearer, strip_bearer, AUTHORIZATION, REFRESH_TOKEN};
use crate::refresh::RefreshCoordinator;
use crate::token_store::{KeyringTokenStore, TokenKind, TokenStore};
use crate::transport::{HttpTransport, ReqwestTransport, WireRequest, WireResponse};
use snapkeep_core::TokenPair;

// ============================================================================
// Api Client
// ============================================================================

/// The authenticated HTTP pipeline.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    refresh: RefreshCoordinator,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client with the production transport and keyring store.
    pub fn new(settings: &ClientSettings) -> Result<Self, NetworkError> {
        let transport = Arc::new(ReqwestTransport::new(settings)?);
        let store = Arc::new(KeyringTokenStore::new());
        Self::with_parts(transport, store, settings.environment)
    }

    /// Creates a client from injected collaborators.
    pub fn with_parts(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        environment: Environment,
    ) -> Result<Self, NetworkError> {
        let base_url = Url::parse(environment.base_url())
            .map_err(|e| NetworkError::UrlBuild(e.to_string()))?;
        let refresh =
            RefreshCoordinator::new(Arc::clone(&store), Arc::clone(&transport), environment)?;

        Ok(Self {
            transport,
            store,
            refresh,
            base_url,
        })
    }

    /// Sends a request and decodes the JSON response body.
    pub async fn send<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<T, ApiError> {
        let response = self.execute_with_recovery(descriptor).await?;
        Ok(crate::codec::decode_json(&response.body)?)
    }

    /// Sends a request whose response body is irrelevant.
    pub async fn send_no_content(&self, descriptor: &RequestDescriptor) -> Result<(), ApiError> {
        self.execute_with_recovery(descriptor).await?;
        Ok(())
    }

    /// Logs in with a provider identity token.
    ///
    /// The token pair arrives in the response headers and replaces any
    /// stored pair; the provider is cached as the session identity.
    pub async fn login(&self, provider: &str, identity_token: &str) -> Result<(), ApiError> {
        let descriptor = endpoints::login(provider, identity_token);
        let response = self.execute_with_recovery(&descriptor).await?;

        let access = response
            .header(AUTHORIZATION)
            .filter(|v| !v.is_empty())
            .ok_or(DeserializeError::MissingHeader(AUTHORIZATION))?;
        let refresh = response
            .header(REFRESH_TOKEN)
            .filter(|v| !v.is_empty())
            .ok_or(DeserializeError::MissingHeader(REFRESH_TOKEN))?;
        let pair = TokenPair::new(strip_bearer(access), strip_bearer(refresh));

        self.store.replace_pair(&pair).await?;
        self.store.write(TokenKind::Identity, provider).await?;

        debug!(provider = provider, "Logged in");
        Ok(())
    }

    /// Ends the server-side session and wipes local credentials.
    ///
    /// Local credentials are wiped even when the server call fails; a
    /// logout must never leave tokens behind.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.send_no_content(&endpoints::logout()).await;

        if let Err(e) = self.store.wipe().await {
            warn!(error = %e, "Failed to wipe credentials on logout");
            return Err(e.into());
        }

        result
    }

    // ------------------------------------------------------------------
    // Pipeline internals
    // ------------------------------------------------------------------

    async fn execute_with_recovery(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<WireResponse, ApiError> {
        match self.execute_once(descriptor).await {
            Err(ApiError::Network(NetworkError::Unauthorized)) if descriptor.requires_auth => {
                debug!(path = %descriptor.path, "Got 401, attempting token refresh");

                if self.refresh.ensure_valid_token().await.is_renewed() {
                    // Exactly one retry; a second 401 surfaces as-is.
                    self.execute_once(descriptor).await
                } else {
                    Err(NetworkError::Unauthorized.into())
                }
            }
            other => other,
        }
    }

    async fn execute_once(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<WireResponse, ApiError> {
        let request = self.build_wire_request(descriptor).await?;
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(ApiError::from)?;

        if let Some(err) = NetworkError::from_status(response.status) {
            return Err(err.into());
        }

        Ok(response)
    }

    async fn build_wire_request(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<WireRequest, ApiError> {
        let mut url = self
            .base_url
            .join(&descriptor.path)
            .map_err(|e| NetworkError::UrlBuild(e.to_string()))?;

        if !descriptor.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &descriptor.query {
                pairs.append_pair(name, value);
            }
        }

        let mut headers = descriptor.headers.clone();

        let body = if descriptor.method.allows_body() && !descriptor.parameters.is_empty() {
            let encoded = encode_body(descriptor.encoding, &descriptor.parameters)?;
            if descriptor.header("Content-Type").is_none() {
                headers.push(("Content-Type".to_string(), encoded.content_type));
            }
            Some(encoded.bytes)
        } else {
            None
        };

        if descriptor.requires_auth {
            // An absent access token still yields an Authorization header;
            // the server answers 401 and the refresh path takes over.
            let access = self.store.read(TokenKind::Access).await?.unwrap_or_default();
            headers.push((AUTHORIZATION.to_string(), bearer(&access)));
        }

        Ok(WireRequest {
            method: descriptor.method,
            url,
            headers,
            body,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
