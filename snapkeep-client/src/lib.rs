// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Snapkeep Client
//!
//! Authenticated HTTP pipeline for the snapkeep backend.
//!
//! The pipeline turns immutable request descriptions into wire requests,
//! classifies every response through a closed error taxonomy, and
//! recovers from expired access tokens transparently:
//!
//! - [`descriptor::RequestDescriptor`] - immutable description of one call
//! - [`codec`] - JSON and multipart body encoding, JSON decoding
//! - [`error::NetworkError`] - closed transport/HTTP error taxonomy
//! - [`token_store::TokenStore`] - keyring-backed credential persistence
//! - [`refresh::RefreshCoordinator`] - single-flight token refresh
//! - [`executor::ApiClient`] - execution with one 401 refresh-and-retry
//! - [`endpoints`] - request factories for the backend's endpoints
//!
//! ## Example
//!
//! ```ignore
//! use snapkeep_client::{ApiClient, ClientSettings, endpoints};
//! use snapkeep_core::ScreenshotPage;
//!
//! let client = ApiClient::new(&ClientSettings::default())?;
//! let page: ScreenshotPage = client
//!     .send(&endpoints::list_screenshots(0, 30))
//!     .await?;
//! ```

pub mod codec;
pub mod config;
pub mod descriptor;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod headers;
pub mod refresh;
pub mod token_store;
pub mod transport;

// Re-export the pipeline surface
pub use config::{ClientSettings, Environment};
pub use descriptor::{BinaryPart, BodyEncoding, Method, ParamValue, RequestDescriptor};
pub use error::{ApiError, DeserializeError, NetworkError, SerializeError, StoreError};
pub use executor::ApiClient;
pub use refresh::{DenyReason, RefreshCoordinator, RefreshOutcome};
pub use token_store::{KeyringTokenStore, TokenKind, TokenStore};
pub use transport::{HttpTransport, ReqwestTransport, WireRequest, WireResponse};
