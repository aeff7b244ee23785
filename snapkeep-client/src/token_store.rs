//! Secure token persistence.
//!
//! Access and refresh tokens (plus the cached session identity) live in
//! the system credential store:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Writes overwrite, deletes of missing entries succeed, and entries for
//! different kinds are independent — concurrent writers to different
//! kinds cannot corrupt each other.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::StoreError;
use snapkeep_core::TokenPair;

/// Service name for snapkeep credentials.
const SERVICE_NAME: &str = "snapkeep";

// ============================================================================
// Token Kind
// ============================================================================

/// Which credential an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived access token.
    Access,
    /// Long-lived refresh token.
    Refresh,
    /// Cached session identity (user identifier).
    Identity,
}

impl TokenKind {
    /// All credential kinds, in wipe order.
    pub const ALL: [TokenKind; 3] = [TokenKind::Access, TokenKind::Refresh, TokenKind::Identity];

    /// Account name used in the credential store.
    pub fn account(&self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
            Self::Identity => "identity",
        }
    }
}

// ============================================================================
// Token Store Trait
// ============================================================================

/// Secure key-value persistence for session credentials.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads a credential. Returns `Ok(None)` if absent.
    async fn read(&self, kind: TokenKind) -> Result<Option<String>, StoreError>;

    /// Writes a credential, overwriting any existing value.
    async fn write(&self, kind: TokenKind, value: &str) -> Result<(), StoreError>;

    /// Deletes a credential. Deleting a missing entry is not an error.
    async fn delete(&self, kind: TokenKind) -> Result<(), StoreError>;

    /// Deletes every credential kind.
    ///
    /// This is the fail-closed path: after a rejected refresh, all
    /// session state must be gone so the caller lands back on login.
    async fn wipe(&self) -> Result<(), StoreError> {
        for kind in TokenKind::ALL {
            self.delete(kind).await?;
        }
        Ok(())
    }

    /// Replaces the stored token pair: old values are cleared first,
    /// then the new ones written.
    async fn replace_pair(&self, pair: &TokenPair) -> Result<(), StoreError> {
        self.delete(TokenKind::Access).await?;
        self.delete(TokenKind::Refresh).await?;
        self.write(TokenKind::Access, &pair.access_token).await?;
        self.write(TokenKind::Refresh, &pair.refresh_token).await?;
        Ok(())
    }
}

// ============================================================================
// Keyring Token Store
// ============================================================================

/// Default implementation backed by the system credential store.
#[derive(Debug, Clone, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    /// Creates a new keyring-backed store.
    pub fn new() -> Self {
        Self
    }

    fn entry(kind: TokenKind) -> Result<Entry, StoreError> {
        Entry::new(SERVICE_NAME, kind.account()).map_err(StoreError::from)
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn read(&self, kind: TokenKind) -> Result<Option<String>, StoreError> {
        let entry = Self::entry(kind)?;

        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(kind = ?kind, error = %e, "Failed to read credential");
                Err(e.into())
            }
        }
    }

    async fn write(&self, kind: TokenKind, value: &str) -> Result<(), StoreError> {
        let entry = Self::entry(kind)?;

        entry.set_password(value).map_err(|e| {
            warn!(kind = ?kind, error = %e, "Failed to write credential");
            StoreError::from(e)
        })?;

        debug!(kind = ?kind, "Credential stored");
        Ok(())
    }

    async fn delete(&self, kind: TokenKind) -> Result<(), StoreError> {
        let entry = Self::entry(kind)?;

        match entry.delete_credential() {
            Ok(()) => {
                debug!(kind = ?kind, "Credential deleted");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(kind = ?kind, error = %e, "Failed to delete credential");
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// Memory Token Store (test double)
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
