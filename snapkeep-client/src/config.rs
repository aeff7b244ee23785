//! Environment configuration.
//!
//! Base URL selection is a construction-time concern: the environment is
//! injected into the client explicitly, never read from a global.

// ============================================================================
// Environment
// ============================================================================

/// Backend environment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Production backend.
    #[default]
    Production,
    /// Development backend.
    Development,
}

impl Environment {
    /// Returns the base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.snapkeep.app",
            Self::Development => "https://dev-api.snapkeep.app",
        }
    }
}

// ============================================================================
// Client Settings
// ============================================================================

/// Settings for the API client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Which backend to talk to.
    pub environment: Environment,
    /// Total request timeout.
    pub timeout: std::time::Duration,
    /// Connect timeout.
    pub connect_timeout: std::time::Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            timeout: std::time::Duration::from_secs(30),
            connect_timeout: std::time::Duration::from_secs(10),
        }
    }
}

impl ClientSettings {
    /// Creates settings for the given environment.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
