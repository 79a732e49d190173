use async_trait::async_trait;
use thiserror::Error;

use super::types::{AuthRequest, Identity};

/// Why a request was turned away at the API boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The `[auth]` section cannot produce a working authenticator.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AuthError {
    /// Label used for the `reason` dimension of the auth failure metric.
    pub fn failure_label(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "not_authenticated",
            AuthError::InvalidCredentials(_) => "invalid_credentials",
            AuthError::ConfigurationError(_) => "internal_error",
        }
    }

    /// True when the caller is at fault rather than the server.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AuthError::ConfigurationError(_))
    }
}

/// Decides who may browse the catalog and drive the game server.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError>;

    /// Short method name, as written in the `[auth]` section.
    fn method_name(&self) -> &'static str;

    /// Whether every request is let in without looking at it. The
    /// middleware skips header collection for such authenticators.
    fn admits_everyone(&self) -> bool {
        false
    }
}
