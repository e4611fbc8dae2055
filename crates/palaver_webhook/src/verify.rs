//! The identity-verification boundary.
//!
//! Token verification differs per deployment (key sets, issuers, clock
//! handling), so it stays behind a trait; the runtime only needs
//! accept-with-claims or reject.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Claims decoded from a verified identity token.
pub type TokenClaims = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
#[error("identity token rejected: {0}")]
pub struct VerifyError(pub String);

/// Verifies a bearer or sign-in token against an expected audience.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str, audience: &str)
    -> std::result::Result<TokenClaims, VerifyError>;
}

/// Settings for the request-level verification short-circuit.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Expected audience, typically the cloud project or client ID.
    pub audience: String,

    /// HTTP status returned on verification failure.
    pub status: u16,

    /// Message placed in the error body on verification failure.
    pub error: String,
}

impl Verification {
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            status: 403,
            error: "ID token verification failed".to_owned(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }
}
