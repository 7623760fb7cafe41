//! Verification of identity-provider tokens.
//!
//! Login trusts only what an [`IdentityVerifier`] returns. The production
//! verifier for the external provider lives outside this workspace.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use invitehub_core::error::AppError;

/// Profile asserted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub picture_url: Option<String>,
}

/// Turns an identity-provider token into a verified identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Fails with `Authentication` when the token cannot be trusted.
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AppError>;
}

/// Verifier backed by a fixed token table, for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `id_token` as proof of `identity`.
    pub fn with_identity(mut self, id_token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.identities.insert(id_token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AppError> {
        self.identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| AppError::authentication("Invalid identity token"))
    }
}
