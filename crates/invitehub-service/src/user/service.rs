//! Login through a verified identity-provider token.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use invitehub_auth::{IdentityVerifier, JwtEncoder};
use invitehub_core::error::AppError;
use invitehub_core::traits::{Clock, IdGenerator};
use invitehub_core::types::UserId;
use invitehub_database::store::UserStore;
use invitehub_entity::user::{UpsertUser, User};

use crate::context::RequestContext;
use crate::email::parse_email;
use crate::slug::hex_suffix;

/// Attempts at a free suffixed username before giving up.
const USERNAME_ATTEMPTS: usize = 5;

/// Response returned after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: User,
}

/// Signs users in and looks them up.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    verifier: Arc<dyn IdentityVerifier>,
    encoder: Arc<JwtEncoder>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        store: Arc<dyn UserStore>,
        verifier: Arc<dyn IdentityVerifier>,
        encoder: Arc<JwtEncoder>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            verifier,
            encoder,
            clock,
            ids,
        }
    }

    /// Verify `id_token`, create or refresh the account, and sign an access token.
    pub async fn login(&self, id_token: &str) -> Result<LoginResponse, AppError> {
        if id_token.trim().is_empty() {
            return Err(AppError::validation("Token required"));
        }

        let identity = self.verifier.verify(id_token).await?;
        let email = parse_email(&identity.email)?;
        let now = self.clock.now();

        let username = match self.store.find_by_email(&email).await? {
            Some(existing) => existing.username,
            None => self.unique_username(&email).await?,
        };

        let user = self
            .store
            .upsert_by_email(&UpsertUser {
                id: UserId::from_uuid(self.ids.new_uuid()),
                email,
                username,
                first_name: identity.first_name,
                last_name: identity.last_name,
                picture_url: identity.picture_url,
                now,
            })
            .await?;

        let token = self.encoder.generate_access_token(&user, now)?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(LoginResponse {
            access_token: token.access_token,
            expires_at: token.expires_at,
            user,
        })
    }

    /// The authenticated user's account.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.store
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Email local part, suffixed with 4 hex chars while taken.
    async fn unique_username(&self, email: &str) -> Result<String, AppError> {
        let local = email.split('@').next().unwrap_or_default();
        let mut base: String = local
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            .collect();
        if base.is_empty() {
            base = "user".to_string();
        }

        if !self.store.username_exists(&base).await? {
            return Ok(base);
        }
        for _ in 0..USERNAME_ATTEMPTS {
            let candidate = format!("{base}{}", hex_suffix(self.ids.as_ref(), 4));
            if !self.store.username_exists(&candidate).await? {
                return Ok(candidate);
            }
            debug!(candidate = %candidate, "Username taken, retrying");
        }
        Err(AppError::conflict("Could not allocate a unique username"))
    }
}
