//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use invitehub_auth::{
    AccessEvaluator, IdentityVerifier, JwtDecoder, JwtEncoder, MembershipRegistry, TokenCodec,
};
use invitehub_core::config::AppConfig;
use invitehub_core::error::AppError;
use invitehub_core::traits::{Clock, IdGenerator};
use invitehub_database::Stores;
use invitehub_service::{
    CollaborationService, GuestService, InvitationLifecycle, TicketRegistry, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Time source for request contexts
    pub clock: Arc<dyn Clock>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Invitation, ticket and membership operations
    pub collaboration: Arc<CollaborationService>,
    /// Guest list management
    pub guest_service: Arc<GuestService>,
    /// Login and account lookup
    pub user_service: Arc<UserService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every service over `stores`.
    pub fn build(
        config: AppConfig,
        stores: Stores,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Result<Self, AppError> {
        config.collaboration.validate()?;

        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let registry = Arc::new(MembershipRegistry::new(
            Arc::clone(&stores.memberships),
            Arc::clone(&clock),
            Arc::clone(&ids),
        ));
        let evaluator = Arc::new(AccessEvaluator::new(Arc::clone(&registry)));

        let lifecycle = Arc::new(InvitationLifecycle::new(
            Arc::clone(&stores.invitations),
            Arc::clone(&registry),
            Arc::clone(&clock),
            Arc::clone(&ids),
            config.collaboration.resource_grace(),
        ));
        let codec = TokenCodec::new(Arc::clone(&ids), config.collaboration.token_bytes)?;
        let tickets = Arc::new(TicketRegistry::new(
            Arc::clone(&stores.tickets),
            Arc::clone(&registry),
            codec,
            Arc::clone(&clock),
            Arc::clone(&ids),
        ));

        let collaboration = Arc::new(CollaborationService::new(
            Arc::clone(&lifecycle),
            tickets,
            registry,
            Arc::clone(&evaluator),
            config.collaboration.ticket_ttl(),
        ));
        let guest_service = Arc::new(GuestService::new(
            Arc::clone(&stores.guests),
            lifecycle,
            evaluator,
            Arc::clone(&clock),
            Arc::clone(&ids),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&stores.users),
            verifier,
            jwt_encoder,
            Arc::clone(&clock),
            ids,
        ));

        Ok(Self {
            config: Arc::new(config),
            clock,
            jwt_decoder,
            collaboration,
            guest_service,
            user_service,
        })
    }
}
