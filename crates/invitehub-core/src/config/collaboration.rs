//! Invitation lifecycle and ticket configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Smallest accepted invite token size (128 bits of entropy).
pub const MIN_TOKEN_BYTES: usize = 16;

/// Settings for invitation expiry and invite tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationConfig {
    /// Days an invitation stays alive when created without an explicit expiry.
    #[serde(default = "default_grace_days")]
    pub resource_grace_days: u32,
    /// Hours an issued invite ticket remains claimable.
    #[serde(default = "default_ticket_ttl")]
    pub ticket_ttl_hours: u32,
    /// Number of random bytes in each invite token.
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
}

impl CollaborationConfig {
    /// Grace period applied to new invitations.
    pub fn resource_grace(&self) -> Duration {
        Duration::days(i64::from(self.resource_grace_days))
    }

    /// Lifetime of a freshly issued ticket.
    pub fn ticket_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.ticket_ttl_hours))
    }

    /// Reject settings that would weaken tokens or create dead-on-arrival records.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(AppError::configuration(format!(
                "collaboration.token_bytes must be at least {MIN_TOKEN_BYTES}, got {}",
                self.token_bytes
            )));
        }
        if self.ticket_ttl_hours == 0 {
            return Err(AppError::configuration(
                "collaboration.ticket_ttl_hours must be greater than zero",
            ));
        }
        if self.resource_grace_days == 0 {
            return Err(AppError::configuration(
                "collaboration.resource_grace_days must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for CollaborationConfig {
    fn default() -> Self {
        Self {
            resource_grace_days: default_grace_days(),
            ticket_ttl_hours: default_ticket_ttl(),
            token_bytes: default_token_bytes(),
        }
    }
}

fn default_grace_days() -> u32 {
    3
}

fn default_ticket_ttl() -> u32 {
    24
}

fn default_token_bytes() -> usize {
    MIN_TOKEN_BYTES
}
