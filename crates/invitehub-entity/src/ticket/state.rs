//! Ticket lifecycle states.

use serde::{Deserialize, Serialize};

/// Where a ticket is in its lifecycle.
///
/// `Pending` is the only non-terminal state. A ticket moves to `Claimed`
/// exactly once on a successful join, or silently becomes `Expired` when
/// its deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    /// Unclaimed and not yet expired.
    Pending,
    /// Claimed by the invitee.
    Claimed,
    /// Expired without being claimed.
    Expired,
}

impl TicketState {
    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Expired => "expired",
        }
    }

    /// Whether the ticket can still be claimed.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for TicketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
