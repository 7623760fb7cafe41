//! Invite ticket domain entities.

pub mod model;
pub mod state;

pub use model::{CreateTicket, PendingInvite, Ticket, TicketSummary};
pub use state::TicketState;
