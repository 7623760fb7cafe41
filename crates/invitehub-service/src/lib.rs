//! # invitehub-service
//!
//! Business logic service layer for InviteHub. Each service orchestrates
//! stores, the membership registry, and the access evaluator to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod collaboration;
pub mod context;
pub mod email;
pub mod guest;
pub mod lifecycle;
pub mod slug;
pub mod ticket;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use collaboration::{CollaborationService, InvitationDetail, JoinResult};
pub use context::RequestContext;
pub use guest::{GuestService, NewGuest};
pub use lifecycle::{InvitationChanges, InvitationLifecycle, NewInvitation};
pub use ticket::{IssuedTicket, TicketRegistry};
pub use user::{LoginResponse, UserService};
