//! Invitation creation, renewal, and lazy expiration.

pub mod service;

pub use service::{InvitationChanges, InvitationLifecycle, NewInvitation};
