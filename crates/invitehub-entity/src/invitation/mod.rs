//! Invitation domain entities.

pub mod content;
pub mod model;

pub use content::{DigitalGift, InvitationContent, InvitationEvent};
pub use model::{CreateInvitation, Invitation, UpdateInvitation};
