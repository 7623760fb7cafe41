//! The collaboration operations exposed to the API.

pub mod service;

pub use service::{CollaborationService, InvitationDetail, JoinResult};
