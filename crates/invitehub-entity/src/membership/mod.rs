//! Membership domain entities.

pub mod model;
pub mod role;

pub use model::{CreateMembership, MemberView, Membership};
pub use role::MemberRole;
