//! Route handlers organized by domain.

pub mod auth;
pub mod guest;
pub mod health;
pub mod invitation;
