//! # invitehub-entity
//!
//! Domain entity models for InviteHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod guest;
pub mod invitation;
pub mod membership;
pub mod ticket;
pub mod user;
