//! # invitehub-database
//!
//! Persistence for InviteHub. The [`store`] traits define what the services
//! need; [`repositories`] implements them on PostgreSQL and [`memory`]
//! implements them in process for single-node development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::Stores;
