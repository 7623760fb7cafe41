//! # invitehub-core
//!
//! Core crate for InviteHub. Contains configuration schemas, typed
//! identifiers, the injectable clock and randomness providers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other InviteHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
