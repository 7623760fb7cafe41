//! Guest domain entities.

pub mod kind;
pub mod model;

pub use kind::GuestKind;
pub use model::{CreateGuest, Guest};
