//! Guest list management.

pub mod service;

pub use service::{GuestService, NewGuest};
