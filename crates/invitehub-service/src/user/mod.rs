//! Login and account lookup.

pub mod service;

pub use service::{LoginResponse, UserService};
