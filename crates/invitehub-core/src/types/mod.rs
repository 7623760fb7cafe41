//! Core type definitions used across the InviteHub workspace.

pub mod id;

pub use id::*;
