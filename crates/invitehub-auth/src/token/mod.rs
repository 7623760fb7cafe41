//! Invite token codec.

pub mod codec;

pub use codec::{IssuedToken, TokenCodec, TokenDigest};
